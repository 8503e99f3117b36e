//! Tournament bracket and tournament list views.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{player_directory, QueryError};
use crate::bracket::{group_games_by_section, parse_game_name, BracketGame, SectionGroup, TournamentFormat};
use crate::calculate::resolve_placements;
use crate::models::{
    Event, EventId, Game, GameId, GameParticipation, Participant, PlayerId, PlayerSummary,
};
use crate::storage::{fetch_in_batches, DataSource};

/// Recent games checked when looking for an event's final.
const FINALS_LOOKBACK: usize = 2;

/// Sort position of a participant without a ranking.
const UNRANKED: u32 = 999;

/// A tournament laid out as ordered bracket sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentBracket {
    pub event_id: EventId,

    /// Name with the year stripped
    pub name: String,

    pub start_date: Option<NaiveDate>,
    pub format: TournamentFormat,
    pub winner: Option<PlayerSummary>,
    pub sections: Vec<SectionGroup>,
}

/// One row of the tournament list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: EventId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub format: TournamentFormat,
    pub num_players_per_game: Option<u32>,
    pub rating_event: bool,
    pub bid: bool,
    pub draft: bool,

    /// Distinct players with an event result
    pub player_count: usize,

    pub winner: Option<PlayerSummary>,

    /// Players of the final; empty for head-to-head events or when no final is found
    pub finalists: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentList {
    pub tournaments: Vec<TournamentSummary>,

    /// Creation time of the newest stored game
    pub last_updated: Option<DateTime<Utc>>,
}

/// Fetch everything needed for one event's bracket and assemble it.
pub async fn tournament_bracket(
    source: &dyn DataSource,
    event_id: EventId,
    batch_size: usize,
) -> Result<TournamentBracket, QueryError> {
    let event = source
        .event(event_id)
        .await?
        .ok_or_else(|| QueryError::NotFound(format!("event {event_id}")))?;

    let games = source.games_for_event(event_id).await?;
    let game_ids: Vec<GameId> = games.iter().map(|g| g.id).collect();
    let rows = fetch_in_batches(&game_ids, batch_size, |chunk| {
        source.participation_for_games(chunk)
    })
    .await?;

    let player_ids: Vec<PlayerId> = rows
        .iter()
        .map(|r| r.player_id)
        .chain(event.winner)
        .collect();
    let players = player_directory(source, &player_ids, batch_size).await?;

    info!(
        event = %event_id,
        games = games.len(),
        rows = rows.len(),
        "Assembling tournament bracket"
    );
    Ok(assemble_bracket(&event, games, &rows, &players))
}

/// Build the bracket from already fetched rows.
pub fn assemble_bracket(
    event: &Event,
    games: Vec<Game>,
    rows: &[GameParticipation],
    players: &HashMap<PlayerId, PlayerSummary>,
) -> TournamentBracket {
    let format = event.format();

    let mut by_game: HashMap<GameId, Vec<&GameParticipation>> = HashMap::new();
    for row in rows {
        by_game.entry(row.game_id).or_default().push(row);
    }

    let bracket_games = games
        .into_iter()
        .map(|game| {
            let game_rows = by_game.get(&game.id).map(Vec::as_slice).unwrap_or(&[]);
            let participants = build_participants(game_rows, players);

            let mut parsed = parse_game_name(game.name.as_deref(), format);
            if parsed.display_name.is_empty() {
                parsed.display_name = format!("Game {}", game.id);
            }
            BracketGame::new(game.id, game.name, parsed, participants)
        })
        .collect();

    TournamentBracket {
        event_id: event.id,
        name: event.display_name(),
        start_date: event.start_date,
        format,
        winner: event.winner.and_then(|id| players.get(&id).cloned()),
        sections: group_games_by_section(bracket_games),
    }
}

/// Normalise one game's rows into ordered participants with placements.
///
/// Rows for unknown players are dropped. Duplicate rows for a player collapse
/// to the first, unless a later one carries a ranking or score the first lacks.
pub fn build_participants(
    rows: &[&GameParticipation],
    players: &HashMap<PlayerId, PlayerSummary>,
) -> Vec<Participant> {
    let mut kept: Vec<&GameParticipation> = Vec::with_capacity(rows.len());
    let mut index: HashMap<PlayerId, usize> = HashMap::new();

    for &row in rows {
        if !players.contains_key(&row.player_id) {
            debug!(game = %row.game_id, player = %row.player_id, "Dropping row for unknown player");
            continue;
        }
        match index.get(&row.player_id) {
            Some(&slot) => {
                let current = kept[slot];
                let adds_ranking = current.ranking.is_none() && row.ranking.is_some();
                let adds_score = current.final_score.is_none() && row.final_score.is_some();
                if adds_ranking || adds_score {
                    kept[slot] = row;
                }
            }
            None => {
                index.insert(row.player_id, kept.len());
                kept.push(row);
            }
        }
    }

    let mut participants: Vec<Participant> = kept
        .into_iter()
        .filter_map(|row| {
            let player = players.get(&row.player_id)?.clone();
            Some(Participant::from_row(row, player))
        })
        .collect();
    participants.sort_by_key(|p| p.ranking.unwrap_or(UNRANKED));

    let placements = resolve_placements(&participants);
    for (index, participant) in participants.iter_mut().enumerate() {
        participant.placement = placements.get(&index).copied();
    }

    participants
}

/// Whether a game name reads like a final ("Finals", "FF", "Final B").
pub fn is_finals_game(name: Option<&str>) -> bool {
    let Some(name) = name else {
        return false;
    };
    let lower = name.trim().to_lowercase();
    lower.contains("final") || lower.starts_with("ff")
}

/// The newest finals-looking game among an event's latest games.
pub fn find_finals_game(latest: &[Game]) -> Option<&Game> {
    latest
        .iter()
        .filter(|g| is_finals_game(g.name.as_deref()))
        .max_by_key(|g| (g.created_at, g.id))
}

/// All events, newest first, with player counts, winners and finalists.
pub async fn tournament_list(
    source: &dyn DataSource,
    batch_size: usize,
) -> Result<TournamentList, QueryError> {
    let mut events = source.events().await?;
    events.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.id.cmp(&a.id))
    });

    let event_ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
    let results = fetch_in_batches(&event_ids, batch_size, |chunk| {
        source.event_participation_for_events(chunk)
    })
    .await?;
    let mut entrants: HashMap<EventId, HashSet<PlayerId>> = HashMap::new();
    for result in &results {
        entrants
            .entry(result.event_id)
            .or_default()
            .insert(result.player_id);
    }

    let mut finals: HashMap<EventId, GameId> = HashMap::new();
    for event in events.iter().filter(|e| e.is_multiplayer()) {
        let latest = source.latest_games(event.id, FINALS_LOOKBACK).await?;
        if let Some(game) = find_finals_game(&latest) {
            finals.insert(event.id, game.id);
        }
    }

    let finals_ids: Vec<GameId> = finals.values().copied().collect();
    let finals_rows = fetch_in_batches(&finals_ids, batch_size, |chunk| {
        source.participation_for_games(chunk)
    })
    .await?;

    let player_ids: Vec<PlayerId> = finals_rows
        .iter()
        .map(|r| r.player_id)
        .chain(events.iter().filter_map(|e| e.winner))
        .collect();
    let players = player_directory(source, &player_ids, batch_size).await?;

    let mut rows_by_game: HashMap<GameId, Vec<&GameParticipation>> = HashMap::new();
    for row in &finals_rows {
        rows_by_game.entry(row.game_id).or_default().push(row);
    }

    let tournaments = events
        .iter()
        .map(|event| {
            let finalists: Vec<PlayerSummary> = finals
                .get(&event.id)
                .and_then(|game| rows_by_game.get(game))
                .map(|rows| {
                    build_participants(rows, &players)
                        .into_iter()
                        .map(|p| p.player)
                        .collect()
                })
                .unwrap_or_default();

            TournamentSummary {
                id: event.id,
                name: event.display_name(),
                start_date: event.start_date,
                format: event.format(),
                num_players_per_game: event.num_players_per_game,
                rating_event: event.rating_event.unwrap_or(false),
                bid: event.bid.unwrap_or(false),
                draft: event.draft.unwrap_or(false),
                player_count: entrants.get(&event.id).map_or(0, HashSet::len),
                winner: event.winner.and_then(|id| players.get(&id).cloned()),
                finalists,
            }
        })
        .collect();

    Ok(TournamentList {
        tournaments,
        last_updated: source.last_game_at().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn directory(ids: &[i64]) -> HashMap<PlayerId, PlayerSummary> {
        ids.iter()
            .map(|&id| {
                let id = PlayerId::new(id);
                (id, PlayerSummary::new(id, &format!("p{id}")))
            })
            .collect()
    }

    fn row(player: i64, ranking: Option<u32>, score: Option<i32>) -> GameParticipation {
        let mut row = GameParticipation::new(GameId::new(1), PlayerId::new(player), ranking);
        row.final_score = score;
        row
    }

    #[test]
    fn test_participants_ordered_with_placements() {
        let rows = [
            row(1, Some(2), Some(30)),
            row(2, None, None),
            row(3, Some(1), Some(50)),
            row(4, Some(2), Some(40)),
        ];
        let refs: Vec<&GameParticipation> = rows.iter().collect();

        let participants = build_participants(&refs, &directory(&[1, 2, 3, 4]));
        let summary: Vec<(i64, Option<u32>, Option<u32>)> = participants
            .iter()
            .map(|p| (p.player.id.get(), p.ranking, p.placement))
            .collect();

        assert_eq!(
            summary,
            vec![
                (3, Some(1), Some(1)),
                (1, Some(2), Some(3)),
                (4, Some(2), Some(2)),
                (2, None, None),
            ]
        );
        assert!(participants[0].is_winner());
    }

    #[test]
    fn test_duplicate_rows_prefer_results() {
        let rows = [
            row(1, None, None),
            row(1, Some(1), Some(70)),
            row(1, Some(3), Some(10)),
            row(2, Some(2), Some(60)),
        ];
        let refs: Vec<&GameParticipation> = rows.iter().collect();

        let participants = build_participants(&refs, &directory(&[1, 2]));
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].player.id, PlayerId::new(1));
        assert_eq!(participants[0].ranking, Some(1));
    }

    #[test]
    fn test_unknown_players_dropped() {
        let rows = [row(1, Some(1), None), row(9, Some(2), None)];
        let refs: Vec<&GameParticipation> = rows.iter().collect();
        assert_eq!(build_participants(&refs, &directory(&[1])).len(), 1);
    }

    #[test]
    fn test_is_finals_game() {
        assert!(is_finals_game(Some("Finals")));
        assert!(is_finals_game(Some("FF")));
        assert!(is_finals_game(Some("ff 1")));
        assert!(is_finals_game(Some("Grand Final")));
        assert!(!is_finals_game(Some("SF 1")));
        assert!(!is_finals_game(Some("R3 A1")));
        assert!(!is_finals_game(None));
    }

    #[test]
    fn test_find_finals_game_prefers_newest() {
        let event = EventId::new(1);
        let latest = vec![
            Game::new(GameId::new(8), event, "Exhibition", fixtures::at(2, 20)),
            Game::new(GameId::new(7), event, "FF", fixtures::at(2, 18)),
        ];
        assert_eq!(find_finals_game(&latest).map(|g| g.id), Some(GameId::new(7)));
        assert!(find_finals_game(&latest[..1]).is_none());
        assert!(find_finals_game(&[]).is_none());
    }

    #[test]
    fn test_assemble_bracket_null_name() {
        let event = Event::new(EventId::new(1), "Open");
        let mut game = Game::new(GameId::new(4), event.id, "", fixtures::at(1, 9));
        game.name = None;
        let mut participation = row(1, Some(1), None);
        participation.game_id = GameId::new(4);

        let bracket = assemble_bracket(&event, vec![game], &[participation], &directory(&[1]));
        assert_eq!(bracket.sections.len(), 1);
        assert_eq!(bracket.sections[0].section_key, "unknown");
        assert_eq!(bracket.sections[0].games[0].parsed.display_name, "Game 4");
    }

    #[tokio::test]
    async fn test_tournament_bracket_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let bracket = tournament_bracket(&source, EventId::new(1), 2).await.unwrap();

        assert_eq!(bracket.name, "Spring Open");
        assert_eq!(bracket.format, TournamentFormat::Standard);
        assert_eq!(bracket.winner.as_ref().map(|w| w.username.as_str()), Some("brook"));

        let layout: Vec<(&str, Vec<&str>)> = bracket
            .sections
            .iter()
            .map(|s| {
                (
                    s.section_label.as_str(),
                    s.games.iter().map(|g| g.parsed.display_name.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                ("Round 1", vec!["A1", "A2"]),
                ("Quarterfinals", vec!["Game 1"]),
                ("Semifinals", vec!["Game 1"]),
                ("Finals", vec!["Game 1"]),
            ]
        );

        // Re-entered "R1 A1" without rows is not the kept game
        assert_eq!(bracket.sections[0].games[0].id, GameId::new(10));

        let round_one = &bracket.sections[0].games[0].participants;
        let placements: Vec<(&str, Option<u32>)> = round_one
            .iter()
            .map(|p| (p.player.username.as_str(), p.placement))
            .collect();
        assert_eq!(placements, vec![("brook", Some(1)), ("ada", Some(3)), ("cato", Some(2))]);

        // Player 99 is unknown and dropped from the final
        assert_eq!(bracket.sections[3].games[0].participants.len(), 3);
    }

    #[tokio::test]
    async fn test_tournament_bracket_league_format() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let bracket = tournament_bracket(&source, EventId::new(2), 100).await.unwrap();
        assert_eq!(bracket.format, TournamentFormat::League);
        assert_eq!(bracket.sections.len(), 1);
        let games: Vec<&str> = bracket.sections[0]
            .games
            .iter()
            .map(|g| g.parsed.display_name.as_str())
            .collect();
        assert_eq!(games, vec!["G1", "G2"]);
    }

    #[tokio::test]
    async fn test_tournament_bracket_missing_event() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let result = tournament_bracket(&source, EventId::new(404), 100).await;
        assert!(matches!(result, Err(QueryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_tournament_bracket_without_games() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let bracket = tournament_bracket(&source, EventId::new(3), 100).await.unwrap();
        assert_eq!(bracket.format, TournamentFormat::HeadToHead);
        assert!(bracket.sections.is_empty());
    }

    #[tokio::test]
    async fn test_tournament_list() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let list = tournament_list(&source, 2).await.unwrap();
        let ids: Vec<i64> = list.tournaments.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let open = &list.tournaments[1];
        assert_eq!(open.player_count, 4);
        assert_eq!(open.winner.as_ref().map(|w| w.username.as_str()), Some("brook"));
        let finalists: Vec<&str> = open.finalists.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(finalists, vec!["ada", "brook", "dune"]);

        // Latest league games are not finals
        assert!(list.tournaments[2].finalists.is_empty());
        // Head-to-head events never report finalists
        assert!(list.tournaments[0].finalists.is_empty());

        assert_eq!(list.last_updated, Some(fixtures::at(5, 10)));
    }
}
