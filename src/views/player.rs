//! Player profile and nemeses.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{player_directory, QueryError};
use crate::calculate::{rating_or_default, total_wins, OpponentResult, RivalryAccumulator};
use crate::models::{
    Event, EventId, EventParticipation, GameId, NemesisRecord, PlayerId, PlayerSummary,
};
use crate::storage::DataSource;

/// Shown for an opponent whose player row is gone.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// One event in a player's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event_id: EventId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub games_won: u32,

    /// Rounded rating after the event
    pub rating: Option<i64>,

    /// Rated event with 3 or 4 player games
    pub rating_event: bool,
}

/// A point on the rating chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub event_id: EventId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub rating: i64,
}

/// A nemesis record with the opponent's name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nemesis {
    pub username: String,

    #[serde(flatten)]
    pub record: NemesisRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: PlayerSummary,
    pub rating: Option<i64>,

    /// Games won across all events
    pub wins: u32,

    pub tournaments: usize,
    pub last_event: Option<HistoryEntry>,

    /// Oldest first
    pub history: Vec<HistoryEntry>,

    pub rating_series: Vec<RatingPoint>,
    pub nemeses: Vec<Nemesis>,
}

/// Join a player's event results with their events, oldest first.
///
/// Results whose event row is missing are skipped.
pub fn build_history(results: &[EventParticipation], events: &[Event]) -> Vec<HistoryEntry> {
    let events: HashMap<EventId, &Event> = events.iter().map(|e| (e.id, e)).collect();

    let mut history: Vec<HistoryEntry> = results
        .iter()
        .filter_map(|result| {
            let Some(event) = events.get(&result.event_id) else {
                debug!(event = %result.event_id, "Skipping result for unknown event");
                return None;
            };
            Some(HistoryEntry {
                event_id: event.id,
                name: event.display_name(),
                start_date: event.start_date,
                games_won: result.games_won.unwrap_or(0),
                rating: result.updated_rating.map(|r| r.rounded()),
                rating_event: event.is_rating_event(),
            })
        })
        .collect();

    history.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    history
}

/// Rating chart points for rated events; a missing rating plots as the default.
pub fn rating_series(history: &[HistoryEntry], results: &[EventParticipation]) -> Vec<RatingPoint> {
    let ratings: HashMap<EventId, &EventParticipation> =
        results.iter().map(|r| (r.event_id, r)).collect();

    history
        .iter()
        .filter(|entry| entry.rating_event)
        .map(|entry| RatingPoint {
            event_id: entry.event_id,
            name: entry.name.clone(),
            start_date: entry.start_date,
            rating: rating_or_default(
                ratings
                    .get(&entry.event_id)
                    .and_then(|r| r.updated_rating.as_ref()),
            ),
        })
        .collect()
}

pub async fn player_profile(
    source: &dyn DataSource,
    username: &str,
    batch_size: usize,
) -> Result<PlayerProfile, QueryError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(QueryError::InvalidInput("username is empty".to_string()));
    }

    let player = source
        .player_by_username(username)
        .await?
        .ok_or_else(|| QueryError::NotFound(format!("player {username}")))?;

    let results = source.event_participation_for_player(player.id).await?;
    let event_ids: HashSet<EventId> = results.iter().map(|r| r.event_id).collect();
    let events: Vec<Event> = source
        .events()
        .await?
        .into_iter()
        .filter(|e| event_ids.contains(&e.id))
        .collect();

    let history = build_history(&results, &events);
    let last_event = history
        .iter()
        .filter(|entry| entry.start_date.is_some())
        .max_by_key(|entry| entry.start_date)
        .cloned();
    let rating_series = rating_series(&history, &results);
    let nemeses = player_nemeses(source, player.id, batch_size).await?;

    info!(player = %player.id, events = history.len(), "Built player profile");
    Ok(PlayerProfile {
        player: player.summary(),
        rating: player.current_rating.map(|r| r.rounded()),
        wins: total_wins(&results),
        tournaments: history.len(),
        last_event,
        history,
        rating_series,
        nemeses,
    })
}

/// Top rivals of a player, fetching shared games in batches.
pub async fn player_nemeses(
    source: &dyn DataSource,
    player_id: PlayerId,
    batch_size: usize,
) -> Result<Vec<Nemesis>, QueryError> {
    let own = source.participation_for_player(player_id).await?;
    let mut accumulator = RivalryAccumulator::new(player_id);
    accumulator.add_own_games(&own);

    let game_ids = accumulator.own_game_ids();
    for chunk in game_ids.chunks(batch_size.max(1)) {
        let played_at: HashMap<GameId, DateTime<Utc>> = source
            .games_by_ids(chunk)
            .await?
            .into_iter()
            .map(|g| (g.id, g.created_at))
            .collect();
        let rows = source.participation_for_games(chunk).await?;

        accumulator.add_opponents(rows.into_iter().filter_map(|row| {
            let at = *played_at.get(&row.game_id)?;
            Some(OpponentResult::new(row.game_id, row.player_id, row.ranking, at))
        }));
    }

    let records = accumulator.finish();
    let opponent_ids: Vec<PlayerId> = records.iter().map(|r| r.opponent_id).collect();
    let names = player_directory(source, &opponent_ids, batch_size).await?;
    Ok(label_nemeses(records, &names))
}

/// Attach usernames, falling back to [`UNKNOWN_PLAYER`].
pub fn label_nemeses(
    records: Vec<NemesisRecord>,
    names: &HashMap<PlayerId, PlayerSummary>,
) -> Vec<Nemesis> {
    records
        .into_iter()
        .map(|record| Nemesis {
            username: names
                .get(&record.opponent_id)
                .map_or_else(|| UNKNOWN_PLAYER.to_string(), |p| p.username.clone()),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::DEFAULT_RATING;
    use crate::models::WinLossRecord;
    use crate::views::fixtures;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_player_profile() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let profile = player_profile(&source, " ada ", 2).await.unwrap();

        assert_eq!(profile.player.username, "ada");
        assert_eq!(profile.rating, Some(1320));
        assert_eq!(profile.wins, 3);
        assert_eq!(profile.tournaments, 2);

        let history: Vec<i64> = profile.history.iter().map(|h| h.event_id.get()).collect();
        assert_eq!(history, vec![2, 1]);
        assert_eq!(profile.last_event.map(|e| e.event_id), Some(EventId::new(1)));

        let series: Vec<i64> = profile.rating_series.iter().map(|p| p.rating).collect();
        assert_eq!(series, vec![1288, 1320]);
    }

    #[tokio::test]
    async fn test_player_profile_defaults_missing_rating() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let profile = player_profile(&source, "cato", 100).await.unwrap();
        assert_eq!(profile.rating, None);
        assert_eq!(profile.wins, 0);
        assert_eq!(profile.rating_series.len(), 1);
        assert_eq!(profile.rating_series[0].rating, DEFAULT_RATING);
        assert!(profile.nemeses.is_empty());
    }

    #[tokio::test]
    async fn test_player_profile_errors() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        assert!(matches!(
            player_profile(&source, "nobody", 100).await,
            Err(QueryError::NotFound(_))
        ));
        assert!(matches!(
            player_profile(&source, "  ", 100).await,
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_player_nemeses_across_batches() {
        let temp_dir = TempDir::new().unwrap();
        let source = fixtures::source(&temp_dir);

        let single = player_nemeses(&source, PlayerId::new(1), 100).await.unwrap();
        let batched = player_nemeses(&source, PlayerId::new(1), 1).await.unwrap();
        assert_eq!(single, batched);

        assert_eq!(single.len(), 1);
        let brook = &single[0];
        assert_eq!(brook.username, "brook");
        assert_eq!(brook.record.record, WinLossRecord::new(1, 4, 2));
        assert_eq!(brook.record.score, 6);
        assert_eq!(brook.record.most_recent_game, fixtures::at(5, 10));
    }

    #[test]
    fn test_label_nemeses_unknown_player() {
        let record = NemesisRecord::new(PlayerId::new(42), WinLossRecord::new(2, 2, 1), fixtures::at(1, 9));
        let labelled = label_nemeses(vec![record], &HashMap::new());
        assert_eq!(labelled[0].username, UNKNOWN_PLAYER);
    }

    #[test]
    fn test_history_skips_unknown_events() {
        let player = PlayerId::new(1);
        let results = vec![
            EventParticipation::new(EventId::new(1), player),
            EventParticipation::new(EventId::new(9), player),
        ];
        let events = vec![Event::new(EventId::new(1), "Open")];
        assert_eq!(build_history(&results, &events).len(), 1);
    }
}
