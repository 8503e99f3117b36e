//! Rivalry ("nemesis") aggregation over a player's shared games.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{GameId, GameParticipation, NemesisRecord, PlayerId, WinLossRecord};

/// Shared games needed before an opponent counts as a rival.
pub const MIN_SHARED_GAMES: u32 = 5;

/// Nemeses reported per player.
pub const MAX_NEMESES: usize = 3;

/// Another player's result in one of the target player's games.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentResult {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub ranking: Option<u32>,

    /// When the game was played
    pub played_at: DateTime<Utc>,
}

impl OpponentResult {
    pub fn new(
        game_id: GameId,
        player_id: PlayerId,
        ranking: Option<u32>,
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            game_id,
            player_id,
            ranking,
            played_at,
        }
    }
}

/// Collects a player's games and co-participants across fetch batches.
///
/// Rows are keyed by game (and opponent), so feeding overlapping or re-ordered
/// pages produces the same records as feeding everything at once.
#[derive(Debug, Clone)]
pub struct RivalryAccumulator {
    player_id: PlayerId,
    own: HashMap<GameId, Option<u32>>,
    opponents: HashMap<(GameId, PlayerId), (Option<u32>, DateTime<Utc>)>,
}

impl RivalryAccumulator {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            own: HashMap::new(),
            opponents: HashMap::new(),
        }
    }

    /// Record the target player's own results. Rows for other players are ignored.
    pub fn add_own_games<'a>(&mut self, rows: impl IntoIterator<Item = &'a GameParticipation>) {
        for row in rows {
            if row.player_id == self.player_id {
                self.own.entry(row.game_id).or_insert(row.ranking);
            }
        }
    }

    /// Games the target played, in id order.
    pub fn own_game_ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.own.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn add_opponents(&mut self, rows: impl IntoIterator<Item = OpponentResult>) {
        for row in rows {
            self.opponents
                .entry((row.game_id, row.player_id))
                .or_insert((row.ranking, row.played_at));
        }
    }

    /// Rank opponents by rivalry score.
    ///
    /// A shared game is a win when the target ranked 1, a loss when the
    /// opponent did, and a draw otherwise. Opponents under
    /// [`MIN_SHARED_GAMES`] are dropped; ties on score fall back to total
    /// games, then the most recent game, then opponent id.
    pub fn finish(&self) -> Vec<NemesisRecord> {
        let mut tallies: HashMap<PlayerId, (WinLossRecord, DateTime<Utc>)> = HashMap::new();

        for (&(game_id, opponent_id), &(their_ranking, played_at)) in &self.opponents {
            if opponent_id == self.player_id {
                continue;
            }
            let Some(&own_ranking) = self.own.get(&game_id) else {
                continue;
            };

            let (record, latest) = tallies
                .entry(opponent_id)
                .or_insert((WinLossRecord::default(), played_at));
            match (own_ranking, their_ranking) {
                (Some(1), _) => record.wins += 1,
                (_, Some(1)) => record.losses += 1,
                _ => record.draws += 1,
            }
            *latest = (*latest).max(played_at);
        }

        let mut records: Vec<NemesisRecord> = tallies
            .into_iter()
            .filter(|(_, (record, _))| record.total_games() >= MIN_SHARED_GAMES)
            .map(|(opponent_id, (record, latest))| NemesisRecord::new(opponent_id, record, latest))
            .collect();

        records.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.total_games.cmp(&a.total_games))
                .then_with(|| b.most_recent_game.cmp(&a.most_recent_game))
                .then_with(|| a.opponent_id.cmp(&b.opponent_id))
        });
        records.truncate(MAX_NEMESES);

        tracing::debug!(
            player = %self.player_id,
            games = self.own.len(),
            nemeses = records.len(),
            "Computed rivalries"
        );
        records
    }
}

/// One-shot form of [`RivalryAccumulator`] for fully assembled inputs.
pub fn find_nemeses(
    player_id: PlayerId,
    own_games: &[GameParticipation],
    opponents: &[OpponentResult],
) -> Vec<NemesisRecord> {
    let mut accumulator = RivalryAccumulator::new(player_id);
    accumulator.add_own_games(own_games);
    accumulator.add_opponents(opponents.iter().cloned());
    accumulator.finish()
}
