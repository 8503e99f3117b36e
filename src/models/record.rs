//! Head-to-head records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Win/loss/draw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinLossRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinLossRecord {
    /// Create a new record.
    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    /// Total games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Rivalry score: `wins * losses + draws`.
    ///
    /// High for even, contested histories and for frequent draws; low for
    /// one-sided ones regardless of sample size.
    pub fn rivalry_score(&self) -> u32 {
        self.wins.saturating_mul(self.losses).saturating_add(self.draws)
    }
}

/// A player's record against one opponent across every shared game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NemesisRecord {
    pub opponent_id: PlayerId,

    #[serde(flatten)]
    pub record: WinLossRecord,

    pub total_games: u32,

    /// Timestamp of the latest shared game
    pub most_recent_game: DateTime<Utc>,

    pub score: u32,
}

impl NemesisRecord {
    pub fn new(opponent_id: PlayerId, record: WinLossRecord, most_recent_game: DateTime<Utc>) -> Self {
        Self {
            opponent_id,
            record,
            total_games: record.total_games(),
            most_recent_game,
            score: record.rivalry_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_win_loss_record() {
        let record = WinLossRecord::new(5, 1, 0);
        assert_eq!(record.total_games(), 6);
    }

    #[test]
    fn test_win_loss_record_zero_games() {
        let record = WinLossRecord::default();
        assert_eq!(record.total_games(), 0);
        assert_eq!(record.rivalry_score(), 0);
    }

    #[test]
    fn test_rivalry_score_prefers_balanced_history() {
        let balanced = WinLossRecord::new(3, 3, 0);
        let lopsided = WinLossRecord::new(6, 0, 0);
        assert_eq!(balanced.rivalry_score(), 9);
        assert_eq!(lopsided.rivalry_score(), 0);
        assert_eq!(WinLossRecord::new(3, 1, 1).rivalry_score(), 4);
    }

    #[test]
    fn test_nemesis_record_flattens_counts() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let nemesis = NemesisRecord::new(PlayerId::new(7), WinLossRecord::new(3, 1, 1), at);

        assert_eq!(nemesis.total_games, 5);
        assert_eq!(nemesis.score, 4);

        let json = serde_json::to_value(&nemesis).unwrap();
        assert_eq!(json["wins"], 3);
        assert_eq!(json["losses"], 1);
        assert_eq!(json["draws"], 1);
        assert_eq!(json["opponent_id"], 7);
    }
}
