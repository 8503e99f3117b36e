//! Players and their per-event results.

use serde::{Deserialize, Serialize};

use super::{EventId, PlayerId};

/// Rating snapshot produced by the external rating model.
///
/// Only the ordinal is read; other fields of the stored JSON are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub ordinal: f64,
}

impl Rating {
    /// Ordinal rounded for display.
    pub fn rounded(&self) -> i64 {
        self.ordinal.round() as i64
    }
}

/// A player row from the `players` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    #[serde(default)]
    pub current_rating: Option<Rating>,
}

impl Player {
    pub fn new(id: PlayerId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            current_rating: None,
        }
    }

    /// Builder method to set the current rating ordinal.
    pub fn with_rating(mut self, ordinal: f64) -> Self {
        self.current_rating = Some(Rating { ordinal });
        self
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary::new(self.id, &self.username)
    }
}

/// Minimal player reference used in bracket cards, finalist lists and rivalries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub username: String,
}

impl PlayerSummary {
    pub fn new(id: PlayerId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
        }
    }
}

/// A player's result for a whole event, as stored in `event_participation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventParticipation {
    #[serde(alias = "event")]
    pub event_id: EventId,

    #[serde(alias = "player")]
    pub player_id: PlayerId,

    pub games_won: Option<u32>,

    /// Rating after this event
    #[serde(default)]
    pub updated_rating: Option<Rating>,
}

impl EventParticipation {
    pub fn new(event_id: EventId, player_id: PlayerId) -> Self {
        Self {
            event_id,
            player_id,
            games_won: None,
            updated_rating: None,
        }
    }

    /// Builder method to set games won.
    pub fn with_games_won(mut self, won: u32) -> Self {
        self.games_won = Some(won);
        self
    }

    /// Builder method to set the post-event rating ordinal.
    pub fn with_updated_rating(mut self, ordinal: f64) -> Self {
        self.updated_rating = Some(Rating { ordinal });
        self
    }
}
