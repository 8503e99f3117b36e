//! Games and per-game participation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, GameId, PlayerId, PlayerSummary};

/// A single game played at an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,

    /// Free-text label entered by the organizer ("R1 A1", "SF 2", "FF")
    pub name: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(alias = "event")]
    pub event_id: EventId,
}

impl Game {
    pub fn new(id: GameId, event_id: EventId, name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            created_at,
            event_id,
        }
    }
}

/// Faction played in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Polania,
    Albion,
    Nordic,
    Rusviet,
    Togawa,
    Crimea,
    Saxony,
    #[serde(other)]
    Unknown,
}

/// Player mat chosen in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMat {
    Industrial,
    Engineering,
    Militant,
    Patriotic,
    Innovative,
    Mechanical,
    Agricultural,
    #[serde(other)]
    Unknown,
}

/// Something with an organizer-assigned ranking and an optional score.
pub trait Ranked {
    /// 1 = winner; ties may share a value.
    fn ranking(&self) -> Option<u32>;

    fn final_score(&self) -> Option<i32>;
}

/// One player's result in one game, as stored in `game_participation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParticipation {
    #[serde(alias = "game")]
    pub game_id: GameId,

    #[serde(alias = "player")]
    pub player_id: PlayerId,

    pub ranking: Option<u32>,

    pub final_score: Option<i32>,

    #[serde(default)]
    pub faction: Option<Faction>,

    #[serde(default)]
    pub player_mat: Option<PlayerMat>,
}

impl GameParticipation {
    pub fn new(game_id: GameId, player_id: PlayerId, ranking: Option<u32>) -> Self {
        Self {
            game_id,
            player_id,
            ranking,
            final_score: None,
            faction: None,
            player_mat: None,
        }
    }
}

/// Fixture builders.
#[cfg(test)]
impl GameParticipation {
    /// Builder method to set the final score.
    pub(crate) fn with_score(mut self, score: i32) -> Self {
        self.final_score = Some(score);
        self
    }

    /// Builder method to set faction and mat.
    pub(crate) fn with_setup(mut self, faction: Faction, player_mat: PlayerMat) -> Self {
        self.faction = Some(faction);
        self.player_mat = Some(player_mat);
        self
    }
}

impl Ranked for GameParticipation {
    fn ranking(&self) -> Option<u32> {
        self.ranking
    }

    fn final_score(&self) -> Option<i32> {
        self.final_score
    }
}

/// A participation row joined with its player, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player: PlayerSummary,
    pub ranking: Option<u32>,
    pub final_score: Option<i32>,
    pub faction: Option<Faction>,
    pub player_mat: Option<PlayerMat>,

    /// Place after score tie-breaks; absent when the ranking is unknown
    pub placement: Option<u32>,
}

impl Participant {
    pub fn from_row(row: &GameParticipation, player: PlayerSummary) -> Self {
        Self {
            player,
            ranking: row.ranking,
            final_score: row.final_score,
            faction: row.faction,
            player_mat: row.player_mat,
            placement: None,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.ranking == Some(1)
    }
}

impl Ranked for Participant {
    fn ranking(&self) -> Option<u32> {
        self.ranking
    }

    fn final_score(&self) -> Option<i32> {
        self.final_score
    }
}
