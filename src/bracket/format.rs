//! Tournament format detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an event's games are organised, derived once per event from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentFormat {
    /// Rounds followed by elimination stages
    #[default]
    Standard,
    /// Tiered round-robin ("Tier 2 G14")
    League,
    /// Flat numbered game sequence
    HeadToHead,
}

impl TournamentFormat {
    /// Detect the format from an event name.
    ///
    /// Case-insensitive: "league" wins over "1v1"; anything else, including a
    /// missing name, is standard.
    pub fn detect(event_name: Option<&str>) -> Self {
        let Some(name) = event_name else {
            return TournamentFormat::Standard;
        };

        let lower = name.to_lowercase();
        if lower.contains("league") {
            TournamentFormat::League
        } else if lower.contains("1v1") {
            TournamentFormat::HeadToHead
        } else {
            TournamentFormat::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentFormat::Standard => "standard",
            TournamentFormat::League => "league",
            TournamentFormat::HeadToHead => "head-to-head",
        }
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
