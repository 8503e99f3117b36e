//! Tournament event model.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{EventId, PlayerId};
use crate::bracket::TournamentFormat;

/// A tournament event as stored in the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    /// Organizer-entered name, often carrying the year
    pub name: Option<String>,

    pub start_date: Option<NaiveDate>,

    /// Player who won the event
    pub winner: Option<PlayerId>,

    /// Seats per game (2 for head-to-head events, 3 or 4 otherwise)
    pub num_players_per_game: Option<u32>,

    /// Whether the event feeds the rating model
    #[serde(default)]
    pub rating_event: Option<bool>,

    #[serde(default)]
    pub bid: Option<bool>,

    #[serde(default)]
    pub draft: Option<bool>,
}

// Years 2016-2099, as organizers wrote them into event names.
const YEAR: &str = r"(?:201[6-9]|20[2-9]\d)";

static YEAR_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (format!(r"\s*\({YEAR}\)\s*"), " "),
        (format!(r"^{YEAR}\s*[-–—]?\s*"), ""),
        (format!(r"\s*[-–—,]\s*{YEAR}\s*$"), ""),
        (format!(r"\s+{YEAR}\s*$"), ""),
        (format!(r"^{YEAR}\s+"), ""),
        (format!(r"\s+{YEAR}\s+"), " "),
        (r"\s+".to_string(), " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(&pattern).expect("year pattern must compile"),
            replacement,
        )
    })
    .collect()
});

/// Strip the year from an event name for display ("Winter League (2024)" -> "Winter League").
pub fn remove_year_from_event_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return String::new();
    };

    let mut cleaned = name.to_string();
    for (pattern, replacement) in YEAR_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned.trim().to_string()
}

impl Event {
    pub fn new(id: EventId, name: &str) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            start_date: None,
            winner: None,
            num_players_per_game: None,
            rating_event: None,
            bid: None,
            draft: None,
        }
    }

    /// Builder method to set the start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Builder method to set the winner.
    pub fn with_winner(mut self, winner: PlayerId) -> Self {
        self.winner = Some(winner);
        self
    }

    /// Builder method to set seats per game.
    pub fn with_players_per_game(mut self, count: u32) -> Self {
        self.num_players_per_game = Some(count);
        self
    }

    /// Builder method to flag the event as rated.
    pub fn with_rating_event(mut self, rated: bool) -> Self {
        self.rating_event = Some(rated);
        self
    }

    /// Bracket format, fixed for the whole event.
    pub fn format(&self) -> TournamentFormat {
        TournamentFormat::detect(self.name.as_deref())
    }

    /// Name with the year removed.
    pub fn display_name(&self) -> String {
        remove_year_from_event_name(self.name.as_deref())
    }

    /// Games seat more than two players.
    pub fn is_multiplayer(&self) -> bool {
        self.num_players_per_game.is_some_and(|n| n > 2)
    }

    /// Rated events with 3 or 4 player games contribute to the rating chart.
    pub fn is_rating_event(&self) -> bool {
        self.rating_event == Some(true) && self.is_multiplayer()
    }
}
