//! Bracket section grouping.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ParsedGame;
use crate::models::{GameId, Participant};

/// Dedup key shared by games without a name.
const UNNAMED_KEY: &str = "unnamed";

/// A game ready for bracket display: its parse result and resolved participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketGame {
    pub id: GameId,

    /// Raw organizer label
    pub name: Option<String>,

    #[serde(flatten)]
    pub parsed: ParsedGame,

    pub participants: Vec<Participant>,
}

impl BracketGame {
    pub fn new(
        id: GameId,
        name: Option<String>,
        parsed: ParsedGame,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            id,
            name,
            parsed,
            participants,
        }
    }

    /// Raw name, or the shared key when the name is missing or blank.
    fn dedup_key(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNNAMED_KEY)
    }
}

/// One bracket stage (round, tier or elimination stage) and its ordered games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub section_key: String,
    pub section_label: String,
    pub sort_order: u32,
    pub games: Vec<BracketGame>,
}

/// Drop games nobody played and keep the first game per raw name.
///
/// Only games that have participants count toward the "first" of a name, so
/// an empty re-entered row never shadows the real one.
pub fn select_games(games: Vec<BracketGame>) -> Vec<BracketGame> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut selected = Vec::with_capacity(games.len());

    for game in games {
        if game.participants.is_empty() {
            tracing::trace!(game = %game.id, "Skipping game without participants");
            continue;
        }
        if !seen.insert(game.dedup_key().to_string()) {
            tracing::debug!(game = %game.id, name = game.dedup_key(), "Skipping duplicate game name");
            continue;
        }
        selected.push(game);
    }

    selected
}

/// Bucket games by section and order both sections and games.
///
/// A section takes its label from the first game seen and its sort order from
/// its lowest-ordered game. Sections sort by `(sort_order, section_key)`; games
/// inside a section by `(sort_order, display_name)`, where display names compare
/// digit runs numerically ("T9" before "T10"), with the game id as a final
/// tie-break so the layout never depends on input order.
pub fn group_games_by_section(games: Vec<BracketGame>) -> Vec<SectionGroup> {
    let mut sections: Vec<SectionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for game in select_games(games) {
        let slot = match index.get(&game.parsed.section_key) {
            Some(&slot) => slot,
            None => {
                index.insert(game.parsed.section_key.clone(), sections.len());
                sections.push(SectionGroup {
                    section_key: game.parsed.section_key.clone(),
                    section_label: game.parsed.section_label.clone(),
                    sort_order: game.parsed.sort_order,
                    games: Vec::new(),
                });
                sections.len() - 1
            }
        };
        sections[slot].games.push(game);
    }

    for section in &mut sections {
        section.games.sort_by(|a, b| {
            a.parsed
                .sort_order
                .cmp(&b.parsed.sort_order)
                .then_with(|| natural_cmp(&a.parsed.display_name, &b.parsed.display_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        // Lowest game order; bands never overlap across sections
        if let Some(first) = section.games.first() {
            section.sort_order = first.parsed.sort_order;
        }
    }
    sections.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.section_key.cmp(&b.section_key))
    });

    sections
}

/// Compare labels reading runs of ASCII digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        let (Some(x), Some(y)) = (a.chars().next(), b.chars().next()) else {
            return a.len().cmp(&b.len());
        };
        if x.is_ascii_digit() && y.is_ascii_digit() {
            let (digits_a, rest_a) = split_digits(a);
            let (digits_b, rest_b) = split_digits(b);
            let ordering = compare_digits(digits_a, digits_b);
            if ordering != Ordering::Equal {
                return ordering;
            }
            (a, b) = (rest_a, rest_b);
        } else {
            if x != y {
                return x.cmp(&y);
            }
            (a, b) = (&a[x.len_utf8()..], &b[y.len_utf8()..]);
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

// Arbitrary length: compare significant digits without parsing
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
