//! Derived statistics over stored game results.
//!
//! - **placement**: tie-broken placements inside one game
//! - **rivalry**: per-opponent records and nemesis ranking
//!
//! Plus small aggregate helpers used by the player views.

pub mod placement;
pub mod rivalry;

pub use placement::resolve_placements;
pub use rivalry::{find_nemeses, OpponentResult, RivalryAccumulator, MAX_NEMESES, MIN_SHARED_GAMES};

use crate::models::{EventParticipation, Rating};

/// Rating shown for an event whose post-event rating was never computed.
pub const DEFAULT_RATING: i64 = 1200;

/// Total games won across event results; a missing count is zero.
pub fn total_wins(results: &[EventParticipation]) -> u32 {
    results
        .iter()
        .map(|r| r.games_won.unwrap_or(0))
        .fold(0u32, u32::saturating_add)
}

/// Rounded rating ordinal, or [`DEFAULT_RATING`] when absent.
pub fn rating_or_default(rating: Option<&Rating>) -> i64 {
    rating.map_or(DEFAULT_RATING, Rating::rounded)
}
