//! Bracket construction.
//!
//! - **format**: event name -> tournament format
//! - **parser**: free-text game label -> section, display name and sort order
//! - **grouper**: parsed games -> ordered bracket sections
//!
//! Everything here is pure and synchronous; callers assemble complete inputs first.

pub mod format;
pub mod grouper;
pub mod parser;

pub use format::TournamentFormat;
pub use grouper::{group_games_by_section, select_games, BracketGame, SectionGroup};
pub use parser::{parse_game_name, ParsedGame, Stage};
