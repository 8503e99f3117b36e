//! Data models read from the backing store, plus derived records.

mod event;
mod game;
mod ids;
mod player;
mod record;

pub use event::*;
pub use game::*;
pub use ids::*;
pub use player::*;
pub use record::*;
