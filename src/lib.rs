//! # Ladder Board
//!
//! Tournament rating leaderboard and bracket viewer for a board game community.
//!
//! ## Architecture
//!
//! - **bracket**: game-name parsing, format detection and bracket grouping
//! - **calculate**: placements, rivalries and other derived statistics
//! - **models**: rows read from the database (events, games, players, results)
//! - **storage**: read-only data sources (JSONL exports, PostgREST)
//! - **views**: tournament, leaderboard and player view models
//! - **config**: configuration loading and validation

pub mod bracket;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod views;

pub use models::*;
