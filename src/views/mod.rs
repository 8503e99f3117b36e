//! View models assembled from stored rows.
//!
//! - **tournament**: bracket for one event, tournament list
//! - **leaderboard**: rating leaderboard, rated events by year
//! - **player**: player profile and nemeses
//!
//! Each view fetches through a [`DataSource`] and hands complete inputs to the
//! pure bracket and calculation code.

pub mod leaderboard;
pub mod player;
pub mod tournament;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PlayerId, PlayerSummary};
use crate::storage::{fetch_in_batches, DataSource, StorageError};

pub use leaderboard::{events_by_year, leaderboard, Leaderboard, LeaderboardRow, YearGroup};
pub use player::{player_nemeses, player_profile, Nemesis, PlayerProfile};
pub use tournament::{tournament_bracket, tournament_list, TournamentBracket, TournamentList};

/// Errors returned by view assembly.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    /// Items before this page; pins at `u32::MAX` for pages past any real table.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// The slice of `items` on this page.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.page_size as usize)
            .collect()
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Look up usernames for `ids`, batched. Unknown ids are simply absent.
pub(crate) async fn player_directory(
    source: &dyn DataSource,
    ids: &[PlayerId],
    batch_size: usize,
) -> Result<HashMap<PlayerId, PlayerSummary>, StorageError> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let players = fetch_in_batches(&ids, batch_size, |chunk| source.players_by_ids(chunk)).await?;
    Ok(players.iter().map(|p| (p.id, p.summary())).collect())
}
