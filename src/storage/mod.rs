//! Read access to the tournament database.
//!
//! The views only ever talk to a [`DataSource`]:
//! - [`JsonlSource`]: one JSONL export per table under `data_dir/tables/`
//! - [`RestSource`]: a PostgREST endpoint over the live tables
//!
//! Both are read-only. Lookups that take id lists expect the caller to chunk
//! them (see [`fetch_in_batches`]).

pub mod jsonl;
pub mod rest;

use std::future::Future;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{AppConfig, SourceBackend};
use crate::models::{
    Event, EventId, EventParticipation, Game, GameId, GameParticipation, Player, PlayerId,
};

#[cfg(test)]
pub(crate) use jsonl::JsonlWriter;
pub use jsonl::{JsonlReader, JsonlSource, Table};
pub use rest::RestSource;

/// Errors that can occur while reading stored rows.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("Invalid source configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory holding one `<table>.jsonl` export per table.
    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir.join("tables")
    }

    pub fn table_path(&self, table: Table) -> PathBuf {
        self.tables_dir().join(table.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read-only queries the views need from the database.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name of this source for logging.
    fn name(&self) -> &'static str;

    async fn events(&self) -> Result<Vec<Event>, StorageError>;

    async fn event(&self, id: EventId) -> Result<Option<Event>, StorageError>;

    /// Games of one event, oldest first.
    async fn games_for_event(&self, event: EventId) -> Result<Vec<Game>, StorageError>;

    /// The `limit` most recent games of one event, newest first.
    async fn latest_games(&self, event: EventId, limit: usize) -> Result<Vec<Game>, StorageError>;

    async fn games_by_ids(&self, ids: &[GameId]) -> Result<Vec<Game>, StorageError>;

    async fn participation_for_games(
        &self,
        ids: &[GameId],
    ) -> Result<Vec<GameParticipation>, StorageError>;

    async fn participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<GameParticipation>, StorageError>;

    async fn players(&self) -> Result<Vec<Player>, StorageError>;

    async fn players_by_ids(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StorageError>;

    async fn player_by_username(&self, username: &str) -> Result<Option<Player>, StorageError>;

    async fn event_participation_for_events(
        &self,
        ids: &[EventId],
    ) -> Result<Vec<EventParticipation>, StorageError>;

    async fn event_participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<EventParticipation>, StorageError>;

    /// Creation time of the newest game anywhere.
    async fn last_game_at(&self) -> Result<Option<DateTime<Utc>>, StorageError>;
}

/// Open the source selected by the configuration.
pub fn open_source(config: &AppConfig) -> Result<Box<dyn DataSource>, StorageError> {
    match config.source.backend {
        SourceBackend::Jsonl => Ok(Box::new(JsonlSource::new(StorageConfig::new(
            config.data_dir.clone(),
        )))),
        SourceBackend::Rest => Ok(Box::new(RestSource::from_config(&config.source)?)),
    }
}

/// Run an id-list lookup in chunks of `batch_size` and concatenate the results.
pub async fn fetch_in_batches<'a, I, T, F, Fut>(
    ids: &'a [I],
    batch_size: usize,
    mut fetch: F,
) -> Result<Vec<T>, StorageError>
where
    F: FnMut(&'a [I]) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StorageError>>,
{
    let mut rows = Vec::new();
    for chunk in ids.chunks(batch_size.max(1)) {
        rows.extend(fetch(chunk).await?);
    }
    Ok(rows)
}
