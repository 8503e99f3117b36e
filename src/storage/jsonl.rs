//! JSONL (JSON Lines) table exports.
//!
//! Each table is exported to `tables/<table>.jsonl`, one row per line. A
//! missing file is an empty table; a line that fails to parse is logged and
//! skipped so one bad row cannot hide a whole tournament.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{DataSource, StorageConfig, StorageError};
use crate::models::{
    Event, EventId, EventParticipation, Game, GameId, GameParticipation, Player, PlayerId,
};

/// Stored tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Events,
    Games,
    GameParticipation,
    Players,
    EventParticipation,
}

impl Table {
    /// Table name as used by the database.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Events => "events",
            Table::Games => "games",
            Table::GameParticipation => "game_participation",
            Table::Players => "players",
            Table::EventParticipation => "event_participation",
        }
    }

    /// Get the export filename for this table.
    pub fn filename(&self) -> String {
        format!("{}.jsonl", self.name())
    }
}

#[cfg(test)]
pub(crate) use export::JsonlWriter;

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_table(config: &StorageConfig, table: Table) -> Self {
        Self::new(config.table_path(table))
    }

    /// Read every row; a missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            debug!("No export at {:?}, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut rows = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }

    /// Read rows matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

/// [`DataSource`] over a directory of table exports.
///
/// Files are re-read on every call, so a refreshed export is picked up
/// without restarting.
#[derive(Debug, Clone)]
pub struct JsonlSource {
    config: StorageConfig,
}

impl JsonlSource {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn reader<T: DeserializeOwned>(&self, table: Table) -> JsonlReader<T> {
        JsonlReader::for_table(&self.config, table)
    }
}

fn by_creation(a: &Game, b: &Game) -> std::cmp::Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl DataSource for JsonlSource {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn events(&self) -> Result<Vec<Event>, StorageError> {
        self.reader(Table::Events).read_all()
    }

    async fn event(&self, id: EventId) -> Result<Option<Event>, StorageError> {
        let events: Vec<Event> = self.reader(Table::Events).read_where(|e: &Event| e.id == id)?;
        Ok(events.into_iter().next())
    }

    async fn games_for_event(&self, event: EventId) -> Result<Vec<Game>, StorageError> {
        let mut games: Vec<Game> = self
            .reader(Table::Games)
            .read_where(|g: &Game| g.event_id == event)?;
        games.sort_by(by_creation);
        Ok(games)
    }

    async fn latest_games(&self, event: EventId, limit: usize) -> Result<Vec<Game>, StorageError> {
        let mut games = self.games_for_event(event).await?;
        games.reverse();
        games.truncate(limit);
        Ok(games)
    }

    async fn games_by_ids(&self, ids: &[GameId]) -> Result<Vec<Game>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: HashSet<GameId> = ids.iter().copied().collect();
        self.reader(Table::Games)
            .read_where(|g: &Game| wanted.contains(&g.id))
    }

    async fn participation_for_games(
        &self,
        ids: &[GameId],
    ) -> Result<Vec<GameParticipation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: HashSet<GameId> = ids.iter().copied().collect();
        self.reader(Table::GameParticipation)
            .read_where(|p: &GameParticipation| wanted.contains(&p.game_id))
    }

    async fn participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<GameParticipation>, StorageError> {
        self.reader(Table::GameParticipation)
            .read_where(|p: &GameParticipation| p.player_id == player)
    }

    async fn players(&self) -> Result<Vec<Player>, StorageError> {
        self.reader(Table::Players).read_all()
    }

    async fn players_by_ids(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: HashSet<PlayerId> = ids.iter().copied().collect();
        self.reader(Table::Players)
            .read_where(|p: &Player| wanted.contains(&p.id))
    }

    async fn player_by_username(&self, username: &str) -> Result<Option<Player>, StorageError> {
        let players: Vec<Player> = self
            .reader(Table::Players)
            .read_where(|p: &Player| p.username == username)?;
        Ok(players.into_iter().next())
    }

    async fn event_participation_for_events(
        &self,
        ids: &[EventId],
    ) -> Result<Vec<EventParticipation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: HashSet<EventId> = ids.iter().copied().collect();
        self.reader(Table::EventParticipation)
            .read_where(|p: &EventParticipation| wanted.contains(&p.event_id))
    }

    async fn event_participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<EventParticipation>, StorageError> {
        self.reader(Table::EventParticipation)
            .read_where(|p: &EventParticipation| p.player_id == player)
    }

    async fn last_game_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        let games: Vec<Game> = self.reader(Table::Games).read_all()?;
        Ok(games.iter().map(|g| g.created_at).max())
    }
}
