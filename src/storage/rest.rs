//! PostgREST client for the live database.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::{DataSource, StorageError, Table};
use crate::config::SourceConfig;
use crate::models::{
    Event, EventId, EventParticipation, Game, GameId, GameParticipation, Player, PlayerId,
    RowId,
};

/// Row ordering for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// A PostgREST read: table, filters, ordering and limit.
#[derive(Debug, Clone)]
pub struct Query {
    table: Table,
    filters: Vec<(&'static str, String)>,
    order: Option<(&'static str, Direction)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// `column = value`
    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push((column, format!("eq.{}", value.to_string())));
        self
    }

    /// `column IN (ids)`
    pub fn in_ids(mut self, column: &'static str, ids: &[RowId]) -> Self {
        let list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column, format!("in.({list})")));
        self
    }

    pub fn order(mut self, column: &'static str, direction: Direction) -> Self {
        self.order = Some((column, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the request URL under `base` (the REST root, e.g. `.../rest/v1/`).
    pub fn to_url(&self, base: &Url) -> Result<Url, StorageError> {
        let mut url = base.join(self.table.name())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for (column, filter) in &self.filters {
                pairs.append_pair(column, filter);
            }
            if let Some((column, direction)) = self.order {
                pairs.append_pair("order", &format!("{column}.{}", direction.as_str()));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

/// [`DataSource`] backed by a PostgREST endpoint.
pub struct RestSource {
    client: Client,
    base_url: Url,
}

impl RestSource {
    /// Create a client for the REST root at `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ladder-board/", env!("CARGO_PKG_VERSION"))),
        );
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| StorageError::InvalidConfig("API key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StorageError::InvalidConfig("API key is not a valid header value".into()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    /// Build from configuration, reading the key from the configured environment variable.
    pub fn from_config(config: &SourceConfig) -> Result<Self, StorageError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| StorageError::InvalidConfig("rest backend requires base_url".into()))?;
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| StorageError::MissingCredentials(config.api_key_env.clone()))?;

        info!("Using REST source at {}", base_url);
        Self::new(
            base_url,
            &api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, query: Query) -> Result<Vec<T>, StorageError> {
        let url = query.to_url(&self.base_url)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(StorageError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn first<T: DeserializeOwned>(&self, query: Query) -> Result<Option<T>, StorageError> {
        let rows: Vec<T> = self.fetch(query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }
}

/// Ensure the REST root ends with `/` so table names join beneath it.
fn normalize_base(base_url: &str) -> Result<Url, StorageError> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{base_url}/"))?)
    }
}

#[async_trait]
impl DataSource for RestSource {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn events(&self) -> Result<Vec<Event>, StorageError> {
        self.fetch(Query::new(Table::Events)).await
    }

    async fn event(&self, id: EventId) -> Result<Option<Event>, StorageError> {
        self.first(Query::new(Table::Events).eq("id", id)).await
    }

    async fn games_for_event(&self, event: EventId) -> Result<Vec<Game>, StorageError> {
        self.fetch(
            Query::new(Table::Games)
                .eq("event", event)
                .order("created_at", Direction::Ascending),
        )
        .await
    }

    async fn latest_games(&self, event: EventId, limit: usize) -> Result<Vec<Game>, StorageError> {
        self.fetch(
            Query::new(Table::Games)
                .eq("event", event)
                .order("created_at", Direction::Descending)
                .limit(limit),
        )
        .await
    }

    async fn games_by_ids(&self, ids: &[GameId]) -> Result<Vec<Game>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(Query::new(Table::Games).in_ids("id", ids)).await
    }

    async fn participation_for_games(
        &self,
        ids: &[GameId],
    ) -> Result<Vec<GameParticipation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(Query::new(Table::GameParticipation).in_ids("game", ids))
            .await
    }

    async fn participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<GameParticipation>, StorageError> {
        self.fetch(Query::new(Table::GameParticipation).eq("player", player))
            .await
    }

    async fn players(&self) -> Result<Vec<Player>, StorageError> {
        self.fetch(Query::new(Table::Players)).await
    }

    async fn players_by_ids(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(Query::new(Table::Players).in_ids("id", ids)).await
    }

    async fn player_by_username(&self, username: &str) -> Result<Option<Player>, StorageError> {
        self.first(Query::new(Table::Players).eq("username", username))
            .await
    }

    async fn event_participation_for_events(
        &self,
        ids: &[EventId],
    ) -> Result<Vec<EventParticipation>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(Query::new(Table::EventParticipation).in_ids("event", ids))
            .await
    }

    async fn event_participation_for_player(
        &self,
        player: PlayerId,
    ) -> Result<Vec<EventParticipation>, StorageError> {
        self.fetch(Query::new(Table::EventParticipation).eq("player", player))
            .await
    }

    async fn last_game_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        let game: Option<Game> = self
            .first(Query::new(Table::Games).order("created_at", Direction::Descending))
            .await?;
        Ok(game.map(|g| g.created_at))
    }
}
