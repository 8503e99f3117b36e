//! Rating leaderboard and the rated-events archive.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Pagination, PaginationMeta, QueryError};
use crate::models::{Event, EventId, Player, PlayerSummary};
use crate::storage::DataSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based position
    pub rank: u32,
    pub player: PlayerSummary,

    /// Rounded rating ordinal; absent for unrated players
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub players: Vec<LeaderboardRow>,
    pub pagination: PaginationMeta,
}

/// Order players by rating, highest first; unrated players go last.
pub fn rank_players(mut players: Vec<Player>) -> Vec<LeaderboardRow> {
    players.sort_by(|a, b| {
        let by_rating = match (&a.current_rating, &b.current_rating) {
            (Some(a), Some(b)) => b.ordinal.total_cmp(&a.ordinal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_rating.then_with(|| a.username.cmp(&b.username))
    });

    players
        .iter()
        .zip(1u32..)
        .map(|(player, rank)| LeaderboardRow {
            rank,
            player: player.summary(),
            rating: player.current_rating.map(|r| r.rounded()),
        })
        .collect()
}

pub async fn leaderboard(
    source: &dyn DataSource,
    pagination: &Pagination,
) -> Result<Leaderboard, QueryError> {
    let rows = rank_players(source.players().await?);
    let total = u32::try_from(rows.len()).unwrap_or(u32::MAX);

    Ok(Leaderboard {
        players: pagination.apply(rows),
        pagination: PaginationMeta::new(pagination, total),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEvent {
    pub id: EventId,
    pub name: String,
    pub start_date: NaiveDate,
}

/// Rated events held in one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: i32,
    pub events: Vec<YearEvent>,
}

/// Group rated events by start year, newest year first and newest event first.
pub fn group_events_by_year(events: &[Event]) -> Vec<YearGroup> {
    let mut years: BTreeMap<i32, Vec<YearEvent>> = BTreeMap::new();

    for event in events.iter().filter(|e| e.rating_event == Some(true)) {
        let Some(start_date) = event.start_date else {
            debug!(event = %event.id, "Skipping rated event without a start date");
            continue;
        };
        years.entry(start_date.year()).or_default().push(YearEvent {
            id: event.id,
            name: event.display_name(),
            start_date,
        });
    }

    years
        .into_iter()
        .rev()
        .map(|(year, mut events)| {
            events.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| b.id.cmp(&a.id)));
            YearGroup { year, events }
        })
        .collect()
}

pub async fn events_by_year(source: &dyn DataSource) -> Result<Vec<YearGroup>, QueryError> {
    let events = source.events().await?;
    Ok(group_events_by_year(&events))
}
