//! Watch-history records and continue-watching entries.
//!
//! Both tables share the same key shape: `(user_id, profile_id, episode_id)`
//! for episodes and `(user_id, profile_id, content_id)` with a null
//! `episode_id` for movies and specials.

use serde::Serialize;
use sqlx::FromRow;
use streamshelf_core::types::{DbId, Timestamp};

/// A row from the `watch_history` table: the last known playback state for
/// one viewer and one watchable unit.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub profile_id: DbId,
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
    pub progress_secs: f64,
    pub duration_secs: f64,
    pub completion_percentage: f64,
    pub completed: bool,
    pub last_watched_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `continue_watching` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub profile_id: DbId,
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
    pub progress_secs: f64,
    pub duration_secs: f64,
    pub completion_percentage: f64,
    pub status: String,
    pub last_watched_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A continue-watching entry joined with its content and, for episodes, the
/// season/episode identity needed to resume playback.
#[derive(Debug, Clone, FromRow)]
pub struct ContinueWatchingRow {
    pub id: DbId,
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
    pub progress_secs: f64,
    pub duration_secs: f64,
    pub completion_percentage: f64,
    pub last_watched_at: Timestamp,
    pub content_title: String,
    pub content_type: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_title: Option<String>,
    pub episode_thumbnail_url: Option<String>,
}

/// A watch-history record joined with its content title for the history
/// page.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub id: DbId,
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
    pub progress_secs: f64,
    pub duration_secs: f64,
    pub completion_percentage: f64,
    pub completed: bool,
    pub last_watched_at: Timestamp,
    pub content_title: String,
    pub content_type: String,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_title: Option<String>,
}
