//! Catalog models: content items, seasons and episodes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamshelf_core::types::{DbId, Timestamp};

/// A row from the `content` table (movie, special or TV show).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub title: String,
    pub content_type: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_year: Option<i32>,
    /// Runtime for movies and specials; unset for TV shows.
    pub duration_secs: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a content item.
#[derive(Debug, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub content_type: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_year: Option<i32>,
    pub duration_secs: Option<f64>,
}

/// A row from the `seasons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Season {
    pub id: DbId,
    pub content_id: DbId,
    pub season_number: i32,
    pub title: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a season.
#[derive(Debug, Deserialize)]
pub struct CreateSeason {
    pub content_id: DbId,
    pub season_number: i32,
    pub title: Option<String>,
}

/// A row from the `episodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub season_id: DbId,
    pub episode_number: i32,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an episode.
#[derive(Debug, Deserialize)]
pub struct CreateEpisode {
    pub season_id: DbId,
    pub episode_number: i32,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<f64>,
}
