//! Repository for the `episodes` table.
//!
//! Episodes hang off seasons, which hang off a `TV_SHOW` content item. The
//! lookups here always constrain by the owning show so a caller cannot pair
//! an episode with the wrong series.

use sqlx::PgPool;
use streamshelf_core::types::DbId;

use crate::models::content::{CreateEpisode, Episode};

/// Column list for the `episodes` table.
const COLUMNS: &str =
    "id, season_id, episode_number, title, thumbnail_url, duration_secs, created_at, updated_at";

/// Same columns qualified with the `e` alias, for joins.
const E_COLUMNS: &str = "e.id, e.season_id, e.episode_number, e.title, e.thumbnail_url, \
    e.duration_secs, e.created_at, e.updated_at";

/// Provides data access for TV episodes.
pub struct EpisodeRepo;

impl EpisodeRepo {
    /// Insert a new episode, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEpisode) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO episodes (season_id, episode_number, title, thumbnail_url, duration_secs) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(input.season_id)
            .bind(input.episode_number)
            .bind(&input.title)
            .bind(&input.thumbnail_url)
            .bind(input.duration_secs)
            .fetch_one(pool)
            .await
    }

    /// Find an episode only if it belongs to one of `content_id`'s seasons.
    pub async fn find_in_content(
        pool: &PgPool,
        episode_id: DbId,
        content_id: DbId,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {E_COLUMNS} FROM episodes e \
             JOIN seasons s ON s.id = e.season_id \
             WHERE e.id = $1 AND s.content_id = $2"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(episode_id)
            .bind(content_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve an episode by its position within a show.
    pub async fn find_by_number(
        pool: &PgPool,
        content_id: DbId,
        season_number: i32,
        episode_number: i32,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {E_COLUMNS} FROM episodes e \
             JOIN seasons s ON s.id = e.season_id \
             WHERE s.content_id = $1 AND s.season_number = $2 AND e.episode_number = $3"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(content_id)
            .bind(season_number)
            .bind(episode_number)
            .fetch_optional(pool)
            .await
    }
}
