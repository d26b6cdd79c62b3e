//! Repository for the `content` table.

use sqlx::PgPool;
use streamshelf_core::types::DbId;

use crate::models::content::{Content, CreateContent};

/// Column list for the `content` table.
const COLUMNS: &str = "id, title, content_type, description, poster_url, backdrop_url, \
    release_year, duration_secs, created_at, updated_at";

/// Provides data access for catalog content items.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a new content item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateContent) -> Result<Content, sqlx::Error> {
        let query = format!(
            "INSERT INTO content \
                (title, content_type, description, poster_url, backdrop_url, release_year, duration_secs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(&input.title)
            .bind(&input.content_type)
            .bind(&input.description)
            .bind(&input.poster_url)
            .bind(&input.backdrop_url)
            .bind(input.release_year)
            .bind(input.duration_secs)
            .fetch_one(pool)
            .await
    }

    /// Find a content item by its internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content WHERE id = $1");
        sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
