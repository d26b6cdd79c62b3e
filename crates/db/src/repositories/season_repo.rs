//! Repository for the `seasons` table.

use sqlx::PgPool;

use crate::models::content::{CreateSeason, Season};

/// Column list for the `seasons` table.
const COLUMNS: &str = "id, content_id, season_number, title, created_at, updated_at";

/// Provides data access for TV show seasons.
pub struct SeasonRepo;

impl SeasonRepo {
    /// Insert a new season, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSeason) -> Result<Season, sqlx::Error> {
        let query = format!(
            "INSERT INTO seasons (content_id, season_number, title) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(input.content_id)
            .bind(input.season_number)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }
}
