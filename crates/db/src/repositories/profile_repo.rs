//! Repository for the `profiles` table.

use sqlx::PgPool;
use streamshelf_core::types::DbId;

use crate::models::profile::{CreateProfile, Profile};

/// Column list for the `profiles` table.
const COLUMNS: &str = "id, user_id, name, is_kids, created_at, updated_at";

/// Provides data access for viewing profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, name, is_kids) \
             VALUES ($1, $2, COALESCE($3, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(input.is_kids)
            .fetch_one(pool)
            .await
    }

    /// Find a profile only if it belongs to the given user.
    ///
    /// Returns `None` both for unknown ids and for profiles owned by someone
    /// else, so callers cannot probe other accounts' profile ids.
    pub async fn find_owned(
        pool: &PgPool,
        profile_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Profile>(&query)
            .bind(profile_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
