//! Viewing profile model and DTOs.
//!
//! A user owns one or more profiles; all playback state is scoped to a
//! `(user, profile)` pair.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamshelf_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub is_kids: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new profile.
#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub user_id: DbId,
    pub name: String,
    pub is_kids: Option<bool>,
}
