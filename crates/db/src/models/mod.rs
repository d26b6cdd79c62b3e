//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the row is created directly

pub mod content;
pub mod profile;
pub mod user;
pub mod watch_progress;
