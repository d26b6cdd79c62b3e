use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A referenced unit exists but does not belong to the claimed parent
    /// (e.g. an episode from a different show).
    #[error("Mismatch: {0}")]
    Mismatch(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required piece of request context is missing, such as the
    /// viewer's active profile.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
