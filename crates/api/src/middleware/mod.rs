//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::CurrentViewer`] -- Additionally requires an active profile owned by that user.

pub mod auth;
