//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation. Tokens carry the
//!   user id and the active viewing profile.

pub mod jwt;
