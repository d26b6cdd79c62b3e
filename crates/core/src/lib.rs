//! Domain types and rules shared by the StreamShelf crates.
//!
//! Nothing in this crate performs I/O; the database and HTTP layers build on
//! top of it.

pub mod catalog;
pub mod error;
pub mod types;
pub mod watch_progress;
