//! Route definitions for generic watch-progress reporting.

use axum::routing::get;
use axum::Router;

use crate::handlers::watch_progress;
use crate::state::AppState;

/// Routes mounted at `/watch-progress`.
///
/// ```text
/// GET    /    -> get_progress
/// POST   /    -> record_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(watch_progress::get_progress).post(watch_progress::record_progress),
    )
}
