pub mod content;
pub mod health;
pub mod watch_progress;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /watch-progress                                   get state, record progress
///
/// /content/continue-watching                        resume shelf (GET)
/// /content/continue-watching/{entry_id}             dismiss entry (DELETE)
/// /content/watch-history                            history listing (GET)
/// /content/{content_id}/watch-history               movie/special report (POST)
/// /content/tv-show/{content_id}/season/{season_number}/episode/{episode_number}/watch-history
///                                                   episode report (POST)
/// ```
///
/// Every route requires a bearer token naming an active profile.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/watch-progress", watch_progress::router())
        .nest("/content", content::router())
}
