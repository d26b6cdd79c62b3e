//! Route definitions for per-title watch history and the resume shelf.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::watch_progress;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /continue-watching                                          -> list_continue_watching
/// DELETE /continue-watching/{entry_id}                               -> dismiss_continue_watching
/// GET    /watch-history                                              -> list_watch_history
/// POST   /{content_id}/watch-history                                 -> record_title_progress
/// POST   /tv-show/{content_id}/season/{season_number}/episode/{episode_number}/watch-history
///                                                                    -> record_episode_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/continue-watching",
            get(watch_progress::list_continue_watching),
        )
        .route(
            "/continue-watching/{entry_id}",
            delete(watch_progress::dismiss_continue_watching),
        )
        .route("/watch-history", get(watch_progress::list_watch_history))
        .route(
            "/{content_id}/watch-history",
            post(watch_progress::record_title_progress),
        )
        .route(
            "/tv-show/{content_id}/season/{season_number}/episode/{episode_number}/watch-history",
            post(watch_progress::record_episode_progress),
        )
}
