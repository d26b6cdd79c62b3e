//! Handlers for playback progress reporting and the resume shelf.
//!
//! Every report funnels through [`apply_report`]: the catalog is consulted
//! first to pin down the watchable unit, the report is evaluated against the
//! completion threshold, and only then is anything written.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use streamshelf_core::catalog::is_episodic;
use streamshelf_core::error::CoreError;
use streamshelf_core::types::{DbId, Timestamp};
use streamshelf_core::watch_progress::{self, Viewer, WatchState, WatchUnit};
use streamshelf_db::models::content::Content;
use streamshelf_db::models::watch_progress::{
    ContinueWatchingEntry, ContinueWatchingRow, WatchRecord,
};
use streamshelf_db::repositories::{ContentRepo, EpisodeRepo, WatchProgressRepo};
use streamshelf_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::CurrentViewer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /api/watch-progress`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordProgressRequest {
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
    #[validate(range(min = 0.0))]
    pub progress_seconds: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub duration_seconds: f64,
}

/// Body for the per-title `watch-history` endpoints.
///
/// `duration` falls back to the catalog runtime when omitted. `completed`
/// marks the unit watched by reporting the full duration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WatchHistoryRequest {
    #[validate(range(min = 0.0))]
    pub progress: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub duration: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// Query for `GET /api/watch-progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProgressQuery {
    pub content_id: DbId,
    pub episode_id: Option<DbId>,
}

/// Current state of one unit for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProgressStatus {
    pub state: WatchState,
    pub record: Option<WatchRecord>,
    pub continue_watching: Option<ContinueWatchingEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: DbId,
    pub title: String,
    pub content_type: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub id: DbId,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// One tile on the resume shelf.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingItem {
    pub id: DbId,
    pub progress: f64,
    pub duration: f64,
    pub completion_percentage: f64,
    pub updated_at: Timestamp,
    pub is_episode: bool,
    pub content: ContentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeSummary>,
}

impl From<ContinueWatchingRow> for ContinueWatchingItem {
    fn from(row: ContinueWatchingRow) -> Self {
        let episode = row.episode_id.map(|id| EpisodeSummary {
            id,
            season_number: row.season_number,
            episode_number: row.episode_number,
            title: row.episode_title,
            thumbnail_url: row.episode_thumbnail_url,
        });
        Self {
            id: row.id,
            progress: row.progress_secs,
            duration: row.duration_secs,
            completion_percentage: row.completion_percentage,
            updated_at: row.last_watched_at,
            is_episode: episode.is_some(),
            content: ContentSummary {
                id: row.content_id,
                title: row.content_title,
                content_type: row.content_type,
                poster_url: row.poster_url,
                backdrop_url: row.backdrop_url,
            },
            episode,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_content(pool: &DbPool, content_id: DbId) -> AppResult<Content> {
    ContentRepo::find_by_id(pool, content_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Content",
            id: content_id,
        }))
}

/// Evaluate a report and persist it for an already-resolved unit.
async fn apply_report(
    pool: &DbPool,
    viewer: &Viewer,
    unit: &WatchUnit,
    progress_secs: f64,
    duration_secs: f64,
) -> AppResult<WatchRecord> {
    let outcome = watch_progress::evaluate(progress_secs, duration_secs)?;
    let record = WatchProgressRepo::record(pool, viewer, unit, &outcome).await?;

    tracing::info!(
        user_id = viewer.user_id,
        profile_id = viewer.profile_id,
        content_id = unit.content_id(),
        episode_id = ?unit.episode_id(),
        completion_percentage = outcome.completion_percentage,
        completed = outcome.completed,
        "Recorded watch progress",
    );
    Ok(record)
}

/// Resolve the progress to store for a per-title report.
///
/// A `completed` flag reports the full duration so the threshold rule still
/// makes the decision.
fn reported_progress(body: &WatchHistoryRequest, duration_secs: f64) -> f64 {
    if body.completed {
        duration_secs
    } else {
        body.progress
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/watch-progress
///
/// Record progress for a movie (`contentId`) or an episode
/// (`contentId` + `episodeId`). The episode must belong to one of the
/// content item's seasons.
pub async fn record_progress(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    ValidatedJson(body): ValidatedJson<RecordProgressRequest>,
) -> AppResult<impl IntoResponse> {
    // Reject before touching the catalog.
    watch_progress::validate_progress(body.progress_seconds, body.duration_seconds)?;

    let content = find_content(&state.pool, body.content_id).await?;

    let unit = match body.episode_id {
        Some(episode_id) => {
            EpisodeRepo::find_in_content(&state.pool, episode_id, content.id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Mismatch(format!(
                        "Episode {episode_id} does not belong to content {}",
                        content.id
                    )))
                })?;
            WatchUnit::Episode {
                content_id: content.id,
                episode_id,
            }
        }
        None if is_episodic(&content.content_type) => {
            return Err(AppError::Core(CoreError::Validation(
                "episodeId is required when reporting progress for a TV show".into(),
            )));
        }
        None => WatchUnit::Movie {
            content_id: content.id,
        },
    };

    let record = apply_report(
        &state.pool,
        &viewer,
        &unit,
        body.progress_seconds,
        body.duration_seconds,
    )
    .await?;
    Ok(Json(DataResponse::ok(record)))
}

/// GET /api/watch-progress?contentId=..&episodeId=..
///
/// Report the viewer's state for a single unit.
pub async fn get_progress(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Query(query): Query<WatchProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let unit = WatchUnit::new(query.content_id, query.episode_id);

    let record = WatchProgressRepo::find_record(&state.pool, &viewer, &unit).await?;
    let continue_watching = WatchProgressRepo::find_entry(&state.pool, &viewer, &unit).await?;

    Ok(Json(DataResponse::ok(WatchProgressStatus {
        state: WatchState::from_record(record.as_ref().map(|r| r.completed)),
        record,
        continue_watching,
    })))
}

/// POST /api/content/{content_id}/watch-history
///
/// Record progress for a movie or special.
pub async fn record_title_progress(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(content_id): Path<DbId>,
    ValidatedJson(body): ValidatedJson<WatchHistoryRequest>,
) -> AppResult<impl IntoResponse> {
    let content = find_content(&state.pool, content_id).await?;

    if is_episodic(&content.content_type) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Content {content_id} is a TV show; report progress per episode"
        ))));
    }

    let duration_secs = body.duration.or(content.duration_secs).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "duration is required: the catalog has no runtime for this title".into(),
        ))
    })?;

    let unit = WatchUnit::Movie {
        content_id: content.id,
    };
    let progress = reported_progress(&body, duration_secs);
    let record = apply_report(&state.pool, &viewer, &unit, progress, duration_secs).await?;
    Ok(Json(DataResponse::ok(record)))
}

/// POST /api/content/tv-show/{content_id}/season/{season_number}/episode/{episode_number}/watch-history
///
/// Record progress for an episode identified by its position in the show.
pub async fn record_episode_progress(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path((content_id, season_number, episode_number)): Path<(DbId, i32, i32)>,
    ValidatedJson(body): ValidatedJson<WatchHistoryRequest>,
) -> AppResult<impl IntoResponse> {
    let content = find_content(&state.pool, content_id).await?;

    if !is_episodic(&content.content_type) {
        return Err(AppError::Core(CoreError::Mismatch(format!(
            "Content {content_id} is not a TV show"
        ))));
    }

    let episode =
        EpisodeRepo::find_by_number(&state.pool, content.id, season_number, episode_number)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Mismatch(format!(
                    "Season {season_number} episode {episode_number} not found for content {content_id}"
                )))
            })?;

    let duration_secs = body.duration.or(episode.duration_secs).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "duration is required: the catalog has no runtime for this episode".into(),
        ))
    })?;

    let unit = WatchUnit::Episode {
        content_id: content.id,
        episode_id: episode.id,
    };
    let progress = reported_progress(&body, duration_secs);
    let record = apply_report(&state.pool, &viewer, &unit, progress, duration_secs).await?;
    Ok(Json(DataResponse::ok(record)))
}

/// GET /api/content/continue-watching
///
/// The viewer's resume shelf, most recently watched first.
pub async fn list_continue_watching(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<impl IntoResponse> {
    let rows = WatchProgressRepo::list_continue_watching(
        &state.pool,
        &viewer,
        state.config.pages.continue_watching,
    )
    .await?;
    let items: Vec<ContinueWatchingItem> = rows.into_iter().map(Into::into).collect();
    Ok(Json(DataResponse::ok(items)))
}

/// DELETE /api/content/continue-watching/{entry_id}
///
/// Remove an entry from the shelf without touching its history record.
pub async fn dismiss_continue_watching(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(entry_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let dismissed = WatchProgressRepo::dismiss(&state.pool, &viewer, entry_id).await?;
    if dismissed {
        tracing::info!(
            user_id = viewer.user_id,
            profile_id = viewer.profile_id,
            entry_id,
            "Continue-watching entry dismissed",
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ContinueWatchingEntry",
            id: entry_id,
        }))
    }
}

/// GET /api/content/watch-history
///
/// The viewer's watch history, newest first.
pub async fn list_watch_history(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<impl IntoResponse> {
    let items =
        WatchProgressRepo::list_history(&state.pool, &viewer, state.config.pages.history).await?;
    Ok(Json(DataResponse::ok(items)))
}
