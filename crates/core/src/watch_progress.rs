//! Watch progress rules: completion threshold, percentage computation,
//! input validation and the continue-watching status names.
//!
//! Every call site that needs to know whether a unit is "completed" goes
//! through [`evaluate`], so the watch-history record and the continue-watching
//! entry are always derived from the same numbers.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Percentage of the duration at or above which a unit counts as completed.
pub const COMPLETION_THRESHOLD_PERCENT: f64 = 90.0;

/// Maximum number of entries returned for the resume shelf.
pub const CONTINUE_WATCHING_LIMIT: i64 = 50;

/// Maximum number of records returned for the watch-history listing.
pub const HISTORY_PAGE_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Continue-watching status names
// ---------------------------------------------------------------------------

/// The viewer is part-way through the unit; shown on the resume shelf.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";

/// The viewer dismissed the entry from the shelf.
pub const STATUS_ABANDONED: &str = "ABANDONED";

// ---------------------------------------------------------------------------
// Progress evaluation
// ---------------------------------------------------------------------------

/// The derived state of a single progress report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressOutcome {
    pub progress_secs: f64,
    pub duration_secs: f64,
    /// Clamped to `[0, 100]`.
    pub completion_percentage: f64,
    pub completed: bool,
}

/// Reject reports that cannot be turned into a completion percentage.
///
/// Both values must be finite, progress must be non-negative and duration
/// strictly positive.
pub fn validate_progress(progress_secs: f64, duration_secs: f64) -> Result<(), CoreError> {
    if !progress_secs.is_finite() {
        return Err(CoreError::Validation(
            "progress must be a finite number".to_string(),
        ));
    }
    if !duration_secs.is_finite() {
        return Err(CoreError::Validation(
            "duration must be a finite number".to_string(),
        ));
    }
    if progress_secs < 0.0 {
        return Err(CoreError::Validation(format!(
            "progress must not be negative, got {progress_secs}"
        )));
    }
    if duration_secs <= 0.0 {
        return Err(CoreError::Validation(format!(
            "duration must be greater than 0, got {duration_secs}"
        )));
    }
    Ok(())
}

/// `min(100, progress / duration * 100)`.
///
/// Callers must have run [`validate_progress`] first; a non-positive duration
/// is never passed in here.
pub fn completion_percentage(progress_secs: f64, duration_secs: f64) -> f64 {
    (progress_secs / duration_secs * 100.0).min(100.0)
}

/// Whether a completion percentage crosses [`COMPLETION_THRESHOLD_PERCENT`].
pub fn is_completed(completion_percentage: f64) -> bool {
    completion_percentage >= COMPLETION_THRESHOLD_PERCENT
}

/// Validate a report and derive its completion state.
pub fn evaluate(progress_secs: f64, duration_secs: f64) -> Result<ProgressOutcome, CoreError> {
    validate_progress(progress_secs, duration_secs)?;
    let completion_percentage = completion_percentage(progress_secs, duration_secs);
    Ok(ProgressOutcome {
        progress_secs,
        duration_secs,
        completion_percentage,
        completed: is_completed(completion_percentage),
    })
}

// ---------------------------------------------------------------------------
// Viewer and unit identity
// ---------------------------------------------------------------------------

/// Whose playback state is being recorded: an account plus its active
/// profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: DbId,
    pub profile_id: DbId,
}

/// The smallest thing progress is tracked against.
///
/// For TV content the key is always the episode; `content_id` is the parent
/// show and is kept for joins and catalog validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchUnit {
    Movie { content_id: DbId },
    Episode { content_id: DbId, episode_id: DbId },
}

impl WatchUnit {
    pub fn new(content_id: DbId, episode_id: Option<DbId>) -> Self {
        match episode_id {
            Some(episode_id) => WatchUnit::Episode {
                content_id,
                episode_id,
            },
            None => WatchUnit::Movie { content_id },
        }
    }

    pub fn content_id(&self) -> DbId {
        match *self {
            WatchUnit::Movie { content_id } | WatchUnit::Episode { content_id, .. } => content_id,
        }
    }

    pub fn episode_id(&self) -> Option<DbId> {
        match *self {
            WatchUnit::Movie { .. } => None,
            WatchUnit::Episode { episode_id, .. } => Some(episode_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-unit watch state
// ---------------------------------------------------------------------------

/// Where a viewer stands on a single watchable unit.
///
/// `Completed -> InProgress` happens when the viewer rewatches; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchState {
    Unseen,
    InProgress,
    Completed,
}

impl WatchState {
    /// Derive the state from the `completed` flag of the viewer's watch
    /// record, if one exists.
    pub fn from_record(completed: Option<bool>) -> Self {
        match completed {
            None => WatchState::Unseen,
            Some(false) => WatchState::InProgress,
            Some(true) => WatchState::Completed,
        }
    }
}
