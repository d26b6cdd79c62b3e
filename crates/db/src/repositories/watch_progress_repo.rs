//! Repository for the `watch_history` and `continue_watching` tables.
//!
//! A progress report touches both tables inside one transaction: the history
//! record is upserted, then the continue-watching entry for the same key is
//! upserted (below the completion threshold) or deleted (at/above it). The
//! row lock taken by the history upsert serializes concurrent reports for the
//! same key, so the two tables never disagree after commit.

use sqlx::PgPool;
use streamshelf_core::types::DbId;
use streamshelf_core::watch_progress::{
    ProgressOutcome, Viewer, WatchUnit, STATUS_ABANDONED, STATUS_IN_PROGRESS,
};

use crate::models::watch_progress::{
    ContinueWatchingEntry, ContinueWatchingRow, WatchHistoryItem, WatchRecord,
};

/// Column list for the `watch_history` table.
const HISTORY_COLUMNS: &str = "id, user_id, profile_id, content_id, episode_id, progress_secs, \
    duration_secs, completion_percentage, completed, last_watched_at, created_at, updated_at";

/// Column list for the `continue_watching` table.
const ENTRY_COLUMNS: &str = "id, user_id, profile_id, content_id, episode_id, progress_secs, \
    duration_secs, completion_percentage, status, last_watched_at, created_at, updated_at";

/// `ON CONFLICT` target matching the partial unique index for the unit's key
/// shape. Both tables use identically shaped indexes.
fn conflict_target(unit: &WatchUnit) -> &'static str {
    match unit {
        WatchUnit::Episode { .. } => "(user_id, profile_id, episode_id) WHERE episode_id IS NOT NULL",
        WatchUnit::Movie { .. } => "(user_id, profile_id, content_id) WHERE episode_id IS NULL",
    }
}

/// `WHERE` fragment selecting the unit's row; the unit id binds to `$3`.
fn unit_predicate(unit: &WatchUnit) -> &'static str {
    match unit {
        WatchUnit::Episode { .. } => "episode_id = $3",
        WatchUnit::Movie { .. } => "content_id = $3 AND episode_id IS NULL",
    }
}

/// The id that identifies the leaf unit: the episode when present, otherwise
/// the content item.
fn unit_key(unit: &WatchUnit) -> DbId {
    unit.episode_id().unwrap_or_else(|| unit.content_id())
}

/// Provides data access for per-viewer playback state.
pub struct WatchProgressRepo;

impl WatchProgressRepo {
    /// Apply a progress report for one unit.
    ///
    /// Upserts the history record and reconciles the continue-watching entry
    /// in a single transaction. Repeating the call with the same outcome
    /// leaves the same rows behind (only `last_watched_at` advances).
    pub async fn record(
        pool: &PgPool,
        viewer: &Viewer,
        unit: &WatchUnit,
        outcome: &ProgressOutcome,
    ) -> Result<WatchRecord, sqlx::Error> {
        let target = conflict_target(unit);
        let mut tx = pool.begin().await?;

        let history_query = format!(
            "INSERT INTO watch_history \
                (user_id, profile_id, content_id, episode_id, progress_secs, duration_secs, \
                 completion_percentage, completed, last_watched_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) \
             ON CONFLICT {target} \
             DO UPDATE SET \
                progress_secs = EXCLUDED.progress_secs, \
                duration_secs = EXCLUDED.duration_secs, \
                completion_percentage = EXCLUDED.completion_percentage, \
                completed = EXCLUDED.completed, \
                last_watched_at = EXCLUDED.last_watched_at \
             RETURNING {HISTORY_COLUMNS}"
        );
        let record = sqlx::query_as::<_, WatchRecord>(&history_query)
            .bind(viewer.user_id)
            .bind(viewer.profile_id)
            .bind(unit.content_id())
            .bind(unit.episode_id())
            .bind(outcome.progress_secs)
            .bind(outcome.duration_secs)
            .bind(outcome.completion_percentage)
            .bind(outcome.completed)
            .fetch_one(&mut *tx)
            .await?;

        if outcome.completed {
            let delete_query = format!(
                "DELETE FROM continue_watching \
                 WHERE user_id = $1 AND profile_id = $2 AND {}",
                unit_predicate(unit)
            );
            let removed = sqlx::query(&delete_query)
                .bind(viewer.user_id)
                .bind(viewer.profile_id)
                .bind(unit_key(unit))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(
                watch_record_id = record.id,
                removed,
                "Unit completed, continue-watching entry cleared",
            );
        } else {
            let entry_query = format!(
                "INSERT INTO continue_watching \
                    (user_id, profile_id, content_id, episode_id, progress_secs, duration_secs, \
                     completion_percentage, status, last_watched_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) \
                 ON CONFLICT {target} \
                 DO UPDATE SET \
                    progress_secs = EXCLUDED.progress_secs, \
                    duration_secs = EXCLUDED.duration_secs, \
                    completion_percentage = EXCLUDED.completion_percentage, \
                    status = EXCLUDED.status, \
                    last_watched_at = EXCLUDED.last_watched_at"
            );
            sqlx::query(&entry_query)
                .bind(viewer.user_id)
                .bind(viewer.profile_id)
                .bind(unit.content_id())
                .bind(unit.episode_id())
                .bind(outcome.progress_secs)
                .bind(outcome.duration_secs)
                .bind(outcome.completion_percentage)
                .bind(STATUS_IN_PROGRESS)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(record)
    }

    /// Find the viewer's history record for a unit.
    pub async fn find_record(
        pool: &PgPool,
        viewer: &Viewer,
        unit: &WatchUnit,
    ) -> Result<Option<WatchRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM watch_history \
             WHERE user_id = $1 AND profile_id = $2 AND {}",
            unit_predicate(unit)
        );
        sqlx::query_as::<_, WatchRecord>(&query)
            .bind(viewer.user_id)
            .bind(viewer.profile_id)
            .bind(unit_key(unit))
            .fetch_optional(pool)
            .await
    }

    /// Find the viewer's continue-watching entry for a unit, in any status.
    pub async fn find_entry(
        pool: &PgPool,
        viewer: &Viewer,
        unit: &WatchUnit,
    ) -> Result<Option<ContinueWatchingEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM continue_watching \
             WHERE user_id = $1 AND profile_id = $2 AND {}",
            unit_predicate(unit)
        );
        sqlx::query_as::<_, ContinueWatchingEntry>(&query)
            .bind(viewer.user_id)
            .bind(viewer.profile_id)
            .bind(unit_key(unit))
            .fetch_optional(pool)
            .await
    }

    /// List the viewer's resume shelf.
    ///
    /// Each title contributes at most one entry: the unit most recently
    /// reported for it in `watch_history`. The title is shown only while that
    /// unit's entry is `IN_PROGRESS`, so finishing the latest episode hides
    /// the show even if an earlier episode was left unfinished. Newest first.
    pub async fn list_continue_watching(
        pool: &PgPool,
        viewer: &Viewer,
        limit: i64,
    ) -> Result<Vec<ContinueWatchingRow>, sqlx::Error> {
        sqlx::query_as::<_, ContinueWatchingRow>(
            "SELECT \
                cw.id, cw.content_id, cw.episode_id, cw.progress_secs, cw.duration_secs, \
                cw.completion_percentage, cw.last_watched_at, \
                c.title AS content_title, c.content_type, c.poster_url, c.backdrop_url, \
                s.season_number, e.episode_number, e.title AS episode_title, \
                e.thumbnail_url AS episode_thumbnail_url \
             FROM ( \
                SELECT DISTINCT ON (content_id) content_id, episode_id \
                FROM watch_history \
                WHERE user_id = $1 AND profile_id = $2 \
                ORDER BY content_id, last_watched_at DESC, id DESC \
             ) latest \
             JOIN continue_watching cw \
                ON cw.user_id = $1 AND cw.profile_id = $2 \
                AND cw.content_id = latest.content_id \
                AND cw.episode_id IS NOT DISTINCT FROM latest.episode_id \
             JOIN content c ON c.id = cw.content_id \
             LEFT JOIN episodes e ON e.id = cw.episode_id \
             LEFT JOIN seasons s ON s.id = e.season_id \
             WHERE cw.status = $3 \
             ORDER BY cw.last_watched_at DESC, cw.id DESC \
             LIMIT $4",
        )
        .bind(viewer.user_id)
        .bind(viewer.profile_id)
        .bind(STATUS_IN_PROGRESS)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// List the viewer's watch history, newest first.
    pub async fn list_history(
        pool: &PgPool,
        viewer: &Viewer,
        limit: i64,
    ) -> Result<Vec<WatchHistoryItem>, sqlx::Error> {
        sqlx::query_as::<_, WatchHistoryItem>(
            "SELECT \
                wh.id, wh.content_id, wh.episode_id, wh.progress_secs, wh.duration_secs, \
                wh.completion_percentage, wh.completed, wh.last_watched_at, \
                c.title AS content_title, c.content_type, \
                s.season_number, e.episode_number, e.title AS episode_title \
             FROM watch_history wh \
             JOIN content c ON c.id = wh.content_id \
             LEFT JOIN episodes e ON e.id = wh.episode_id \
             LEFT JOIN seasons s ON s.id = e.season_id \
             WHERE wh.user_id = $1 AND wh.profile_id = $2 \
             ORDER BY wh.last_watched_at DESC, wh.id DESC \
             LIMIT $3",
        )
        .bind(viewer.user_id)
        .bind(viewer.profile_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Hide an entry from the viewer's shelf by marking it `ABANDONED`.
    ///
    /// Returns `true` if an in-progress entry owned by the viewer was
    /// updated. The next progress report for the unit revives it.
    pub async fn dismiss(
        pool: &PgPool,
        viewer: &Viewer,
        entry_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE continue_watching SET status = $4 \
             WHERE id = $1 AND user_id = $2 AND profile_id = $3 AND status = $5",
        )
        .bind(entry_id)
        .bind(viewer.user_id)
        .bind(viewer.profile_id)
        .bind(STATUS_ABANDONED)
        .bind(STATUS_IN_PROGRESS)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
