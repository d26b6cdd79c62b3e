//! HTTP-level integration tests for watch-progress reporting and the
//! continue-watching shelf.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_content, create_show, create_viewer, delete_auth, get, get_auth,
    post_json, post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use streamshelf_api::auth::jwt::generate_access_token;
use streamshelf_core::catalog::{CONTENT_TYPE_MOVIE, CONTENT_TYPE_SPECIAL};

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Generic report endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_half_watched_then_completed(pool: PgPool) {
    let viewer = create_viewer(&pool, "a@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m1", CONTENT_TYPE_MOVIE, Some(120.0)).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": movie.id, "progressSeconds": 60.0, "durationSeconds": 120.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["completionPercentage"], 50.0);
    assert_eq!(json["data"]["completed"], false);

    let app = common::build_test_app(pool.clone());
    let shelf = body_json(get_auth(app, "/api/content/continue-watching", &token).await).await;
    let items = shelf["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["content"]["id"], movie.id);
    assert_eq!(items[0]["isEpisode"], false);
    assert_eq!(items[0]["progress"], 60.0);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": movie.id, "progressSeconds": 115.0, "durationSeconds": 120.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed"], true);
    let pct = json["data"]["completionPercentage"].as_f64().unwrap();
    assert!((pct - 95.83).abs() < 0.01);

    let app = common::build_test_app(pool.clone());
    let shelf = body_json(get_auth(app, "/api/content/continue-watching", &token).await).await;
    assert!(shelf["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_duration_is_rejected_without_writes(pool: PgPool) {
    let viewer = create_viewer(&pool, "b@test.com").await;
    let token = token_for(&viewer);
    let (show, episodes) = create_show(&pool, "s1", 5).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({
            "contentId": show.id,
            "episodeId": episodes[4].id,
            "progressSeconds": 0.0,
            "durationSeconds": 0.0,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");

    assert_eq!(count(&pool, "watch_history").await, 0);
    assert_eq!(count(&pool, "continue_watching").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_progress_is_rejected(pool: PgPool) {
    let viewer = create_viewer(&pool, "c@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": movie.id, "progressSeconds": -3.0, "durationSeconds": 100.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "watch_history").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episode_from_other_show_is_mismatch(pool: PgPool) {
    let viewer = create_viewer(&pool, "d@test.com").await;
    let token = token_for(&viewer);
    let (s1, _) = create_show(&pool, "s1", 1).await;
    let (_s2, s2_episodes) = create_show(&pool, "s2", 1).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({
            "contentId": s1.id,
            "episodeId": s2_episodes[0].id,
            "progressSeconds": 10.0,
            "durationSeconds": 1200.0,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "MISMATCH");

    assert_eq!(count(&pool, "watch_history").await, 0);
    assert_eq!(count(&pool, "continue_watching").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_content_is_not_found(pool: PgPool) {
    let viewer = create_viewer(&pool, "e@test.com").await;
    let token = token_for(&viewer);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": 999999, "progressSeconds": 1.0, "durationSeconds": 10.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "NOT_FOUND");
    assert_eq!(json["message"], "Content with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_show_without_episode_is_rejected(pool: PgPool) {
    let viewer = create_viewer(&pool, "f@test.com").await;
    let token = token_for(&viewer);
    let (show, _) = create_show(&pool, "s", 1).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": show.id, "progressSeconds": 10.0, "durationSeconds": 100.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "watch_history").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_fields_are_rejected(pool: PgPool) {
    let viewer = create_viewer(&pool, "g@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/watch-progress",
        json!({
            "contentId": movie.id,
            "progressSeconds": 10.0,
            "durationSeconds": 100.0,
            "userId": 1,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_progress_reports_state(pool: PgPool) {
    let viewer = create_viewer(&pool, "h@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, None).await;
    let uri = format!("/api/watch-progress?contentId={}", movie.id);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["state"], "UNSEEN");
    assert!(json["data"]["record"].is_null());

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": movie.id, "progressSeconds": 10.0, "durationSeconds": 100.0 }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["state"], "IN_PROGRESS");
    assert_eq!(json["data"]["continueWatching"]["status"], "IN_PROGRESS");

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/watch-progress",
        json!({ "contentId": movie.id, "progressSeconds": 95.0, "durationSeconds": 100.0 }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["state"], "COMPLETED");
    assert!(json["data"]["continueWatching"].is_null());
}

// ---------------------------------------------------------------------------
// Per-title endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episode_report_by_number(pool: PgPool) {
    let viewer = create_viewer(&pool, "i@test.com").await;
    let token = token_for(&viewer);
    let (show, episodes) = create_show(&pool, "show", 3).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!(
        "/api/content/tv-show/{}/season/1/episode/2/watch-history",
        show.id
    );
    let response = post_json_auth(app, &uri, json!({ "progress": 300.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["episodeId"], episodes[1].id);
    assert_eq!(json["data"]["contentId"], show.id);
    assert_eq!(json["data"]["durationSecs"], 1200.0);
    assert_eq!(json["data"]["completionPercentage"], 25.0);

    let app = common::build_test_app(pool.clone());
    let shelf = body_json(get_auth(app, "/api/content/continue-watching", &token).await).await;
    let items = shelf["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["isEpisode"], true);
    assert_eq!(items[0]["episode"]["id"], episodes[1].id);
    assert_eq!(items[0]["episode"]["seasonNumber"], 1);
    assert_eq!(items[0]["episode"]["episodeNumber"], 2);
    assert_eq!(items[0]["content"]["title"], "show");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episode_report_unknown_number_is_mismatch(pool: PgPool) {
    let viewer = create_viewer(&pool, "j@test.com").await;
    let token = token_for(&viewer);
    let (show, _) = create_show(&pool, "show", 1).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!(
        "/api/content/tv-show/{}/season/1/episode/99/watch-history",
        show.id
    );
    let response = post_json_auth(app, &uri, json!({ "progress": 10.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "MISMATCH");
    assert_eq!(count(&pool, "watch_history").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episode_route_rejects_movies(pool: PgPool) {
    let viewer = create_viewer(&pool, "k@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, Some(100.0)).await;

    let app = common::build_test_app(pool);
    let uri = format!(
        "/api/content/tv-show/{}/season/1/episode/1/watch-history",
        movie.id
    );
    let response = post_json_auth(app, &uri, json!({ "progress": 10.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "MISMATCH");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completed_flag_marks_episode_watched(pool: PgPool) {
    let viewer = create_viewer(&pool, "l@test.com").await;
    let token = token_for(&viewer);
    let (show, _) = create_show(&pool, "show", 1).await;
    let uri = format!(
        "/api/content/tv-show/{}/season/1/episode/1/watch-history",
        show.id
    );

    let app = common::build_test_app(pool.clone());
    post_json_auth(app, &uri, json!({ "progress": 100.0 }), &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &uri,
        json!({ "progress": 100.0, "completed": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed"], true);
    assert_eq!(json["data"]["completionPercentage"], 100.0);

    assert_eq!(count(&pool, "watch_history").await, 1);
    assert_eq!(count(&pool, "continue_watching").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_report_uses_catalog_runtime(pool: PgPool) {
    let viewer = create_viewer(&pool, "m@test.com").await;
    let token = token_for(&viewer);
    let special = create_content(&pool, "special", CONTENT_TYPE_SPECIAL, Some(400.0)).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/content/{}/watch-history", special.id);
    let response = post_json_auth(app, &uri, json!({ "progress": 100.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["durationSecs"], 400.0);
    assert_eq!(json["data"]["completionPercentage"], 25.0);
    assert!(json["data"]["episodeId"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_report_without_any_duration_is_rejected(pool: PgPool) {
    let viewer = create_viewer(&pool, "n@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, None).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/content/{}/watch-history", movie.id);
    let response = post_json_auth(app, &uri, json!({ "progress": 100.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "VALIDATION_ERROR");
    assert_eq!(count(&pool, "watch_history").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_route_rejects_shows(pool: PgPool) {
    let viewer = create_viewer(&pool, "o@test.com").await;
    let token = token_for(&viewer);
    let (show, _) = create_show(&pool, "show", 1).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/content/{}/watch-history", show.id);
    let response = post_json_auth(
        app,
        &uri,
        json!({ "progress": 100.0, "duration": 1200.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Shelf management and history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dismiss_entry(pool: PgPool) {
    let viewer = create_viewer(&pool, "p@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, Some(100.0)).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/content/{}/watch-history", movie.id);
    post_json_auth(app, &uri, json!({ "progress": 10.0 }), &token).await;

    let app = common::build_test_app(pool.clone());
    let shelf = body_json(get_auth(app, "/api/content/continue-watching", &token).await).await;
    let entry_id = shelf["data"][0]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/content/continue-watching/{entry_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let shelf = body_json(get_auth(app, "/api/content/continue-watching", &token).await).await;
    assert!(shelf["data"].as_array().unwrap().is_empty());

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/content/continue-watching/{entry_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_watch_history_listing(pool: PgPool) {
    let viewer = create_viewer(&pool, "q@test.com").await;
    let token = token_for(&viewer);
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, Some(100.0)).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/content/{}/watch-history", movie.id);
    post_json_auth(app, &uri, json!({ "progress": 99.0 }), &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/content/watch-history", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["contentTitle"], "m");
    assert_eq!(items[0]["completed"], true);
}

// ---------------------------------------------------------------------------
// Viewer identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/content/continue-watching").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_profile_is_precondition_failure(pool: PgPool) {
    let viewer = create_viewer(&pool, "r@test.com").await;
    let token = generate_access_token(viewer.user_id, None, &common::test_config().jwt).unwrap();
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, Some(100.0)).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/content/{}/watch-history", movie.id);
    let response = post_json_auth(app, &uri, json!({ "progress": 10.0 }), &token).await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "PRECONDITION_REQUIRED");
    assert_eq!(count(&pool, "watch_history").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_profile_is_precondition_failure(pool: PgPool) {
    let owner = create_viewer(&pool, "s@test.com").await;
    let intruder = create_viewer(&pool, "t@test.com").await;
    let token = generate_access_token(
        intruder.user_id,
        Some(owner.profile_id),
        &common::test_config().jwt,
    )
    .unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/content/continue-watching", &token).await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unauthenticated_post_writes_nothing(pool: PgPool) {
    let movie = create_content(&pool, "m", CONTENT_TYPE_MOVIE, Some(100.0)).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/content/{}/watch-history", movie.id);
    let response = post_json(app, &uri, json!({ "progress": 10.0 })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count(&pool, "watch_history").await, 0);
}
