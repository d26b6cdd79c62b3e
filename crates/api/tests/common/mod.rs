#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use streamshelf_api::auth::jwt::{generate_access_token, JwtConfig};
use streamshelf_api::config::{PageLimits, ServerConfig};
use streamshelf_api::router::build_app_router;
use streamshelf_api::state::AppState;
use streamshelf_core::catalog::CONTENT_TYPE_TV_SHOW;
use streamshelf_core::watch_progress::Viewer;
use streamshelf_db::models::content::{
    Content, CreateContent, CreateEpisode, CreateSeason, Episode,
};
use streamshelf_db::models::profile::CreateProfile;
use streamshelf_db::models::user::CreateUser;
use streamshelf_db::repositories::{ContentRepo, EpisodeRepo, ProfileRepo, SeasonRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout: Duration::from_secs(30),
        shutdown_timeout: Duration::from_secs(30),
        pages: PageLimits::default(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user with one profile.
pub async fn create_viewer(pool: &PgPool, email: &str) -> Viewer {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test Viewer".to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id: user.id,
            name: "Main".to_string(),
            is_kids: None,
        },
    )
    .await
    .expect("profile creation should succeed");
    Viewer {
        user_id: user.id,
        profile_id: profile.id,
    }
}

/// Access token with the viewer's profile selected.
pub fn token_for(viewer: &Viewer) -> String {
    generate_access_token(viewer.user_id, Some(viewer.profile_id), &test_config().jwt)
        .expect("token generation should succeed")
}

pub async fn create_content(
    pool: &PgPool,
    title: &str,
    content_type: &str,
    duration_secs: Option<f64>,
) -> Content {
    ContentRepo::create(
        pool,
        &CreateContent {
            title: title.to_string(),
            content_type: content_type.to_string(),
            description: None,
            poster_url: Some(format!("https://cdn.test/{title}.jpg")),
            backdrop_url: None,
            release_year: None,
            duration_secs,
        },
    )
    .await
    .expect("content creation should succeed")
}

/// Create a show with a single season 1 holding `episode_count` episodes of
/// 1200 seconds each.
pub async fn create_show(pool: &PgPool, title: &str, episode_count: i32) -> (Content, Vec<Episode>) {
    let show = create_content(pool, title, CONTENT_TYPE_TV_SHOW, None).await;
    let season = SeasonRepo::create(
        pool,
        &CreateSeason {
            content_id: show.id,
            season_number: 1,
            title: None,
        },
    )
    .await
    .expect("season creation should succeed");

    let mut episodes = Vec::new();
    for n in 1..=episode_count {
        let episode = EpisodeRepo::create(
            pool,
            &CreateEpisode {
                season_id: season.id,
                episode_number: n,
                title: format!("{title} E{n}"),
                thumbnail_url: None,
                duration_secs: Some(1200.0),
            },
        )
        .await
        .expect("episode creation should succeed");
        episodes.push(episode);
    }
    (show, episodes)
}
