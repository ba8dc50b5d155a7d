#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use movies_cache::{CachingService, MemoryCacheStore};
use movies_core::clock::FixedClock;
use movies_core::dto::MovieRequestDto;
use movies_core::movie::{Movie, Room};
use movies_core::repository::MockMovieRepository;
use movies_core::types::{DbId, Timestamp};
use serde_json::{json, Value};
use tower::ServiceExt;

use movies_api::config::ServerConfig;
use movies_api::router::build_app_router;
use movies_api::state::AppState;

/// Build a test `ServerConfig`. Nothing in it is dialled; the repository
/// is always a mock.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://localhost/movies_test".to_string(),
        database_max_connections: 1,
        redis_url: None,
    }
}

/// The instant every test app's clock is pinned to.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()
}

/// A router plus handles on the pieces tests want to poke at directly.
pub struct TestApp {
    pub router: Router,
    pub cache: CachingService,
    pub store: Arc<MemoryCacheStore>,
    pub clock: Arc<FixedClock>,
}

/// Build the full application (same middleware as production) over a mock
/// repository, an in-memory cache and a fixed clock.
pub fn build_test_app(repo: MockMovieRepository) -> TestApp {
    let config = test_config();
    let clock = Arc::new(FixedClock::new(now()));
    let store = Arc::new(MemoryCacheStore::new(clock.clone()));
    let cache = CachingService::new(store.clone(), clock.clone());

    let state = AppState {
        config: Arc::new(config.clone()),
        movies: Arc::new(repo),
        cache: cache.clone(),
        clock: clock.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        cache,
        store,
        clock,
    }
}

pub fn valid_request() -> MovieRequestDto {
    MovieRequestDto {
        title: "Spirited Away".into(),
        summary: "Ten-year-old Chihiro Ogino and her parents are traveling to their new home."
            .into(),
        poster_uri: "https://google.com/".into(),
        release_date: now(),
        off_theaters_date: now() + Duration::days(30),
        room: Room::Standard,
        duration_minutes: 125,
    }
}

pub fn stored_movie(id: DbId) -> Movie {
    valid_request().into_movie(id)
}

pub fn request_json(request: &MovieRequestDto) -> Value {
    serde_json::to_value(request).unwrap()
}

pub fn update_json(id: DbId, request: &MovieRequestDto) -> Value {
    let mut body = request_json(request);
    body["id"] = json!(id);
    body
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
