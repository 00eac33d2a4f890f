#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use ladder_api::cache::QueryCache;
use ladder_api::config::ServerConfig;
use ladder_api::router::build_app_router;
use ladder_api::state::AppState;
use ladder_core::store::memory::InMemoryScoreStore;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cache_ttl_secs: 300,
        cache_sweep_interval_secs: 600,
        seed_demo_accounts: 0,
    }
}

/// Build the full application router over an in-memory store.
///
/// Each call gets a fresh cache, so tests never see each other's entries.
pub fn build_test_app(store: Arc<InMemoryScoreStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        cache: Arc::new(QueryCache::new(config.cache_ttl())),
    };
    build_app_router(state, &config)
}

/// Store with `count` accounts, one class-3 character each, scored
/// `100, 100, 90, 89, 88, ...`.
pub fn class_three_population(count: usize) -> Arc<InMemoryScoreStore> {
    let store = Arc::new(InMemoryScoreStore::new());
    for i in 0..count {
        let score = match i {
            0 | 1 => 100,
            n => 92 - n as i64,
        };
        store.add_player(&format!("player{i:02}"), &format!("player{i:02}@example.com"), 3, score);
    }
    store
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
