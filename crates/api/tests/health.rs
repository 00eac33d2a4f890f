//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use ladder_core::store::memory::InMemoryScoreStore;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = build_test_app(Arc::new(InMemoryScoreStore::new()));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn health_check_reports_degraded_store() {
    let store = Arc::new(InMemoryScoreStore::new());
    store.set_unavailable(true);
    let app = build_test_app(store);

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = build_test_app(Arc::new(InMemoryScoreStore::new()));

    for uri in ["/", "/api/v1"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["message"], "Welcome to the API!");
    }
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(Arc::new(InMemoryScoreStore::new()));
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(Arc::new(InMemoryScoreStore::new()));
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
