//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use gavel_core::clock::Clock;
use gavel_core::store::SharedStore;
use gavel_store::MemoryStore;
use gavel_test_support::FixedClock;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use gavel_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Build the full app router over a fresh `MemoryStore` and a fixed clock.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_clock(Arc::new(FixedClock(start_time())))
}

/// Build the full app router over a fresh `MemoryStore` with a custom clock,
/// for tests that let time pass between requests.
pub fn build_test_app_with_clock(clock: Arc<dyn Clock>) -> Router {
    build_test_app_with(clock, Arc::new(MemoryStore::new()))
}

/// Build the full app router over the given clock and store.
pub fn build_test_app_with(clock: Arc<dyn Clock>, store: Arc<dyn SharedStore>) -> Router {
    gavel_api::app(AppState::new(clock, store))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri, None).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Creates a committee and returns its id.
pub async fn create_committee(app: &Router, name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/api/v1/committees",
        &json!({ "name": name, "topic": "Autonomous weapons" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["committee_id"].as_str().unwrap().to_string()
}

/// Adds a present, voting member and returns its id.
pub async fn add_member(app: &Router, committee_id: &str, name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/members"),
        &json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["entity_id"].as_str().unwrap().to_string()
}

/// Opens a caucus and returns its id.
pub async fn open_caucus(app: &Router, committee_id: &str, caucus_secs: u64, speaker_secs: u64) -> String {
    let (status, json) = post_json(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/caucuses"),
        &json!({
            "name": "Moderated caucus",
            "caucus_duration_secs": caucus_secs,
            "speaker_duration_secs": speaker_secs,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["entity_id"].as_str().unwrap().to_string()
}
