//! Integration tests for motion routes.

mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn propose(app: &Router, committee_id: &str, motion: Value) -> (StatusCode, Value) {
    common::post_json(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/motions"),
        &motion,
    )
    .await
}

#[tokio::test]
async fn test_motions_are_listed_in_procedural_order() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    let (status, moderated) = propose(
        &app,
        &committee_id,
        json!({"type": "Open Moderated Caucus", "proposer": "Chad", "caucusDuration": 10, "caucusUnit": "minutes"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, extend) = propose(
        &app,
        &committee_id,
        json!({"type": "Extend Unmoderated Caucus", "proposer": "France", "caucusDuration": 5, "caucusUnit": "minutes"}),
    )
    .await;

    // Act
    let (status, ranked) =
        common::get_json(app, &format!("/api/v1/committees/{committee_id}/motions")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let ranked = ranked.as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["motion_id"], extend["entity_id"]);
    assert_eq!(ranked[0]["type"], "Extend Unmoderated Caucus");
    assert_eq!(ranked[1]["motion_id"], moderated["entity_id"]);
    assert_eq!(ranked[1]["proposer"], "Chad");
}

#[tokio::test]
async fn test_longer_caucus_of_same_type_ranks_first() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    propose(
        &app,
        &committee_id,
        json!({"type": "Open Moderated Caucus", "caucusDuration": 5, "caucusUnit": "minutes"}),
    )
    .await;
    propose(
        &app,
        &committee_id,
        json!({"type": "Open Moderated Caucus", "caucusDuration": 10, "caucusUnit": "minutes"}),
    )
    .await;

    // Act
    let (_, ranked) =
        common::get_json(app, &format!("/api/v1/committees/{committee_id}/motions")).await;

    // Assert
    assert_eq!(ranked[0]["caucusDuration"], 10);
    assert_eq!(ranked[1]["caucusDuration"], 5);
}

#[tokio::test]
async fn test_unrecognized_motion_type_returns_400() {
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;

    let (status, json) = propose(&app, &committee_id, json!({"type": "Table The Topic"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_withdraw_removes_motion_and_second_withdraw_is_404() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    let (_, proposed) = propose(&app, &committee_id, json!({"type": "Open Debate"})).await;
    let motion_id = proposed["entity_id"].as_str().unwrap();
    let uri = format!("/api/v1/committees/{committee_id}/motions/{motion_id}");

    // Act
    let (first, _) = common::delete(app.clone(), &uri).await;
    let (second, _) = common::delete(app.clone(), &uri).await;

    // Assert
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NOT_FOUND);
    let (_, ranked) =
        common::get_json(app, &format!("/api/v1/committees/{committee_id}/motions")).await;
    assert_eq!(ranked, json!([]));
}

#[tokio::test]
async fn test_clear_motions_discards_everything() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    propose(&app, &committee_id, json!({"type": "Open Debate"})).await;
    propose(&app, &committee_id, json!({"type": "Suspend Debate"})).await;
    let uri = format!("/api/v1/committees/{committee_id}/motions");

    // Act
    let (status, _) = common::delete(app.clone(), &uri).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let (_, ranked) = common::get_json(app, &uri).await;
    assert_eq!(ranked, json!([]));
}

#[tokio::test]
async fn test_approve_motion_is_refused_and_motion_is_kept() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    let (_, proposed) = propose(&app, &committee_id, json!({"type": "Open Debate"})).await;
    let motion_id = proposed["entity_id"].as_str().unwrap();

    // Act
    let (status, json) = common::post_empty(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/motions/{motion_id}/approve"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    let (_, summary) = common::get_json(app, &format!("/api/v1/committees/{committee_id}")).await;
    assert_eq!(summary["motion_count"], 1);
    assert_eq!(summary["next_motion_id"], motion_id);
}

#[tokio::test]
async fn test_motions_of_missing_committee_return_404() {
    let app = common::build_test_app();

    let (status, _) = common::get_json(app, "/api/v1/committees/nope/motions").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
