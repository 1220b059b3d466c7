//! Integration tests for committee, roster and quorum routes.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use gavel_test_support::{FixedClock, UnavailableStore};
use serde_json::json;

#[tokio::test]
async fn test_create_committee_returns_201_and_summary_is_readable() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, created) = common::post_json(
        app.clone(),
        "/api/v1/committees",
        &json!({ "name": "DISEC", "topic": "Drones" }),
    )
    .await;
    let committee_id = created["committee_id"].as_str().unwrap();
    let (summary_status, summary) =
        common::get_json(app, &format!("/api/v1/committees/{committee_id}")).await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["entity_id"], committee_id);
    uuid::Uuid::parse_str(created["correlation_id"].as_str().unwrap()).unwrap();
    assert_eq!(summary_status, StatusCode::OK);
    assert_eq!(summary["name"], "DISEC");
    assert_eq!(summary["topic"], "Drones");
    assert_eq!(summary["member_count"], 0);
    assert!(summary["next_motion_id"].is_null());
}

#[tokio::test]
async fn test_create_committee_with_blank_name_returns_400() {
    let app = common::build_test_app();

    let (status, json) =
        common::post_json(app, "/api/v1/committees", &json!({ "name": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_create_committee_with_missing_name_returns_422() {
    let app = common::build_test_app();

    let (status, _) = common::post_json(app, "/api/v1/committees", &json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_missing_committee_returns_404() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app, "/api/v1/committees/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_add_duplicate_member_returns_409() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    common::add_member(&app, &committee_id, "France").await;

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/members"),
        &json!({ "name": "France" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_participant");
    let (_, summary) = common::get_json(app, &format!("/api/v1/committees/{committee_id}")).await;
    assert_eq!(summary["member_count"], 1);
}

#[tokio::test]
async fn test_add_member_to_missing_committee_returns_404() {
    let app = common::build_test_app();

    let (status, _) = common::post_json(
        app,
        "/api/v1/committees/nope/members",
        &json!({ "name": "France" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_reflects_roll_call() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "GA").await;
    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"] {
        ids.push(common::add_member(&app, &committee_id, name).await);
    }
    for absent in &ids[6..] {
        let (status, _) = common::put_json(
            app.clone(),
            &format!("/api/v1/committees/{committee_id}/members/{absent}/attendance"),
            &json!({ "present": false }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Act
    let (status, stats) = common::get_json(
        app,
        &format!("/api/v1/committees/{committee_id}/attendance"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["delegates_count"], 10);
    assert_eq!(stats["present_count"], 6);
    assert_eq!(stats["quorum"], 5);
    assert_eq!(stats["has_quorum"], true);
}

#[tokio::test]
async fn test_observer_rank_does_not_count_towards_voting() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "GA").await;
    common::add_member(&app, &committee_id, "France").await;
    let observer = common::add_member(&app, &committee_id, "Holy See").await;

    // Act
    common::put_json(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/members/{observer}/attendance"),
        &json!({ "rank": "Observer" }),
    )
    .await;
    let (_, stats) = common::get_json(
        app,
        &format!("/api/v1/committees/{committee_id}/attendance"),
    )
    .await;

    // Assert
    assert_eq!(stats["present_count"], 2);
    assert_eq!(stats["voting_count"], 1);
}

#[tokio::test]
async fn test_remove_member_twice_returns_404_the_second_time() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    let member_id = common::add_member(&app, &committee_id, "Chad").await;
    let uri = format!("/api/v1/committees/{committee_id}/members/{member_id}");

    // Act
    let (first, _) = common::delete(app.clone(), &uri).await;
    let (second, _) = common::delete(app, &uri).await;

    // Assert
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_member_with_encoded_slash_returns_400_and_keeps_member() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    let member_id = common::add_member(&app, &committee_id, "Chad").await;

    // Act
    let (status, json) = common::delete(
        app.clone(),
        &format!("/api/v1/committees/{committee_id}/members/{member_id}%2Fname"),
    )
    .await;
    let (_, stats) = common::get_json(
        app,
        &format!("/api/v1/committees/{committee_id}/attendance"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert_eq!(stats["delegates_count"], 1);
    assert_eq!(stats["present_count"], 1);
}

#[tokio::test]
async fn test_set_attendance_on_missing_member_returns_404() {
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;

    let (status, _) = common::put_json(
        app,
        &format!("/api/v1/committees/{committee_id}/members/ghost/attendance"),
        &json!({ "present": true }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_speaker_stats_counts_yielded_turns() {
    // Arrange
    let app = common::build_test_app();
    let committee_id = common::create_committee(&app, "DISEC").await;
    common::add_member(&app, &committee_id, "Chad").await;
    common::add_member(&app, &committee_id, "France").await;
    let caucus_id = common::open_caucus(&app, &committee_id, 600, 60).await;
    let caucus = format!("/api/v1/committees/{committee_id}/caucuses/{caucus_id}");
    for step in ["France", "Chad", "pop", "pop", "France", "pop", "pop"] {
        if step == "pop" {
            common::post_empty(app.clone(), &format!("{caucus}/pop")).await;
        } else {
            common::post_json(app.clone(), &format!("{caucus}/queue"), &json!({ "name": step }))
                .await;
        }
    }

    // Act
    let (status, stats) = common::get_json(
        app,
        &format!("/api/v1/committees/{committee_id}/speaker-stats"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats[0]["name"], "France");
    assert_eq!(stats[0]["times_spoken"], 2);
    assert_eq!(stats[1]["name"], "Chad");
    assert_eq!(stats[1]["times_spoken"], 1);
}

#[tokio::test]
async fn test_unavailable_store_returns_503() {
    let app = common::build_test_app_with(
        Arc::new(FixedClock(common::start_time())),
        Arc::new(UnavailableStore),
    );

    let (status, json) = common::get_json(app, "/api/v1/committees/c1").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "store_unavailable");
}
