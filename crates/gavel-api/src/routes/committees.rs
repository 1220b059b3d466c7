//! Routes for committees as a whole: creation, overview, quorum and
//! speaker statistics. Member, motion and caucus routes are merged in.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use gavel_committee::application::command_handlers;
use gavel_committee::application::query_handlers::{self, CommitteeSummaryView};
use gavel_committee::domain::attendance::AttendanceStats;
use gavel_committee::domain::commands;
use gavel_committee::domain::committee::SpeakerTally;
use gavel_core::store::generate_child_key;

use super::{CommandResponse, caucuses, check_ids, members, motions};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateCommitteeRequest {
    /// Committee name.
    pub name: String,
    /// Agenda topic.
    #[serde(default)]
    pub topic: String,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_committee(
    State(state): State<AppState>,
    Json(request): Json<CreateCommitteeRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let command = commands::CreateCommittee {
        correlation_id: Uuid::new_v4(),
        committee_id: generate_child_key(),
        name: request.name,
        topic: request.topic,
    };

    info!(correlation_id = %command.correlation_id, "handling create_committee command");

    let result = command_handlers::handle_create_committee(&command, &*state.store).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommandResponse::new(command.correlation_id, result)),
    ))
}

/// GET /{committee_id}
#[instrument(skip(state))]
async fn get_committee(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
) -> Result<Json<CommitteeSummaryView>, ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let summary = query_handlers::get_committee_summary(&committee_id, &*state.store).await?;
    Ok(Json(summary))
}

/// GET /{committee_id}/attendance
#[instrument(skip(state))]
async fn get_attendance(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
) -> Result<Json<AttendanceStats>, ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let stats = query_handlers::get_attendance(&committee_id, &*state.store).await?;
    Ok(Json(stats))
}

/// GET /{committee_id}/speaker-stats
#[instrument(skip(state))]
async fn get_speaker_stats(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
) -> Result<Json<Vec<SpeakerTally>>, ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let stats = query_handlers::get_speaker_stats(&committee_id, &*state.store).await?;
    Ok(Json(stats))
}

/// Returns the router for committees, with member, motion and caucus routes
/// merged in.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_committee))
        .route("/{committee_id}", get(get_committee))
        .route("/{committee_id}/attendance", get(get_attendance))
        .route("/{committee_id}/speaker-stats", get(get_speaker_stats))
        .merge(members::router())
        .merge(motions::router())
        .merge(caucuses::router())
}
