//! Routes for the committee roster.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use gavel_committee::application::command_handlers;
use gavel_committee::domain::commands;
use gavel_committee::domain::participant::{Participant, Rank};

use super::{CommandResponse, check_ids};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{committee_id}/members.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// Display name, unique within the committee.
    pub name: String,
    /// Standing; standard when omitted.
    pub rank: Option<Rank>,
    /// Roll call answer; present when omitted.
    pub present: Option<bool>,
    /// Declared voting rights; voting when omitted.
    pub voting: Option<bool>,
}

/// Request body for PUT /{committee_id}/members/{member_id}/attendance.
/// Omitted fields are left as they are.
#[derive(Debug, Deserialize)]
pub struct SetAttendanceRequest {
    /// Roll call answer.
    pub present: Option<bool>,
    /// Declared voting rights.
    pub voting: Option<bool>,
    /// Standing.
    pub rank: Option<Rank>,
}

/// POST /{committee_id}/members
#[instrument(skip(state, request), fields(name = %request.name))]
async fn add_member(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let mut participant = Participant::new(request.name);
    if let Some(rank) = request.rank {
        participant.rank = rank;
    }
    if let Some(present) = request.present {
        participant.present = present;
    }
    if let Some(voting) = request.voting {
        participant.voting = voting;
    }

    let command = commands::AddParticipant {
        correlation_id: Uuid::new_v4(),
        committee_id,
        participant,
    };

    info!(correlation_id = %command.correlation_id, "handling add_participant command");

    let result = command_handlers::handle_add_participant(&command, &*state.store).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommandResponse::new(command.correlation_id, result)),
    ))
}

/// DELETE /{committee_id}/members/{member_id}
#[instrument(skip(state))]
async fn remove_member(
    State(state): State<AppState>,
    Path((committee_id, member_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), member_id.as_str()])?;
    let command = commands::RemoveParticipant {
        correlation_id: Uuid::new_v4(),
        committee_id,
        member_id,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_participant command");

    let result = command_handlers::handle_remove_participant(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// PUT /{committee_id}/members/{member_id}/attendance
#[instrument(skip(state, request))]
async fn set_attendance(
    State(state): State<AppState>,
    Path((committee_id, member_id)): Path<(String, String)>,
    Json(request): Json<SetAttendanceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), member_id.as_str()])?;
    let command = commands::SetAttendance {
        correlation_id: Uuid::new_v4(),
        committee_id,
        member_id,
        present: request.present,
        voting: request.voting,
        rank: request.rank,
    };

    info!(correlation_id = %command.correlation_id, "handling set_attendance command");

    let result = command_handlers::handle_set_attendance(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// Returns the router for committee members.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{committee_id}/members", post(add_member))
        .route("/{committee_id}/members/{member_id}", delete(remove_member))
        .route(
            "/{committee_id}/members/{member_id}/attendance",
            put(set_attendance),
        )
}
