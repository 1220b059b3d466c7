//! Routes for caucuses: the speaker queue and both timers.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use gavel_committee::application::command_handlers;
use gavel_committee::application::query_handlers::{self, CaucusSnapshotView};
use gavel_committee::domain::commands;
use gavel_committee::domain::timer::TimerKind;

use super::{CommandResponse, check_ids};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{committee_id}/caucuses.
#[derive(Debug, Deserialize)]
pub struct OpenCaucusRequest {
    /// Display name.
    pub name: String,
    /// Length of the whole caucus, in seconds.
    pub caucus_duration_secs: u64,
    /// Time each speaker gets, in seconds.
    pub speaker_duration_secs: u64,
}

/// Request body for POST /{committee_id}/caucuses/{caucus_id}/queue.
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    /// Name of the member joining the queue.
    pub name: String,
}

/// Request body for POST .../timers/{kind}/reset.
#[derive(Debug, Default, Deserialize)]
pub struct ResetTimerRequest {
    /// New configured duration in seconds; the current one is kept when
    /// omitted.
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

/// POST /{committee_id}/caucuses
#[instrument(skip(state, request), fields(name = %request.name))]
async fn open_caucus(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
    Json(request): Json<OpenCaucusRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let command = commands::OpenCaucus {
        correlation_id: Uuid::new_v4(),
        committee_id,
        name: request.name,
        caucus_duration: Duration::from_secs(request.caucus_duration_secs),
        speaker_duration: Duration::from_secs(request.speaker_duration_secs),
    };

    info!(correlation_id = %command.correlation_id, "handling open_caucus command");

    let result =
        command_handlers::handle_open_caucus(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommandResponse::new(command.correlation_id, result)),
    ))
}

/// GET /{committee_id}/caucuses/{caucus_id}
#[instrument(skip(state))]
async fn get_caucus(
    State(state): State<AppState>,
    Path((committee_id, caucus_id)): Path<(String, String)>,
) -> Result<Json<CaucusSnapshotView>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let view = query_handlers::get_caucus(
        &committee_id,
        &caucus_id,
        state.clock.as_ref(),
        &*state.store,
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /{committee_id}/caucuses/{caucus_id}
#[instrument(skip(state))]
async fn close_caucus(
    State(state): State<AppState>,
    Path((committee_id, caucus_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::CloseCaucus {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
    };

    info!(correlation_id = %command.correlation_id, "handling close_caucus command");

    let result = command_handlers::handle_close_caucus(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/caucuses/{caucus_id}/queue
#[instrument(skip(state, request), fields(name = %request.name))]
async fn enqueue_speaker(
    State(state): State<AppState>,
    Path((committee_id, caucus_id)): Path<(String, String)>,
    Json(request): Json<EnqueueRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::EnqueueSpeaker {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling enqueue_speaker command");

    let result =
        command_handlers::handle_enqueue_speaker(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/caucuses/{caucus_id}/pop
#[instrument(skip(state))]
async fn pop_speaker(
    State(state): State<AppState>,
    Path((committee_id, caucus_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::PopSpeaker {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
    };

    info!(correlation_id = %command.correlation_id, "handling pop_speaker command");

    let result =
        command_handlers::handle_pop_speaker(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// DELETE /{committee_id}/caucuses/{caucus_id}/speakers/{name}
#[instrument(skip(state))]
async fn remove_speaker(
    State(state): State<AppState>,
    Path((committee_id, caucus_id, name)): Path<(String, String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::RemoveSpeaker {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
        name,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_speaker command");

    let result =
        command_handlers::handle_remove_speaker(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/caucuses/{caucus_id}/timers/{kind}/start
#[instrument(skip(state))]
async fn start_timer(
    State(state): State<AppState>,
    Path((committee_id, caucus_id, kind)): Path<(String, String, TimerKind)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::StartTimer {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
        kind,
    };

    info!(correlation_id = %command.correlation_id, "handling start_timer command");

    let result =
        command_handlers::handle_start_timer(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/caucuses/{caucus_id}/timers/{kind}/pause
#[instrument(skip(state))]
async fn pause_timer(
    State(state): State<AppState>,
    Path((committee_id, caucus_id, kind)): Path<(String, String, TimerKind)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::PauseTimer {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
        kind,
    };

    info!(correlation_id = %command.correlation_id, "handling pause_timer command");

    let result =
        command_handlers::handle_pause_timer(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/caucuses/{caucus_id}/timers/{kind}/reset
#[instrument(skip(state, request))]
async fn reset_timer(
    State(state): State<AppState>,
    Path((committee_id, caucus_id, kind)): Path<(String, String, TimerKind)>,
    Json(request): Json<ResetTimerRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), caucus_id.as_str()])?;
    let command = commands::ResetTimer {
        correlation_id: Uuid::new_v4(),
        committee_id,
        caucus_id,
        kind,
        duration: request.duration_secs.map(Duration::from_secs),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_timer command");

    let result =
        command_handlers::handle_reset_timer(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// Returns the router for caucuses.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{committee_id}/caucuses", post(open_caucus))
        .route(
            "/{committee_id}/caucuses/{caucus_id}",
            get(get_caucus).delete(close_caucus),
        )
        .route(
            "/{committee_id}/caucuses/{caucus_id}/queue",
            post(enqueue_speaker),
        )
        .route("/{committee_id}/caucuses/{caucus_id}/pop", post(pop_speaker))
        .route(
            "/{committee_id}/caucuses/{caucus_id}/speakers/{name}",
            delete(remove_speaker),
        )
        .route(
            "/{committee_id}/caucuses/{caucus_id}/timers/{kind}/start",
            post(start_timer),
        )
        .route(
            "/{committee_id}/caucuses/{caucus_id}/timers/{kind}/pause",
            post(pause_timer),
        )
        .route(
            "/{committee_id}/caucuses/{caucus_id}/timers/{kind}/reset",
            post(reset_timer),
        )
}
