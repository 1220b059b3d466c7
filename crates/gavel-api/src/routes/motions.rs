//! Routes for pending motions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use gavel_committee::application::command_handlers;
use gavel_committee::application::query_handlers::{self, RankedMotionView};
use gavel_committee::domain::commands;
use gavel_committee::domain::motion::Motion;

use super::{CommandResponse, check_ids};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /{committee_id}/motions
#[instrument(skip(state))]
async fn list_motions(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
) -> Result<Json<Vec<RankedMotionView>>, ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let ranked = query_handlers::get_ranked_motions(&committee_id, &*state.store).await?;
    Ok(Json(ranked))
}

/// POST /{committee_id}/motions
///
/// The body is a motion in its stored shape (`type`, `proposer`,
/// `caucusDuration`, ...).
#[instrument(skip(state, motion), fields(motion_type = ?motion.motion_type))]
async fn propose_motion(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
    Json(motion): Json<Motion>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let command = commands::ProposeMotion {
        correlation_id: Uuid::new_v4(),
        committee_id,
        motion,
    };

    info!(correlation_id = %command.correlation_id, "handling propose_motion command");

    let result = command_handlers::handle_propose_motion(&command, &*state.store).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommandResponse::new(command.correlation_id, result)),
    ))
}

/// DELETE /{committee_id}/motions
#[instrument(skip(state))]
async fn clear_motions(
    State(state): State<AppState>,
    Path(committee_id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str()])?;
    let command = commands::ClearMotions {
        correlation_id: Uuid::new_v4(),
        committee_id,
    };

    info!(correlation_id = %command.correlation_id, "handling clear_motions command");

    let result = command_handlers::handle_clear_motions(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// DELETE /{committee_id}/motions/{motion_id}
#[instrument(skip(state))]
async fn withdraw_motion(
    State(state): State<AppState>,
    Path((committee_id, motion_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), motion_id.as_str()])?;
    let command = commands::WithdrawMotion {
        correlation_id: Uuid::new_v4(),
        committee_id,
        motion_id,
    };

    info!(correlation_id = %command.correlation_id, "handling withdraw_motion command");

    let result = command_handlers::handle_withdraw_motion(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// POST /{committee_id}/motions/{motion_id}/approve
#[instrument(skip(state))]
async fn approve_motion(
    State(state): State<AppState>,
    Path((committee_id, motion_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    check_ids(&[committee_id.as_str(), motion_id.as_str()])?;
    let command = commands::ApproveMotion {
        correlation_id: Uuid::new_v4(),
        committee_id,
        motion_id,
    };

    info!(correlation_id = %command.correlation_id, "handling approve_motion command");

    let result = command_handlers::handle_approve_motion(&command, &*state.store).await?;

    Ok(Json(CommandResponse::new(command.correlation_id, result)))
}

/// Returns the router for motions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{committee_id}/motions",
            get(list_motions).post(propose_motion).delete(clear_motions),
        )
        .route(
            "/{committee_id}/motions/{motion_id}",
            delete(withdraw_motion),
        )
        .route(
            "/{committee_id}/motions/{motion_id}/approve",
            post(approve_motion),
        )
}
