//! Gavel API: HTTP surface over the committee command and query handlers.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full router with every route mounted. Layers are added by the
/// caller.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/committees", routes::committees::router())
        .with_state(state)
}
