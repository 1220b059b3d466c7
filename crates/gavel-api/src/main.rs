//! Gavel API server entry point.

use std::sync::Arc;

use gavel_api::config::ServerConfig;
use gavel_api::error::AppError;
use gavel_api::state::AppState;
use gavel_core::clock::SystemClock;
use gavel_store::MemoryStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Gavel API server");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    let app_state = AppState::new(Arc::new(SystemClock), Arc::new(MemoryStore::new()));

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = gavel_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
