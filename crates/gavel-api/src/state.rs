//! Shared application state.

use std::sync::Arc;

use gavel_core::clock::Clock;
use gavel_core::store::SharedStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of "now" for timer transitions and projections.
    pub clock: Arc<dyn Clock>,
    /// The shared committee tree.
    pub store: Arc<dyn SharedStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn SharedStore>) -> Self {
        Self { clock, store }
    }
}
