//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Nothing is stored at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// A change set precondition did not hold when the store applied it.
    #[error("concurrency conflict at {path}")]
    ConcurrencyConflict {
        /// The guarded path whose value had changed.
        path: String,
    },

    /// A timer transition that is not allowed from the current phase.
    #[error("invalid transition: cannot {action} a timer that is {phase}")]
    InvalidTransition {
        /// The attempted transition.
        action: &'static str,
        /// The phase the timer was in.
        phase: String,
    },

    /// A participant with the same name is already on the roster.
    #[error("duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The shared store cannot be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An infrastructure/serialization error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
