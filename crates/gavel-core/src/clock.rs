//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Abstraction over wall-clock time.
///
/// Timer state is stored relative to the time of its last change, so every
/// client reads the same clock source to project the current countdown.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
