//! Shared test mocks and utilities for the Gavel committee session engine.

mod clock;
mod store;

pub use clock::{FixedClock, ManualClock};
pub use store::{InterferingStore, RecordingStore, UnavailableStore};
