//! Gavel: committee session context.
//!
//! Responsible for the roster and quorum, pending motions and their
//! procedural order, and caucuses with their speaker queue and timers.

pub mod application;
pub mod domain;
