//! Domain layer for the committee context.

pub mod attendance;
pub mod caucus;
pub mod commands;
pub mod committee;
pub mod layout;
pub mod lenient;
pub mod motion;
pub mod participant;
pub mod ranking;
pub mod timer;
