//! Application layer for the committee context.

pub mod command_handlers;
pub mod query_handlers;
pub mod session;
