//! Gavel Core: shared store and domain abstractions.
//!
//! This crate defines the traits and types every committee component depends
//! on: time, commands, errors, store paths, change sets and the shared store
//! contract itself. It contains no store implementation.

pub mod change;
pub mod clock;
pub mod command;
pub mod error;
pub mod path;
pub mod store;
