//! Shared store backends for the Gavel committee session engine.

pub mod memory_store;
mod tree;

pub use memory_store::MemoryStore;
