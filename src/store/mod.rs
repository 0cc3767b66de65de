//! In-memory storage module
//!
//! Provides the two namespaces (strings and lists) and their atomic operations.
//! This module is independent of protocol and command handling (loose coupling).

mod keyspace;
mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{RangeItem, Snapshot};
