//! Command execution context

use crate::store::MemoryStore;
use std::sync::Arc;

/// Context provided to commands during execution
///
/// Gives commands access to the shared store. The store does its own
/// locking, so the context is shared read-only between sessions.
#[derive(Clone)]
pub struct CommandContext {
    /// The memory store
    pub store: Arc<MemoryStore>,
}

impl CommandContext {
    /// Create a context over a fresh store
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Create a context over an existing store
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        CommandContext { store }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
