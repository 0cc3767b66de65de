//! Thread-safe in-memory store

use super::keyspace::Keyspace;
use super::snapshot::{RangeItem, Snapshot};
use bytes::Bytes;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory key-value store
///
/// Every operation takes the same lock, so all operations (across both
/// namespaces) happen in a single global order. `range` and `len` read the
/// list size and its elements inside one critical section.
pub struct MemoryStore {
    keyspace: Mutex<Keyspace>,
}

impl MemoryStore {
    /// Create a new memory store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new memory store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            keyspace: Mutex::new(Keyspace::with_capacity(capacity)),
        }
    }

    /// Lock the keyspace
    ///
    /// A panic while holding the lock cannot leave a half-applied operation
    /// behind (each operation is a single map call), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Keyspace> {
        self.keyspace.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a string value
    pub fn set(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.lock().set(key.into(), value.into());
    }

    /// Get a string value
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.lock().get(key)
    }

    /// Delete a string value, returns true if it existed
    pub fn del(&self, key: &[u8]) -> bool {
        self.lock().del(key)
    }

    /// Prepend to a list, creating it if needed
    pub fn lpush(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.lock().lpush(key.into(), value.into());
    }

    /// Append to a list, creating it if needed
    pub fn rpush(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.lock().rpush(key.into(), value.into());
    }

    /// Ensure an empty list exists under `key`, returns true if it was created
    pub fn create_list(&self, key: impl Into<Bytes>) -> bool {
        self.lock().create_list(key.into())
    }

    /// Get list elements from `start` to `end` inclusive (negative = from the end)
    pub fn range(&self, key: &[u8], start: i64, end: i64) -> Option<Vec<RangeItem>> {
        self.lock().range(key, start, end)
    }

    /// List length, 0 if absent
    pub fn len(&self, key: &[u8]) -> usize {
        self.lock().len(key)
    }

    /// Remove and return the head of a list
    pub fn lpop(&self, key: &[u8]) -> Option<Bytes> {
        self.lock().lpop(key)
    }

    /// Remove and return the tail of a list
    pub fn rpop(&self, key: &[u8]) -> Option<Bytes> {
        self.lock().rpop(key)
    }

    /// Delete a whole list, returns true if it existed
    pub fn ldel(&self, key: &[u8]) -> bool {
        self.lock().ldel(key)
    }

    /// Check whether a list entry exists (empty lists included)
    pub fn contains_list(&self, key: &[u8]) -> bool {
        self.lock().contains_list(key)
    }

    /// Current mutation generation
    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    /// Copy both namespaces under the lock
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
