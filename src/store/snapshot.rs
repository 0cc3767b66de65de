//! Plain-data views of the keyspace

use bytes::Bytes;

/// One element returned by a range query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeItem {
    /// 1-based position within the returned window
    pub position: usize,

    /// The element
    pub value: Bytes,
}

/// A consistent copy of both namespaces
///
/// Taken in a single critical section, so it never mixes the effects of
/// two concurrent operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Store generation at the time the copy was taken
    pub generation: u64,

    /// String namespace, sorted by key
    pub strings: Vec<(Bytes, Bytes)>,

    /// List namespace, sorted by key, elements in list order
    pub lists: Vec<(Bytes, Vec<Bytes>)>,
}

impl Snapshot {
    /// Number of keys across both namespaces
    pub fn key_count(&self) -> usize {
        self.strings.len() + self.lists.len()
    }
}
