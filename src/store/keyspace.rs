//! Raw keyspace
//!
//! Holds the two namespaces (strings and lists) without any locking.
//! `MemoryStore` wraps a `Keyspace` in a mutex; everything in here assumes
//! the caller already holds it.

use super::snapshot::{RangeItem, Snapshot};
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasherDefault;

/// Hash map keyed by `Bytes` using SipHasher
type KeyMap<V> = HashMap<Bytes, V, BuildHasherDefault<SipHasher13>>;

/// Both namespaces plus the mutation generation
pub struct Keyspace {
    /// String namespace
    strings: KeyMap<Bytes>,

    /// List namespace
    lists: KeyMap<VecDeque<Bytes>>,

    /// Bumped on every operation that changes state
    generation: u64,
}

impl Keyspace {
    /// Create an empty keyspace with room for `capacity` keys per namespace
    pub fn with_capacity(capacity: usize) -> Self {
        Keyspace {
            strings: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
            lists: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
            generation: 0,
        }
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set(&mut self, key: Bytes, value: Bytes) {
        self.strings.insert(key, value);
        self.touch();
    }

    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.strings.get(key).cloned()
    }

    pub fn del(&mut self, key: &[u8]) -> bool {
        let existed = self.strings.remove(key).is_some();
        if existed {
            self.touch();
        }
        existed
    }

    /// Get the list for `key`, creating an empty one if absent
    fn list_entry(&mut self, key: Bytes) -> &mut VecDeque<Bytes> {
        self.lists.entry(key).or_default()
    }

    pub fn lpush(&mut self, key: Bytes, value: Bytes) {
        self.list_entry(key).push_front(value);
        self.touch();
    }

    pub fn rpush(&mut self, key: Bytes, value: Bytes) {
        self.list_entry(key).push_back(value);
        self.touch();
    }

    /// Make sure an (empty) list exists under `key`
    pub fn create_list(&mut self, key: Bytes) -> bool {
        if self.lists.contains_key(&key) {
            return false;
        }
        self.lists.insert(key, VecDeque::new());
        self.touch();
        true
    }

    /// Elements between `start` and `end` inclusive
    ///
    /// Negative indices count from the end of the list. Returns `None` when
    /// the list is absent or the resolved window is empty.
    pub fn range(&self, key: &[u8], start: i64, end: i64) -> Option<Vec<RangeItem>> {
        let list = self.lists.get(key)?;
        let len = list.len() as i64;

        let start = if start < 0 { len + start } else { start };
        let end = if end < 0 { len + end } else { end };

        if start >= len || end < 0 {
            return None;
        }

        let start = start.max(0) as usize;
        let end = end.min(len - 1) as usize;
        if start > end {
            return None;
        }

        let items = list
            .range(start..=end)
            .enumerate()
            .map(|(i, value)| RangeItem {
                position: i + 1,
                value: value.clone(),
            })
            .collect();

        Some(items)
    }

    pub fn len(&self, key: &[u8]) -> usize {
        self.lists.get(key).map(VecDeque::len).unwrap_or(0)
    }

    pub fn lpop(&mut self, key: &[u8]) -> Option<Bytes> {
        let value = self.lists.get_mut(key)?.pop_front()?;
        self.touch();
        Some(value)
    }

    pub fn rpop(&mut self, key: &[u8]) -> Option<Bytes> {
        let value = self.lists.get_mut(key)?.pop_back()?;
        self.touch();
        Some(value)
    }

    pub fn ldel(&mut self, key: &[u8]) -> bool {
        let existed = self.lists.remove(key).is_some();
        if existed {
            self.touch();
        }
        existed
    }

    pub fn contains_list(&self, key: &[u8]) -> bool {
        self.lists.contains_key(key)
    }

    /// Copy both namespaces out
    ///
    /// Keys are sorted so that identical states encode to identical bytes.
    pub fn snapshot(&self) -> Snapshot {
        let mut strings: Vec<(Bytes, Bytes)> = self
            .strings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        strings.sort_by(|a, b| a.0.cmp(&b.0));

        let mut lists: Vec<(Bytes, Vec<Bytes>)> = self
            .lists
            .iter()
            .map(|(k, items)| (k.clone(), items.iter().cloned().collect()))
            .collect();
        lists.sort_by(|a, b| a.0.cmp(&b.0));

        Snapshot {
            generation: self.generation,
            strings,
            lists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: Option<Vec<RangeItem>>) -> Vec<(usize, Bytes)> {
        items
            .unwrap_or_default()
            .into_iter()
            .map(|item| (item.position, item.value))
            .collect()
    }

    fn pair(position: usize, value: &'static str) -> (usize, Bytes) {
        (position, Bytes::from(value))
    }

    fn abc() -> Keyspace {
        let mut ks = Keyspace::with_capacity(16);
        for v in ["a", "b", "c"] {
            ks.rpush(Bytes::from("l"), Bytes::from(v));
        }
        ks
    }

    #[test]
    fn test_range_negative_indices() {
        let ks = abc();
        assert_eq!(values(ks.range(b"l", -2, -1)), vec![pair(1, "b"), pair(2, "c")]);
    }

    #[test]
    fn test_range_clamps_bounds() {
        let ks = abc();
        assert_eq!(
            values(ks.range(b"l", -10, 100)),
            vec![pair(1, "a"), pair(2, "b"), pair(3, "c")]
        );
        assert_eq!(values(ks.range(b"l", 1, 1)), vec![pair(1, "b")]);
    }

    #[test]
    fn test_range_out_of_bounds_is_none() {
        let ks = abc();
        assert!(ks.range(b"l", 3, 5).is_none());
        assert!(ks.range(b"l", 0, -4).is_none());
        assert!(ks.range(b"l", 2, 1).is_none());
        assert!(ks.range(b"missing", 0, -1).is_none());
    }

    #[test]
    fn test_generation_only_moves_on_change() {
        let mut ks = Keyspace::with_capacity(16);
        assert_eq!(ks.generation(), 0);

        assert!(ks.lpop(b"l").is_none());
        assert!(!ks.del(b"k"));
        assert_eq!(ks.generation(), 0);

        ks.set(Bytes::from("k"), Bytes::from("v"));
        assert_eq!(ks.generation(), 1);
        assert!(ks.del(b"k"));
        assert_eq!(ks.generation(), 2);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let mut ks = Keyspace::with_capacity(16);
        ks.set(Bytes::from("b"), Bytes::from("2"));
        ks.set(Bytes::from("a"), Bytes::from("1"));

        let snapshot = ks.snapshot();
        assert_eq!(snapshot.strings[0].0, Bytes::from("a"));
        assert_eq!(snapshot.strings[1].0, Bytes::from("b"));
        assert_eq!(snapshot.generation, 2);
    }
}
