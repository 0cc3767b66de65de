//! Snapshot restore
//!
//! Rebuilds the store from decoded snapshot records, through the same
//! operations clients use.

use crate::store::MemoryStore;
use bytes::Bytes;

/// Insert every string through `set`, returns the number of keys
pub fn restore_strings(store: &MemoryStore, entries: Vec<(Bytes, Bytes)>) -> usize {
    let count = entries.len();
    for (key, value) in entries {
        store.set(key, value);
    }
    count
}

/// Replay every list element through `rpush`, in stored order
///
/// Lists saved while empty are recreated empty. Returns the number of keys.
pub fn restore_lists(store: &MemoryStore, entries: Vec<(Bytes, Vec<Bytes>)>) -> usize {
    let count = entries.len();
    for (key, items) in entries {
        if items.is_empty() {
            store.create_list(key);
            continue;
        }
        for item in items {
            store.rpush(key.clone(), item);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_strings() {
        let store = MemoryStore::new();

        let restored = restore_strings(
            &store,
            vec![
                (Bytes::from("key1"), Bytes::from("value1")),
                (Bytes::from("key2"), Bytes::from("value2")),
            ],
        );

        assert_eq!(restored, 2);
        assert_eq!(store.get(b"key1"), Some(Bytes::from("value1")));
        assert_eq!(store.get(b"key2"), Some(Bytes::from("value2")));
    }

    #[test]
    fn test_restore_lists_keeps_order() {
        let store = MemoryStore::new();

        restore_lists(
            &store,
            vec![
                (Bytes::from("l"), vec![Bytes::from("c"), Bytes::from("a"), Bytes::from("b")]),
                (Bytes::from("drained"), vec![]),
            ],
        );

        let values: Vec<Bytes> = store
            .range(b"l", 0, -1)
            .unwrap()
            .into_iter()
            .map(|i| i.value)
            .collect();
        assert_eq!(values, vec![Bytes::from("c"), Bytes::from("a"), Bytes::from("b")]);
        assert!(store.contains_list(b"drained"));
        assert_eq!(store.len(b"drained"), 0);
    }
}
