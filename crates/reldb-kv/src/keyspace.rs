//! A single named keyspace.
//!
//! Entries are kept in key order in a `BTreeMap` behind a `parking_lot`
//! lock. Each operation takes the lock once, which is what makes it atomic
//! per key; nothing spans more than one call.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::RwLock;
use reldb_common::config::StorageConfig;
use reldb_common::types::{Key, Value};

use super::cursor::{Cursor, CursorEntry};
use super::error::{KvError, KvResult};

/// An ordered map from byte keys to byte values.
///
/// Obtain one through [`Environment::open_keyspace`](crate::Environment::open_keyspace).
#[derive(Debug)]
pub struct Keyspace {
    /// Keyspace name.
    name: String,
    /// Entries in key order.
    entries: RwLock<BTreeMap<Key, Value>>,
    /// Source of system-generated keys.
    sequence: AtomicU64,
    /// Size limits.
    limits: StorageConfig,
    /// Live cursor counter shared with the owning environment.
    live_cursors: Arc<AtomicUsize>,
}

impl Keyspace {
    pub(crate) fn new(
        name: impl Into<String>,
        limits: StorageConfig,
        live_cursors: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
            sequence: AtomicU64::new(1),
            limits,
            live_cursors,
        }
    }

    /// Returns the keyspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of entries.
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the keyspace has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Gets the value stored under `key`.
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&self, key: Key, value: Value) -> KvResult<()> {
        self.check_limits(&key, &value)?;
        self.entries.write().insert(key, value);
        Ok(())
    }

    /// Stores `value` under `key` only if the key is absent.
    ///
    /// Returns `false` (and leaves the keyspace unchanged) when the key
    /// already exists.
    pub fn put_if_absent(&self, key: Key, value: Value) -> KvResult<bool> {
        self.check_limits(&key, &value)?;
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Ok(false);
        }
        entries.insert(key, value);
        Ok(true)
    }

    /// Deletes `key`. Returns whether it was present.
    pub fn delete(&self, key: &Key) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Returns the next system-generated token, unique within this keyspace.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, AtomicOrdering::SeqCst)
    }

    /// Opens a cursor over this keyspace.
    ///
    /// The cursor is unpositioned until `first`, `last`, `next` or `prev`
    /// is called. It keeps the keyspace alive and is counted by the
    /// environment until dropped.
    pub fn cursor(self: &Arc<Self>) -> Cursor {
        Cursor::new(Arc::clone(self), Arc::clone(&self.live_cursors))
    }

    // =========================================================================
    // Ordered Navigation (used by cursors)
    // =========================================================================

    pub(crate) fn first_entry(&self) -> Option<CursorEntry> {
        self.entries
            .read()
            .iter()
            .next()
            .map(|(k, v)| CursorEntry::new(k.clone(), v.clone()))
    }

    pub(crate) fn last_entry(&self) -> Option<CursorEntry> {
        self.entries
            .read()
            .iter()
            .next_back()
            .map(|(k, v)| CursorEntry::new(k.clone(), v.clone()))
    }

    pub(crate) fn entry_after(&self, key: &Key) -> Option<CursorEntry> {
        self.entries
            .read()
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .map(|(k, v)| CursorEntry::new(k.clone(), v.clone()))
    }

    pub(crate) fn entry_before(&self, key: &Key) -> Option<CursorEntry> {
        self.entries
            .read()
            .range((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
            .map(|(k, v)| CursorEntry::new(k.clone(), v.clone()))
    }

    /// Overwrites an existing entry; fails if the key has gone away.
    pub(crate) fn replace(&self, key: &Key, value: Value) -> KvResult<()> {
        self.check_limits(key, &value)?;
        let mut entries = self.entries.write();
        match entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(KvError::KeyNotFound),
        }
    }

    fn check_limits(&self, key: &Key, value: &Value) -> KvResult<()> {
        check_entry_size(&self.limits, key, value)
    }
}

/// Fails with `KeyTooLarge` or `ValueTooLarge` if the entry exceeds `limits`.
pub(crate) fn check_entry_size(limits: &StorageConfig, key: &Key, value: &Value) -> KvResult<()> {
    if key.len() > limits.max_key_size {
        return Err(KvError::KeyTooLarge {
            size: key.len(),
            max: limits.max_key_size,
        });
    }
    if value.len() > limits.max_value_size {
        return Err(KvError::ValueTooLarge {
            size: value.len(),
            max: limits.max_value_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyspace() -> Arc<Keyspace> {
        Arc::new(Keyspace::new(
            "test",
            StorageConfig {
                max_key_size: 8,
                max_value_size: 16,
            },
            Arc::new(AtomicUsize::new(0)),
        ))
    }

    #[test]
    fn test_put_get_delete() {
        let ks = keyspace();
        assert!(ks.is_empty());

        ks.put(Key::from("a"), Value::from_bytes(b"1")).unwrap();
        assert_eq!(ks.get(&Key::from("a")).unwrap().as_bytes(), b"1");
        assert_eq!(ks.count(), 1);

        ks.put(Key::from("a"), Value::from_bytes(b"2")).unwrap();
        assert_eq!(ks.get(&Key::from("a")).unwrap().as_bytes(), b"2");
        assert_eq!(ks.count(), 1);

        assert!(ks.delete(&Key::from("a")));
        assert!(!ks.delete(&Key::from("a")));
        assert!(ks.get(&Key::from("a")).is_none());
    }

    #[test]
    fn test_put_if_absent() {
        let ks = keyspace();
        assert!(ks.put_if_absent(Key::from("k"), Value::from_bytes(b"x")).unwrap());
        assert!(!ks.put_if_absent(Key::from("k"), Value::from_bytes(b"y")).unwrap());
        assert_eq!(ks.get(&Key::from("k")).unwrap().as_bytes(), b"x");
    }

    #[test]
    fn test_size_limits() {
        let ks = keyspace();
        let result = ks.put(Key::from("too-long-key"), Value::empty());
        assert_eq!(result, Err(KvError::KeyTooLarge { size: 12, max: 8 }));

        let result = ks.put_if_absent(Key::from("k"), Value::from_vec(vec![0; 17]));
        assert_eq!(result, Err(KvError::ValueTooLarge { size: 17, max: 16 }));
        assert!(ks.is_empty());
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let ks = keyspace();
        let a = ks.next_sequence();
        let b = ks.next_sequence();
        assert!(b > a);
    }

    #[test]
    fn test_ordered_navigation() {
        let ks = keyspace();
        for k in ["b", "d", "a", "c"] {
            ks.put(Key::from(k), Value::from_bytes(k.as_bytes())).unwrap();
        }

        assert_eq!(ks.first_entry().unwrap().key, Key::from("a"));
        assert_eq!(ks.last_entry().unwrap().key, Key::from("d"));
        assert_eq!(ks.entry_after(&Key::from("b")).unwrap().key, Key::from("c"));
        assert_eq!(ks.entry_before(&Key::from("b")).unwrap().key, Key::from("a"));
        assert!(ks.entry_before(&Key::from("a")).is_none());
        assert!(ks.entry_after(&Key::from("d")).is_none());
        // Navigation from a key that is not present still works
        assert_eq!(ks.entry_after(&Key::from("bb")).unwrap().key, Key::from("c"));
    }
}
