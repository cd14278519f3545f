//! The keyspace environment.
//!
//! An `Environment` owns every keyspace of one database and counts the
//! cursors open against them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::RwLock;
use reldb_common::config::StorageConfig;
use reldb_common::types::{Key, Value};
use tracing::debug;

use super::error::{KvError, KvResult};
use super::keyspace::{check_entry_size, Keyspace};

/// How [`Environment::open_keyspace`] treats existing and missing keyspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open the keyspace, creating it if it does not exist.
    OpenOrCreate,
    /// Create the keyspace; fail if it already exists.
    CreateExclusive,
    /// Open the keyspace; fail if it does not exist.
    OpenExisting,
}

/// A collection of named keyspaces.
#[derive(Debug)]
pub struct Environment {
    /// Limits applied to every keyspace.
    config: StorageConfig,
    /// Keyspaces by name.
    keyspaces: RwLock<BTreeMap<String, Arc<Keyspace>>>,
    /// Cursors currently open against any keyspace.
    live_cursors: Arc<AtomicUsize>,
}

impl Environment {
    /// Creates an empty environment with default limits.
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Creates an empty environment with the given limits.
    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            config,
            keyspaces: RwLock::new(BTreeMap::new()),
            live_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the storage limits.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Checks an entry against the storage limits without writing it.
    ///
    /// Lets callers that write several entries reject an oversized one
    /// before the first write.
    pub fn check_entry(&self, key: &Key, value: &Value) -> KvResult<()> {
        check_entry_size(&self.config, key, value)
    }

    /// Opens (and depending on `mode`, creates) the named keyspace.
    pub fn open_keyspace(&self, name: &str, mode: OpenMode) -> KvResult<Arc<Keyspace>> {
        if mode != OpenMode::CreateExclusive {
            if let Some(ks) = self.keyspaces.read().get(name) {
                return Ok(Arc::clone(ks));
            }
        }

        let mut keyspaces = self.keyspaces.write();
        if let Some(ks) = keyspaces.get(name) {
            return match mode {
                OpenMode::CreateExclusive => Err(KvError::KeyspaceExists(name.to_string())),
                _ => Ok(Arc::clone(ks)),
            };
        }
        if mode == OpenMode::OpenExisting {
            return Err(KvError::KeyspaceNotFound(name.to_string()));
        }

        let ks = Arc::new(Keyspace::new(
            name,
            self.config.clone(),
            Arc::clone(&self.live_cursors),
        ));
        keyspaces.insert(name.to_string(), Arc::clone(&ks));
        debug!(keyspace = name, "created keyspace");
        Ok(ks)
    }

    /// Returns true if the named keyspace exists.
    pub fn keyspace_exists(&self, name: &str) -> bool {
        self.keyspaces.read().contains_key(name)
    }

    /// Removes the named keyspace and all of its entries.
    ///
    /// Handles already held by callers keep working on the detached data,
    /// but the name is free for a new keyspace.
    pub fn remove_keyspace(&self, name: &str) -> KvResult<()> {
        match self.keyspaces.write().remove(name) {
            Some(_) => {
                debug!(keyspace = name, "removed keyspace");
                Ok(())
            }
            None => Err(KvError::KeyspaceNotFound(name.to_string())),
        }
    }

    /// Returns the names of all keyspaces in sorted order.
    pub fn keyspace_names(&self) -> Vec<String> {
        self.keyspaces.read().keys().cloned().collect()
    }

    /// Returns the number of cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.live_cursors.load(AtomicOrdering::SeqCst)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn test_open_modes() {
        let env = Environment::new();

        assert_eq!(
            env.open_keyspace("a", OpenMode::OpenExisting).unwrap_err(),
            KvError::KeyspaceNotFound("a".into())
        );

        let created = env.open_keyspace("a", OpenMode::CreateExclusive).unwrap();
        created.put(Key::from("k"), Value::from_bytes(b"v")).unwrap();

        assert_eq!(
            env.open_keyspace("a", OpenMode::CreateExclusive).unwrap_err(),
            KvError::KeyspaceExists("a".into())
        );

        let reopened = env.open_keyspace("a", OpenMode::OpenExisting).unwrap();
        assert_eq!(reopened.count(), 1);

        let same = env.open_keyspace("a", OpenMode::OpenOrCreate).unwrap();
        assert!(Arc::ptr_eq(&created, &same));
    }

    #[test]
    fn test_remove_keyspace() {
        let env = Environment::new();
        let ks = env.open_keyspace("gone", OpenMode::OpenOrCreate).unwrap();
        ks.put(Key::from("k"), Value::empty()).unwrap();

        env.remove_keyspace("gone").unwrap();
        assert!(!env.keyspace_exists("gone"));
        assert_eq!(
            env.remove_keyspace("gone"),
            Err(KvError::KeyspaceNotFound("gone".into()))
        );

        // A recreated keyspace starts empty
        let fresh = env.open_keyspace("gone", OpenMode::OpenOrCreate).unwrap();
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_keyspace_names_sorted() {
        let env = Environment::new();
        for name in ["DATA_b", "SCHEMA_TableList", "DATA_a"] {
            env.open_keyspace(name, OpenMode::OpenOrCreate).unwrap();
        }
        assert_eq!(
            env.keyspace_names(),
            vec!["DATA_a", "DATA_b", "SCHEMA_TableList"]
        );
    }

    #[test]
    fn test_limits_apply_to_keyspaces() {
        let env = Environment::with_config(StorageConfig {
            max_key_size: 4,
            max_value_size: 4,
        });
        let ks = env.open_keyspace("t", OpenMode::OpenOrCreate).unwrap();
        assert!(ks.put(Key::from("12345"), Value::empty()).is_err());
        assert!(ks.put(Key::from("1234"), Value::empty()).is_ok());
    }

    #[test]
    fn test_check_entry_writes_nothing() {
        let env = Environment::with_config(StorageConfig {
            max_key_size: 4,
            max_value_size: 2,
        });
        assert_eq!(
            env.check_entry(&Key::from("12345"), &Value::empty()),
            Err(KvError::KeyTooLarge { size: 5, max: 4 })
        );
        assert_eq!(
            env.check_entry(&Key::from("k"), &Value::from_bytes(b"abc")),
            Err(KvError::ValueTooLarge { size: 3, max: 2 })
        );
        assert!(env.check_entry(&Key::from("k"), &Value::from_bytes(b"ab")).is_ok());
        assert!(env.keyspace_names().is_empty());
    }

    #[test]
    fn test_random_inserts_iterate_in_order() {
        let env = Environment::new();
        let ks = env.open_keyspace("t", OpenMode::OpenOrCreate).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut ids: Vec<u32> = (0..200).collect();
        ids.shuffle(&mut rng);
        for id in &ids {
            ks.put(Key::from_vec(id.to_be_bytes().to_vec()), Value::empty())
                .unwrap();
        }

        let mut cursor = ks.cursor();
        let mut seen = Vec::new();
        let mut entry = cursor.first();
        while let Some(e) = entry {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(e.key.as_bytes());
            seen.push(u32::from_be_bytes(buf));
            entry = cursor.next();
        }
        assert_eq!(seen, (0..200).collect::<Vec<_>>());
        drop(cursor);
        assert_eq!(env.open_cursors(), 0);
    }
}
