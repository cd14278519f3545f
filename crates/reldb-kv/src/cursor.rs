//! Cursor implementation for keyspace traversal.
//!
//! A cursor remembers the *key* it is positioned on rather than an offset,
//! so it stays meaningful after its own entry is deleted: `next` and `prev`
//! continue from the deleted key's place in the order.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use reldb_common::types::{Key, Value};

use super::error::{KvError, KvResult};
use super::keyspace::Keyspace;

/// A key-value pair returned by the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorEntry {
    /// The key.
    pub key: Key,
    /// The value.
    pub value: Value,
}

impl CursorEntry {
    /// Creates a new cursor entry.
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }
}

/// State of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Cursor has not been positioned yet.
    Uninitialized,
    /// Cursor is positioned on a key (which may since have been deleted).
    Valid,
    /// Cursor is past the last entry.
    AtEnd,
    /// Cursor is before the first entry.
    BeforeStart,
}

#[derive(Debug, Clone)]
enum Position {
    Uninitialized,
    At(Key),
    AtEnd,
    BeforeStart,
}

/// A cursor over one keyspace.
///
/// Dropping the cursor releases it; the owning environment counts live
/// cursors so leaks are observable.
#[derive(Debug)]
pub struct Cursor {
    /// The keyspace being iterated.
    keyspace: Arc<Keyspace>,
    /// Current position.
    position: Position,
    /// Live cursor counter of the environment.
    live: Arc<AtomicUsize>,
}

impl Cursor {
    pub(crate) fn new(keyspace: Arc<Keyspace>, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, AtomicOrdering::SeqCst);
        Self {
            keyspace,
            position: Position::Uninitialized,
            live,
        }
    }

    /// Returns the keyspace this cursor walks.
    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }

    /// Returns the current state.
    pub fn state(&self) -> CursorState {
        match self.position {
            Position::Uninitialized => CursorState::Uninitialized,
            Position::At(_) => CursorState::Valid,
            Position::AtEnd => CursorState::AtEnd,
            Position::BeforeStart => CursorState::BeforeStart,
        }
    }

    /// Positions the cursor on the first entry.
    pub fn first(&mut self) -> Option<CursorEntry> {
        let entry = self.keyspace.first_entry();
        self.settle(entry, Position::AtEnd)
    }

    /// Positions the cursor on the last entry.
    pub fn last(&mut self) -> Option<CursorEntry> {
        let entry = self.keyspace.last_entry();
        self.settle(entry, Position::BeforeStart)
    }

    /// Moves to the next entry.
    ///
    /// From an unpositioned or before-start cursor this is `first`.
    pub fn next(&mut self) -> Option<CursorEntry> {
        match &self.position {
            Position::Uninitialized | Position::BeforeStart => self.first(),
            Position::At(key) => {
                let entry = self.keyspace.entry_after(key);
                self.settle(entry, Position::AtEnd)
            }
            Position::AtEnd => None,
        }
    }

    /// Moves to the previous entry.
    ///
    /// Stepping back from the first entry leaves the cursor before the start
    /// and returns `None`; a following `next` yields whatever entry is first
    /// at that time.
    pub fn prev(&mut self) -> Option<CursorEntry> {
        match &self.position {
            Position::Uninitialized | Position::AtEnd => self.last(),
            Position::At(key) => {
                let entry = self.keyspace.entry_before(key);
                self.settle(entry, Position::BeforeStart)
            }
            Position::BeforeStart => None,
        }
    }

    /// Returns the entry under the cursor.
    ///
    /// `None` if the cursor is not positioned or its entry has been deleted.
    pub fn current(&self) -> Option<CursorEntry> {
        match &self.position {
            Position::At(key) => self
                .keyspace
                .get(key)
                .map(|value| CursorEntry::new(key.clone(), value)),
            _ => None,
        }
    }

    /// Returns the key the cursor is positioned on.
    pub fn current_key(&self) -> Option<&Key> {
        match &self.position {
            Position::At(key) => Some(key),
            _ => None,
        }
    }

    /// Deletes the entry under the cursor.
    ///
    /// The cursor keeps its position so `next`/`prev` continue from it.
    pub fn delete(&mut self) -> KvResult<()> {
        let key = self.current_key().ok_or(KvError::CursorNotPositioned)?;
        if self.keyspace.delete(key) {
            Ok(())
        } else {
            Err(KvError::KeyNotFound)
        }
    }

    /// Replaces the value of the entry under the cursor.
    pub fn put_current(&mut self, value: Value) -> KvResult<()> {
        let key = self.current_key().ok_or(KvError::CursorNotPositioned)?;
        self.keyspace.replace(key, value)
    }

    fn settle(&mut self, entry: Option<CursorEntry>, exhausted: Position) -> Option<CursorEntry> {
        match entry {
            Some(entry) => {
                self.position = Position::At(entry.key.clone());
                Some(entry)
            }
            None => {
                self.position = exhausted;
                None
            }
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.live.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment, OpenMode};

    fn populated(count: usize) -> (Environment, Arc<Keyspace>) {
        let env = Environment::new();
        let ks = env.open_keyspace("t", OpenMode::OpenOrCreate).unwrap();
        for i in 0..count {
            ks.put(
                Key::from(format!("key{:03}", i)),
                Value::from_vec(format!("val{}", i).into_bytes()),
            )
            .unwrap();
        }
        (env, ks)
    }

    fn collect_forward(cursor: &mut Cursor) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut entry = cursor.first();
        while let Some(e) = entry {
            keys.push(e.key);
            entry = cursor.next();
        }
        keys
    }

    #[test]
    fn test_cursor_forward() {
        let (_env, ks) = populated(5);
        let mut cursor = ks.cursor();
        assert_eq!(cursor.state(), CursorState::Uninitialized);

        let keys = collect_forward(&mut cursor);
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0].as_bytes(), b"key000");
        assert_eq!(keys[4].as_bytes(), b"key004");
        assert_eq!(cursor.state(), CursorState::AtEnd);
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_cursor_backward() {
        let (_env, ks) = populated(3);
        let mut cursor = ks.cursor();

        assert_eq!(cursor.last().unwrap().key.as_bytes(), b"key002");
        assert_eq!(cursor.prev().unwrap().key.as_bytes(), b"key001");
        assert_eq!(cursor.prev().unwrap().key.as_bytes(), b"key000");
        assert!(cursor.prev().is_none());
        assert_eq!(cursor.state(), CursorState::BeforeStart);
        assert_eq!(cursor.next().unwrap().key.as_bytes(), b"key000");
    }

    #[test]
    fn test_cursor_empty_keyspace() {
        let (_env, ks) = populated(0);
        let mut cursor = ks.cursor();
        assert!(cursor.first().is_none());
        assert_eq!(cursor.state(), CursorState::AtEnd);
        assert!(cursor.current().is_none());
        assert_eq!(cursor.delete(), Err(KvError::CursorNotPositioned));
    }

    #[test]
    fn test_cursor_delete_keeps_position() {
        let (_env, ks) = populated(3);
        let mut cursor = ks.cursor();
        cursor.first();
        cursor.next();

        cursor.delete().unwrap();
        assert!(cursor.current().is_none());
        assert_eq!(cursor.delete(), Err(KvError::KeyNotFound));
        assert_eq!(cursor.next().unwrap().key.as_bytes(), b"key002");
        assert_eq!(ks.count(), 2);
    }

    #[test]
    fn test_cursor_delete_first_then_prev() {
        let (_env, ks) = populated(3);
        let mut cursor = ks.cursor();
        cursor.first();
        cursor.delete().unwrap();

        assert!(cursor.prev().is_none());
        assert_eq!(cursor.state(), CursorState::BeforeStart);
        assert_eq!(cursor.next().unwrap().key.as_bytes(), b"key001");
    }

    #[test]
    fn test_cursor_put_current() {
        let (_env, ks) = populated(2);
        let mut cursor = ks.cursor();
        cursor.first();
        cursor.put_current(Value::from_bytes(b"changed")).unwrap();

        assert_eq!(
            ks.get(&Key::from("key000")).unwrap().as_bytes(),
            b"changed"
        );
        assert_eq!(cursor.current().unwrap().value.as_bytes(), b"changed");
        assert_eq!(ks.count(), 2);
    }

    #[test]
    fn test_cursor_sees_live_inserts() {
        let (_env, ks) = populated(2);
        let mut cursor = ks.cursor();
        cursor.first();
        ks.put(Key::from("key0005"), Value::empty()).unwrap();
        assert_eq!(cursor.next().unwrap().key.as_bytes(), b"key0005");
    }

    #[test]
    fn test_cursor_release_on_drop() {
        let (env, ks) = populated(1);
        {
            let _a = ks.cursor();
            let _b = ks.cursor();
            assert_eq!(env.open_cursors(), 2);
        }
        assert_eq!(env.open_cursors(), 0);
    }
}
