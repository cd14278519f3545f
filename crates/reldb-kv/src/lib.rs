//! # reldb-kv
//!
//! Ordered, byte-keyed keyspace store for reldb.
//!
//! This crate is the storage collaborator the relational layer is built on.
//! It provides:
//! - Named keyspaces inside an [`Environment`], opened or created on demand
//! - Exact-key `get` / `put` / `put_if_absent` / `delete` and `count`
//! - [`Cursor`]s that walk a keyspace in key order and can delete or rewrite
//!   the entry they are positioned on
//!
//! Every operation is atomic per key. There are no multi-key transactions;
//! callers that need all-or-nothing behavior validate before they write.
//!
//! ## Usage
//!
//! ```rust
//! use reldb_kv::{Environment, OpenMode};
//! use reldb_common::types::{Key, Value};
//!
//! let env = Environment::new();
//! let users = env.open_keyspace("users", OpenMode::OpenOrCreate).unwrap();
//! users.put(Key::from("user:1"), Value::from_bytes(b"Alice")).unwrap();
//! users.put(Key::from("user:2"), Value::from_bytes(b"Bob")).unwrap();
//!
//! let mut cursor = users.cursor();
//! let first = cursor.first().unwrap();
//! assert_eq!(first.key.as_bytes(), b"user:1");
//! assert_eq!(cursor.next().unwrap().value.as_bytes(), b"Bob");
//! assert!(cursor.next().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cursor;
mod environment;
mod error;
mod keyspace;

pub use cursor::{Cursor, CursorEntry, CursorState};
pub use environment::{Environment, OpenMode};
pub use error::{KvError, KvResult};
pub use keyspace::Keyspace;
