//! Byte buffers stored in keyspaces.
//!
//! Every keyspace entry is a [`Key`] / [`Value`] pair:
//!
//! - `SCHEMA_*` keyspaces are keyed by table or column name (UTF-8 text), or
//!   by an encoded column-name list, and hold serialized catalog entries.
//! - `DATA_<table>` keyspaces are keyed by an order-preserving encoding of the
//!   primary key tuple (or a big-endian sequence token) and hold encoded rows.
//!
//! Both sides are checked against `StorageConfig::max_key_size` and
//! `max_value_size` before a write.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Construction and inspection shared by [`Key`] and [`Value`].
macro_rules! byte_buffer {
    ($name:ident) => {
        impl $name {
            /// Creates an empty buffer.
            #[must_use]
            pub const fn empty() -> Self {
                Self(Bytes::new())
            }

            /// Copies `bytes` into a new buffer.
            #[must_use]
            pub fn from_bytes(bytes: &[u8]) -> Self {
                Self(Bytes::copy_from_slice(bytes))
            }

            /// Takes ownership of an encoder's output without copying.
            #[must_use]
            pub fn from_vec(vec: Vec<u8>) -> Self {
                Self(Bytes::from(vec))
            }

            /// Size in bytes, as compared against the storage limits.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Returns true for a zero-length buffer.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the raw bytes.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self::from_bytes(bytes)
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(vec: Vec<u8>) -> Self {
                Self::from_vec(vec)
            }
        }
    };
}

/// A keyspace key.
///
/// Cursors visit keys in bytewise lexicographic order, so an encoded
/// primary key sorts the way its tuple does.
///
/// # Example
///
/// ```rust
/// use reldb_common::types::Key;
///
/// // Catalog keys are plain names
/// let column = Key::from("dept_id");
/// assert_eq!(column.len(), 7);
///
/// // Sequence tokens are big-endian so insertion order is key order
/// let first = Key::from_vec(1u64.to_be_bytes().to_vec());
/// let second = Key::from_vec(256u64.to_be_bytes().to_vec());
/// assert!(first < second);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(Bytes);

byte_buffer!(Key);

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::from_bytes(name.as_bytes())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::from_vec(name.into_bytes())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Catalog names print as text, encoded tuples as hex
        match std::str::from_utf8(self) {
            Ok(name) if !name.chars().any(char::is_control) => write!(f, "Key({name:?})"),
            _ => {
                let shown = &self[..self.len().min(32)];
                write!(f, "Key(0x")?;
                for byte in shown {
                    write!(f, "{byte:02x}")?;
                }
                let more = if self.len() > shown.len() { "..." } else { "" };
                write!(f, "{more})")
            }
        }
    }
}

/// A keyspace value: an encoded row or catalog entry.
///
/// # Example
///
/// ```rust
/// use reldb_common::types::Value;
///
/// let row = Value::from(vec![0u8, 0, 0, 2]);
/// assert_eq!(row.len(), 4);
/// assert!(Value::empty().is_empty());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value(Bytes);

byte_buffer!(Value);

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({} bytes)", self.len())
    }
}
