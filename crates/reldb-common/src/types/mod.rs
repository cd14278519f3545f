//! Type definitions for reldb.
//!
//! Byte buffers shared by the storage collaborator and the relational layer.

mod keys;

pub use keys::{Key, Value};
