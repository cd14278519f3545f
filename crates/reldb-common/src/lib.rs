//! # reldb-common
//!
//! Common types, error codes, and configuration for reldb.
//!
//! This crate provides the foundational pieces shared by the storage
//! collaborator (`reldb-kv`) and the relational layer (`reldb-sql`):
//!
//! - **Types**: byte-oriented `Key` and `Value` wrappers
//! - **Errors**: stable, categorized `ErrorCode`s
//! - **Config**: database configuration structures
//! - **Constants**: system-wide limits and reserved names
//!
//! ## Example
//!
//! ```rust
//! use reldb_common::types::{Key, Value};
//! use reldb_common::config::DatabaseConfig;
//!
//! let key = Key::from_bytes(b"users");
//! let value = Value::from_bytes(b"payload");
//! assert_eq!(key.len(), 5);
//! assert_eq!(value.len(), 7);
//! assert!(DatabaseConfig::default().validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use error::{ErrorCode, ErrorCategory};
pub use types::{Key, Value};
