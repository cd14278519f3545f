//! Error codes for reldb.
//!
//! Concrete error types live with the crates that raise them (`KvError`,
//! `SqlError`); this module provides the stable codes they map to.

mod code;

pub use code::{ErrorCategory, ErrorCode};
