//! Error types for the keyspace store.

use reldb_common::ErrorCode;
use thiserror::Error;

/// Result type for keyspace operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can occur in keyspace operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Keyspace does not exist.
    #[error("keyspace not found: {0}")]
    KeyspaceNotFound(String),

    /// Keyspace already exists (exclusive create).
    #[error("keyspace already exists: {0}")]
    KeyspaceExists(String),

    /// Key is too large.
    #[error("key too large: {size} bytes (max: {max})")]
    KeyTooLarge {
        /// Actual size of the key.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Value is too large.
    #[error("value too large: {size} bytes (max: {max})")]
    ValueTooLarge {
        /// Actual size of the value.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// The cursor is not positioned on an entry.
    #[error("cursor is not positioned on an entry")]
    CursorNotPositioned,

    /// The entry under the cursor was removed by another handle.
    #[error("entry under cursor no longer exists")]
    KeyNotFound,
}

impl KvError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            KvError::KeyspaceNotFound(_) => ErrorCode::KeyspaceNotFound,
            KvError::KeyspaceExists(_) => ErrorCode::KeyspaceExists,
            KvError::KeyTooLarge { .. } => ErrorCode::KeyTooLarge,
            KvError::ValueTooLarge { .. } => ErrorCode::ValueTooLarge,
            KvError::CursorNotPositioned | KvError::KeyNotFound => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KvError::KeyTooLarge { size: 20, max: 10 };
        assert_eq!(err.to_string(), "key too large: 20 bytes (max: 10)");

        let err = KvError::KeyspaceNotFound("DATA_t".into());
        assert_eq!(err.to_string(), "keyspace not found: DATA_t");
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            KvError::ValueTooLarge { size: 2, max: 1 }.code(),
            ErrorCode::ValueTooLarge
        );
        assert_eq!(KvError::CursorNotPositioned.code(), ErrorCode::Internal);
    }
}
