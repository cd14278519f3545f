//! Stable error codes.
//!
//! Every user-facing failure of the relational layer maps to one of these
//! codes so that the command layer can render or match on it without
//! depending on concrete error types.

use std::fmt;

/// Broad error category, encoded in the high byte of an [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Internal invariant violations (bugs or corrupted state).
    General,
    /// Storage collaborator failures.
    Storage,
    /// Invalid table definitions.
    SchemaDefinition,
    /// Missing tables.
    Existence,
    /// Referential-integrity violations on DDL.
    Integrity,
    /// Insert/delete statement failures.
    Dml,
    /// WHERE-clause and FROM-list failures.
    Predicate,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::General => "General",
            ErrorCategory::Storage => "Storage",
            ErrorCategory::SchemaDefinition => "Schema",
            ErrorCategory::Existence => "Existence",
            ErrorCategory::Integrity => "Integrity",
            ErrorCategory::Dml => "DML",
            ErrorCategory::Predicate => "Predicate",
        };
        f.write_str(name)
    }
}

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Internal error (bug or corrupted catalog).
    Internal = 0x0001,
    /// Invalid configuration.
    InvalidConfig = 0x0002,

    // Storage errors (0x0100 - 0x01FF)
    /// Keyspace not found.
    KeyspaceNotFound = 0x0100,
    /// Keyspace already exists.
    KeyspaceExists = 0x0101,
    /// Key too large.
    KeyTooLarge = 0x0102,
    /// Value too large.
    ValueTooLarge = 0x0103,
    /// Encoding or decoding failed.
    Codec = 0x0104,

    // Schema definition errors (0x0200 - 0x02FF)
    /// Table already exists.
    TableExists = 0x0200,
    /// Column defined twice.
    DuplicateColumn = 0x0201,
    /// CHAR length below one.
    InvalidCharLength = 0x0202,
    /// More than one PRIMARY KEY clause.
    DuplicatePrimaryKey = 0x0203,
    /// Column referenced by a key clause is not defined.
    UnknownColumn = 0x0204,
    /// Two FOREIGN KEY clauses over the same column set.
    DuplicateForeignKey = 0x0205,
    /// FOREIGN KEY referencing its own table.
    SelfReference = 0x0206,
    /// Referenced table does not exist.
    ReferencedTableNotFound = 0x0207,
    /// Referenced column does not exist.
    ReferencedColumnNotFound = 0x0208,
    /// Referenced columns are not exactly the primary key.
    ReferenceNonPrimaryKey = 0x0209,
    /// Referencing and referenced column types differ.
    ReferenceTypeMismatch = 0x020A,

    // Existence errors (0x0300 - 0x03FF)
    /// Table not found.
    TableNotFound = 0x0300,
    /// No tables to list.
    NoTables = 0x0301,

    // Integrity errors (0x0400 - 0x04FF)
    /// Table is still referenced by foreign keys.
    TableReferenced = 0x0400,

    // DML errors (0x0500 - 0x05FF)
    /// Value count differs from column count.
    ColumnCountMismatch = 0x0500,
    /// Value type differs from column type.
    TypeMismatch = 0x0501,
    /// NULL into a non-nullable column.
    NotNullViolation = 0x0502,
    /// Primary key value already present.
    DuplicatePrimaryKeyValue = 0x0503,
    /// Foreign key value has no referenced row.
    ReferentialIntegrity = 0x0504,

    // Predicate errors (0x0600 - 0x06FF)
    /// Comparison between values of different types.
    Incomparable = 0x0600,
    /// FROM-list table does not exist.
    UnknownTable = 0x0601,
    /// Qualifier names a table absent from the FROM list.
    TableNotSpecified = 0x0602,
    /// Column not found.
    ColumnNotFound = 0x0603,
    /// Unqualified column matches several tables.
    AmbiguousColumn = 0x0604,
    /// Table name or alias appears twice in the FROM list.
    DuplicateTableReference = 0x0605,
    /// FROM list longer than the configured limit.
    TooManyTables = 0x0606,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match (*self as u16) >> 8 {
            0x01 => ErrorCategory::Storage,
            0x02 => ErrorCategory::SchemaDefinition,
            0x03 => ErrorCategory::Existence,
            0x04 => ErrorCategory::Integrity,
            0x05 => ErrorCategory::Dml,
            0x06 => ErrorCategory::Predicate,
            _ => ErrorCategory::General,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
