//! Error types for the relational layer.

use reldb_common::config::ConfigError;
use reldb_common::ErrorCode;
use reldb_kv::KvError;
use thiserror::Error;

/// Result type for relational operations.
pub type SqlResult<T> = Result<T, SqlError>;

/// Broad classification of a [`SqlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid CREATE TABLE definition.
    SchemaDefinition,
    /// A table that must exist does not (or none exist).
    Existence,
    /// Dropping a table other tables still depend on.
    Integrity,
    /// INSERT/DELETE statement failures.
    Dml,
    /// FROM-list and WHERE-clause failures.
    Predicate,
    /// Storage collaborator failure.
    Storage,
    /// Rejected configuration.
    Config,
    /// Broken invariant (missing catalog entry, undecodable bytes).
    Internal,
}

/// Errors raised by catalog, DML and query operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlError {
    // ===== Schema definition =====
    /// Table name already taken.
    #[error("Create table has failed: table '{0}' already exists")]
    TableExists(String),

    /// Same column name defined twice.
    #[error("Create table has failed: column '{0}' is defined more than once")]
    DuplicateColumn(String),

    /// CHAR column with length 0.
    #[error("Char length should be over 0 (column '{0}')")]
    InvalidCharLength(String),

    /// More than one PRIMARY KEY clause.
    #[error("Create table has failed: primary key definition is duplicated")]
    DuplicatePrimaryKey,

    /// A key clause or insert column list names an undefined column.
    #[error("'{0}' does not exist in column definition")]
    UnknownColumn(String),

    /// Two FOREIGN KEY clauses over the same column set.
    #[error("Create table has failed: foreign key definition is duplicated")]
    DuplicateForeignKey,

    /// FOREIGN KEY referencing the table being created.
    #[error("Create table has failed: foreign key references its own table")]
    SelfReference,

    /// Referenced table does not exist.
    #[error("Create table has failed: foreign key references non existing table '{0}'")]
    ReferencedTableNotFound(String),

    /// Referenced column does not exist in the referenced table.
    #[error("Create table has failed: foreign key references non existing column '{table}.{column}'")]
    ReferencedColumnNotFound {
        /// Referenced table.
        table: String,
        /// Missing column.
        column: String,
    },

    /// Referenced columns are not exactly the referenced table's primary key.
    #[error("Create table has failed: foreign key references non primary key column of '{0}'")]
    ReferenceNonPrimaryKey(String),

    /// Referencing and referenced column types differ.
    #[error("Create table has failed: foreign key column '{column}' references wrong type")]
    ReferenceTypeMismatch {
        /// Referencing column whose type differs.
        column: String,
    },

    // ===== Existence =====
    /// Table does not exist.
    #[error("No such table: '{0}'")]
    TableNotFound(String),

    /// SHOW TABLES on an empty catalog.
    #[error("There is no table")]
    NoTables,

    // ===== Integrity =====
    /// Table is still referenced by other tables' foreign keys.
    #[error("Drop table has failed: '{0}' is referenced by other table")]
    TableReferenced(String),

    // ===== DML =====
    /// Number of values differs from the number of target columns.
    #[error("Insertion has failed: expected {expected} values, got {actual}")]
    ColumnCountMismatch {
        /// Target column count.
        expected: usize,
        /// Supplied value count.
        actual: usize,
    },

    /// Value type differs from the column type.
    #[error("Insertion has failed: column '{column}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Target column.
        column: String,
        /// Declared column type.
        expected: String,
        /// Type of the supplied value.
        actual: String,
    },

    /// NULL into a non-nullable column.
    #[error("Insertion has failed: '{0}' is not nullable")]
    NotNullViolation(String),

    /// Primary key value already present.
    #[error("Insertion has failed: primary key duplication in '{0}'")]
    DuplicatePrimaryKeyValue(String),

    /// Foreign key value has no referenced row.
    #[error("Insertion has failed: referential integrity violation ('{table}' references '{referenced_table}')")]
    ReferentialIntegrity {
        /// Table being inserted into.
        table: String,
        /// Table the unmatched foreign key points to.
        referenced_table: String,
    },

    // ===== Predicate =====
    /// Comparison between values of different types.
    #[error("Where clause try to compare incomparable values ({left} and {right})")]
    Incomparable {
        /// Left operand type.
        left: String,
        /// Right operand type.
        right: String,
    },

    /// FROM-list names a table that does not exist.
    #[error("Selection has failed: '{0}' does not exist")]
    UnknownTable(String),

    /// Qualifier names a table absent from the FROM list.
    #[error("Where clause try to reference tables which are not specified ('{0}')")]
    TableNotSpecified(String),

    /// Column does not exist in any candidate table.
    #[error("Where clause try to reference non existing column '{0}'")]
    ColumnNotFound(String),

    /// Unqualified column matches more than one table.
    #[error("Where clause contains ambiguous reference '{0}'")]
    AmbiguousColumn(String),

    /// Same table name or alias twice in the FROM list.
    #[error("Not unique table/alias: '{0}'")]
    DuplicateTableReference(String),

    /// FROM list longer than the configured limit.
    #[error("Too many tables in FROM list: {count} (max: {max})")]
    TooManyTables {
        /// Tables in the FROM list.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    // ===== Storage, configuration and internal =====
    /// Storage collaborator error.
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Bytes could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Broken invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SqlError {
    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        use SqlError::*;
        match self {
            TableExists(_)
            | DuplicateColumn(_)
            | InvalidCharLength(_)
            | DuplicatePrimaryKey
            | DuplicateForeignKey
            | SelfReference
            | ReferencedTableNotFound(_)
            | ReferencedColumnNotFound { .. }
            | ReferenceNonPrimaryKey(_)
            | ReferenceTypeMismatch { .. } => ErrorKind::SchemaDefinition,
            // Shared between CREATE TABLE and INSERT column lists
            UnknownColumn(_) => ErrorKind::SchemaDefinition,
            TableNotFound(_) | NoTables => ErrorKind::Existence,
            TableReferenced(_) => ErrorKind::Integrity,
            ColumnCountMismatch { .. }
            | TypeMismatch { .. }
            | NotNullViolation(_)
            | DuplicatePrimaryKeyValue(_)
            | ReferentialIntegrity { .. } => ErrorKind::Dml,
            Incomparable { .. }
            | UnknownTable(_)
            | TableNotSpecified(_)
            | ColumnNotFound(_)
            | AmbiguousColumn(_)
            | DuplicateTableReference(_)
            | TooManyTables { .. } => ErrorKind::Predicate,
            Storage(_) | Codec(_) => ErrorKind::Storage,
            Config(_) => ErrorKind::Config,
            Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        use SqlError::*;
        match self {
            TableExists(_) => ErrorCode::TableExists,
            DuplicateColumn(_) => ErrorCode::DuplicateColumn,
            InvalidCharLength(_) => ErrorCode::InvalidCharLength,
            DuplicatePrimaryKey => ErrorCode::DuplicatePrimaryKey,
            UnknownColumn(_) => ErrorCode::UnknownColumn,
            DuplicateForeignKey => ErrorCode::DuplicateForeignKey,
            SelfReference => ErrorCode::SelfReference,
            ReferencedTableNotFound(_) => ErrorCode::ReferencedTableNotFound,
            ReferencedColumnNotFound { .. } => ErrorCode::ReferencedColumnNotFound,
            ReferenceNonPrimaryKey(_) => ErrorCode::ReferenceNonPrimaryKey,
            ReferenceTypeMismatch { .. } => ErrorCode::ReferenceTypeMismatch,
            TableNotFound(_) => ErrorCode::TableNotFound,
            NoTables => ErrorCode::NoTables,
            TableReferenced(_) => ErrorCode::TableReferenced,
            ColumnCountMismatch { .. } => ErrorCode::ColumnCountMismatch,
            TypeMismatch { .. } => ErrorCode::TypeMismatch,
            NotNullViolation(_) => ErrorCode::NotNullViolation,
            DuplicatePrimaryKeyValue(_) => ErrorCode::DuplicatePrimaryKeyValue,
            ReferentialIntegrity { .. } => ErrorCode::ReferentialIntegrity,
            Incomparable { .. } => ErrorCode::Incomparable,
            UnknownTable(_) => ErrorCode::UnknownTable,
            TableNotSpecified(_) => ErrorCode::TableNotSpecified,
            ColumnNotFound(_) => ErrorCode::ColumnNotFound,
            AmbiguousColumn(_) => ErrorCode::AmbiguousColumn,
            DuplicateTableReference(_) => ErrorCode::DuplicateTableReference,
            TooManyTables { .. } => ErrorCode::TooManyTables,
            Storage(e) => e.code(),
            Codec(_) => ErrorCode::Codec,
            Config(_) => ErrorCode::InvalidConfig,
            Internal(_) => ErrorCode::Internal,
        }
    }

    /// Builds an internal error and logs it.
    ///
    /// Use for states that valid catalog and data cannot produce.
    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(error = %msg, "invariant violation");
        SqlError::Internal(msg)
    }
}

impl From<ConfigError> for SqlError {
    fn from(e: ConfigError) -> Self {
        SqlError::Config(e.to_string())
    }
}

impl From<bincode::Error> for SqlError {
    fn from(e: bincode::Error) -> Self {
        SqlError::Codec(e.to_string())
    }
}
