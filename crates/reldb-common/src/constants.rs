//! System-wide constants for reldb.
//!
//! Limits enforced by the storage collaborator and the reserved keyspace
//! names used by the catalog.

// =============================================================================
// Key and Value Limits
// =============================================================================

/// Maximum key size in bytes (16 KB).
///
/// Primary-key tuples are encoded into keys, so this also bounds the total
/// width of a primary key.
pub const MAX_KEY_SIZE: usize = 16 * 1024;

/// Maximum value size in bytes (1 MB).
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

// =============================================================================
// Query Limits
// =============================================================================

/// Default maximum number of tables in a single FROM list.
///
/// The join iterator enumerates the full Cartesian product, so the product
/// of table sizes grows quickly with this number.
pub const DEFAULT_MAX_JOIN_TABLES: usize = 16;

// =============================================================================
// Catalog Keyspace Names
// =============================================================================

/// Keyspace holding one entry per table, keyed by table name.
pub const TABLE_LIST_KEYSPACE: &str = "SCHEMA_TableList";

/// Prefix of the per-table column keyspace (`SCHEMA_COLUMN_<table>`).
pub const COLUMN_KEYSPACE_PREFIX: &str = "SCHEMA_COLUMN_";

/// Prefix of the per-table foreign-key keyspace (`SCHEMA_FOREIGNKEY_<table>`).
pub const FOREIGN_KEY_KEYSPACE_PREFIX: &str = "SCHEMA_FOREIGNKEY_";

/// Prefix of the per-table row keyspace (`DATA_<table>`).
pub const DATA_KEYSPACE_PREFIX: &str = "DATA_";
