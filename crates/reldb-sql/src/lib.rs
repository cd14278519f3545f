//! # reldb-sql
//!
//! Relational layer of reldb: a small SQL-style database over ordered
//! keyspaces.
//!
//! This crate implements:
//! - Schema catalog with primary and foreign key validation
//! - Typed rows and an order-preserving row/key codec
//! - INSERT with type, length, nullability and key checks
//! - SELECT over a lazy Cartesian product with a three-valued WHERE clause
//! - DELETE with referential integrity (non-nullable references block,
//!   nullable references are set to NULL)
//!
//! Statements arrive already parsed as Rust values; the crate has no SQL
//! text front end.
//!
//! # Example
//!
//! ```rust
//! use reldb_sql::predicate::{ColumnRef, Condition};
//! use reldb_sql::storage::CreateTable;
//! use reldb_sql::types::{CompareOp, DataType, Value};
//! use reldb_sql::{Database, Select, TableRef};
//!
//! let db = Database::in_memory().unwrap();
//! db.create_table(
//!     CreateTable::new("dept")
//!         .column("id", DataType::Int, true)
//!         .primary_key(["id"]),
//! )
//! .unwrap();
//! db.create_table(
//!     CreateTable::new("emp")
//!         .column("name", DataType::Char(10), true)
//!         .column("dept", DataType::Int, false)
//!         .foreign_key(["dept"], "dept", ["id"]),
//! )
//! .unwrap();
//!
//! db.insert("dept", None, vec![Value::Int(1)]).unwrap();
//! db.insert("emp", None, vec![Value::char("ann"), Value::Int(1)]).unwrap();
//!
//! let query = Select::all(vec![TableRef::new("emp"), TableRef::new("dept")]).filter(
//!     Condition::compare(
//!         ColumnRef::qualified("emp", "dept"),
//!         CompareOp::Eq,
//!         ColumnRef::qualified("dept", "id"),
//!     ),
//! );
//! assert_eq!(db.select(&query).unwrap().len(), 1);
//!
//! // The nullable reference is cleared instead of blocking the delete
//! let summary = db.delete("dept", None).unwrap();
//! assert_eq!(summary.deleted, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Database handle and statement execution
pub mod database;

/// Error types
pub mod error;

/// WHERE-clause trees and bound predicates
pub mod predicate;

/// FROM-list column resolution
pub mod resolver;

/// Statement results
pub mod result;

/// Row representation
pub mod row;

/// Catalog, codec and cursor-backed access paths
pub mod storage;

/// Column types and values
pub mod types;

pub use database::{Database, Projection, Select};
pub use error::{ErrorKind, SqlError, SqlResult};
pub use predicate::{ColumnRef, Condition};
pub use resolver::TableRef;
pub use result::{DeleteSummary, ResultSet};
pub use row::Row;
pub use types::{CompareOp, DataType, Value};
