//! Storage integration layer.
//!
//! This module maps the relational model onto the keyspace store. It
//! provides:
//!
//! - Schema catalog management and constraint validation
//! - Row, key and catalog entry encoding
//! - Single-table scans and multi-table joins over live cursors
//! - Referential integrity checks for row deletion
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Database (DML)                            │
//! │  (insert / select / delete orchestration)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Storage Integration                         │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐ │
//! │  │  Catalog  │  │   Codec   │  │ Join/Scan │  │ Integrity │ │
//! │  │ (schemas) │  │ (row<->kv)│  │ (cursors) │  │ (FK maps) │ │
//! │  └───────────┘  └───────────┘  └───────────┘  └───────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      reldb-kv                                │
//! │  (named ordered keyspaces with cursors)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
pub mod codec;
mod integrity;
mod join;
mod table;

pub use catalog::{
    column_keyspace, data_keyspace, foreign_key_keyspace, Catalog, ColumnDef, ColumnDescription,
    ColumnEntry, CreateTable, ForeignKeyDef, ForeignKeyEntry, KeyRole, TableDescription,
    TableEntry, TableSchema,
};
pub use integrity::{FkBinding, IntegrityManager};
pub use join::JoinIterator;
pub use table::{ScanPosition, TableScan};
