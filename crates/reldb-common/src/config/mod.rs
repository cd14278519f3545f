//! Configuration for reldb.

mod database;

pub use database::{ConfigError, DatabaseConfig, QueryConfig, StorageConfig};
