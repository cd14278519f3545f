//! reldb Performance Benchmarks
//!
//! This crate contains benchmarks for the reldb components:
//! - Keyspace puts, lookups and cursor walks
//! - Row and key encoding
//! - Predicate evaluation
//! - Multi-table joins and referential-integrity deletes
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p reldb-bench
//! ```

pub mod utils;
