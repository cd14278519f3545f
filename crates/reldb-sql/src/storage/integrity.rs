//! Referential integrity for row deletion.
//!
//! An [`IntegrityManager`] is built for one target table. It finds every
//! foreign key in other tables that references the target and remaps each
//! one to the target's primary key order, so a referencing row's foreign key
//! tuple can be compared directly with a target row's primary key tuple.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::catalog::{Catalog, TableSchema};
use super::table::TableScan;
use crate::error::{SqlError, SqlResult};
use crate::row::Row;
use crate::types::Value;

/// One foreign key relationship, remapped to the target's primary key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkBinding {
    /// Referencing row indices, one per target primary key column.
    pub indices: Vec<usize>,
    /// True only if every referencing column is nullable.
    pub nullable: bool,
}

/// Decides whether rows of one table can be deleted and nulls out
/// references to deleted rows.
#[derive(Debug, Clone)]
pub struct IntegrityManager {
    /// Catalog the bindings were computed from.
    catalog: Catalog,
    /// Target table.
    table: String,
    /// Target primary key indices in declared order.
    primary_key: Vec<usize>,
    /// Bindings grouped by referencing table.
    bindings: BTreeMap<String, Vec<FkBinding>>,
}

impl IntegrityManager {
    /// Computes the bindings of every foreign key referencing `table`.
    pub fn new(catalog: &Catalog, table: &str) -> SqlResult<Self> {
        let target = catalog.schema(table)?;
        let primary_key = target.primary_key_indices()?;
        let mut bindings: BTreeMap<String, Vec<FkBinding>> = BTreeMap::new();

        if target.table.has_primary_key() {
            for other in catalog.table_names()? {
                if other == table {
                    continue;
                }
                let referencing = catalog.schema(&other)?;
                for fk in referencing
                    .foreign_keys
                    .iter()
                    .filter(|fk| fk.referenced_table == table)
                {
                    let binding = Self::bind(&target, &referencing, &fk.referencing, &fk.referenced)?;
                    bindings.entry(other.clone()).or_default().push(binding);
                }
            }
        }

        debug!(
            table = %table,
            referencing_tables = bindings.len(),
            "integrity bindings computed"
        );
        Ok(Self {
            catalog: catalog.clone(),
            table: table.to_string(),
            primary_key,
            bindings,
        })
    }

    fn bind(
        target: &TableSchema,
        referencing: &TableSchema,
        referencing_columns: &[String],
        referenced_columns: &[String],
    ) -> SqlResult<FkBinding> {
        let mut indices = Vec::with_capacity(target.table.primary_key.len());
        let mut nullable = true;
        for pk_column in &target.table.primary_key {
            let position = referenced_columns
                .iter()
                .position(|c| c == pk_column)
                .ok_or_else(|| {
                    SqlError::internal(format!(
                        "foreign key of '{}' does not cover '{}.{}'",
                        referencing.name(),
                        target.name(),
                        pk_column
                    ))
                })?;
            let column_name = &referencing_columns[position];
            let column = referencing.column(column_name).ok_or_else(|| {
                SqlError::internal(format!(
                    "column '{}' missing from '{}'",
                    column_name,
                    referencing.name()
                ))
            })?;
            indices.push(column.index);
            nullable &= column.nullable;
        }
        Ok(FkBinding { indices, nullable })
    }

    /// Returns the target table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the bindings grouped by referencing table.
    pub fn bindings(&self) -> &BTreeMap<String, Vec<FkBinding>> {
        &self.bindings
    }

    fn key_of(&self, row: &Row) -> SqlResult<Vec<Value>> {
        row.tuple(&self.primary_key).ok_or_else(|| {
            SqlError::internal(format!("row too short for primary key of '{}'", self.table))
        })
    }

    /// Returns false if some row still references `row` through a
    /// non-nullable foreign key.
    pub fn check_deletable(&self, row: &Row) -> SqlResult<bool> {
        if self.bindings.is_empty() {
            return Ok(true);
        }
        let key = self.key_of(row)?;

        for (other, bindings) in &self.bindings {
            let strict: Vec<&FkBinding> = bindings.iter().filter(|b| !b.nullable).collect();
            if strict.is_empty() {
                continue;
            }
            let mut scan = TableScan::open(&self.catalog, other)?;
            while scan.advance() {
                let referencing = current_row(&scan)?;
                for binding in &strict {
                    if referencing.tuple(&binding.indices).as_ref() == Some(&key) {
                        trace!(table = %self.table, referenced_by = %other, "row is not deletable");
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// Sets every foreign key that references `row` to NULL.
    ///
    /// The caller must have established [`check_deletable`](Self::check_deletable).
    /// Returns the number of referencing rows rewritten; referencing rows are
    /// never deleted.
    pub fn cascade_delete(&self, row: &Row) -> SqlResult<u64> {
        if self.bindings.is_empty() {
            return Ok(0);
        }
        let key = self.key_of(row)?;
        let mut rewritten = 0;

        for (other, bindings) in &self.bindings {
            let mut scan = TableScan::open(&self.catalog, other)?;
            while scan.advance() {
                let mut referencing = current_row(&scan)?;
                let mut changed = false;
                for binding in bindings {
                    if referencing.tuple(&binding.indices).as_ref() != Some(&key) {
                        continue;
                    }
                    if !binding.nullable {
                        return Err(SqlError::internal(format!(
                            "cascade on '{}' reached a non-nullable reference from '{}'",
                            self.table, other
                        )));
                    }
                    for &i in &binding.indices {
                        referencing.set(i, Value::Null);
                    }
                    changed = true;
                }
                if changed {
                    scan.replace_current(&referencing)?;
                    rewritten += 1;
                }
            }
        }

        if rewritten > 0 {
            debug!(table = %self.table, rewritten, "references set to null");
        }
        Ok(rewritten)
    }
}

fn current_row(scan: &TableScan) -> SqlResult<Row> {
    scan.current()?.ok_or_else(|| {
        SqlError::internal(format!("scan of '{}' lost its position", scan.table()))
    })
}
