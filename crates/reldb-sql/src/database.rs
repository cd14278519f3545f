//! Database handle and DML orchestration.
//!
//! A [`Database`] is the explicit context every statement runs against. It
//! owns the storage environment, the catalog and the configuration; there
//! is no global state.

use std::collections::HashSet;
use std::sync::Arc;

use reldb_common::config::DatabaseConfig;
use reldb_kv::Environment;
use tracing::{debug, info, trace};

use crate::error::{SqlError, SqlResult};
use crate::predicate::{ColumnRef, Condition, Predicate};
use crate::resolver::{ColumnResolver, TableRef};
use crate::result::{DeleteSummary, ResultSet};
use crate::row::Row;
use crate::storage::codec::{encode_key, encode_row, sequence_key};
use crate::storage::{
    Catalog, ColumnEntry, CreateTable, IntegrityManager, JoinIterator, TableDescription,
    TableScan, TableSchema,
};
use crate::types::Value;

/// Output columns of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`: every column of every table, in FROM order.
    All,
    /// The listed columns, in order.
    Columns(Vec<ColumnRef>),
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    /// FROM list.
    pub from: Vec<TableRef>,
    /// Output columns.
    pub projection: Projection,
    /// WHERE clause.
    pub filter: Option<Condition>,
}

impl Select {
    /// `SELECT * FROM <from>`
    pub fn all(from: Vec<TableRef>) -> Self {
        Self {
            from,
            projection: Projection::All,
            filter: None,
        }
    }

    /// Sets the output columns.
    pub fn columns(mut self, columns: Vec<ColumnRef>) -> Self {
        self.projection = Projection::Columns(columns);
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }
}

/// A database instance.
///
/// # Example
///
/// ```rust
/// use reldb_sql::{Database, Select, TableRef};
/// use reldb_sql::storage::CreateTable;
/// use reldb_sql::types::{DataType, Value};
///
/// let db = Database::in_memory().unwrap();
/// db.create_table(
///     CreateTable::new("t")
///         .column("id", DataType::Int, true)
///         .column("name", DataType::Char(5), false)
///         .primary_key(["id"]),
/// )
/// .unwrap();
/// db.insert("t", None, vec![Value::Int(1), Value::char("hello world")]).unwrap();
///
/// let result = db.select(&Select::all(vec![TableRef::new("t")])).unwrap();
/// assert_eq!(result.rows[0].values()[1], Value::char("hello"));
/// ```
#[derive(Debug)]
pub struct Database {
    /// Storage environment.
    env: Arc<Environment>,
    /// Schema catalog.
    catalog: Catalog,
    /// Configuration.
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database over a fresh in-memory environment.
    pub fn open(config: DatabaseConfig) -> SqlResult<Self> {
        config.validate()?;
        let env = Arc::new(Environment::with_config(config.storage.clone()));
        Self::with_environment(env, config)
    }

    /// Opens a database with the default configuration.
    pub fn in_memory() -> SqlResult<Self> {
        Self::open(DatabaseConfig::default())
    }

    /// Opens a database over an existing environment.
    pub fn with_environment(env: Arc<Environment>, config: DatabaseConfig) -> SqlResult<Self> {
        config.validate()?;
        let catalog = Catalog::open(Arc::clone(&env))?;
        info!(
            keyspaces = env.keyspace_names().len(),
            max_join_tables = config.query.max_join_tables,
            "database opened"
        );
        Ok(Self {
            env,
            catalog,
            config,
        })
    }

    /// Returns the storage environment.
    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    // =========================================================================
    // DDL
    // =========================================================================

    /// Creates a table.
    pub fn create_table(&self, def: CreateTable) -> SqlResult<()> {
        self.catalog.create_table(def)
    }

    /// Drops a table.
    pub fn drop_table(&self, name: &str) -> SqlResult<()> {
        self.catalog.drop_table(name)
    }

    /// Describes a table.
    pub fn describe(&self, name: &str) -> SqlResult<TableDescription> {
        self.catalog.describe(name)
    }

    /// Lists all tables.
    pub fn list_tables(&self) -> SqlResult<Vec<String>> {
        self.catalog.list_tables()
    }

    // =========================================================================
    // INSERT
    // =========================================================================

    /// Inserts one row.
    ///
    /// With `columns` the values are matched to the named columns and every
    /// other column is NULL; without, values are matched to all columns in
    /// declaration order. Every check runs before the row is written.
    pub fn insert(
        &self,
        table: &str,
        columns: Option<&[String]>,
        values: Vec<Value>,
    ) -> SqlResult<()> {
        let schema = self.catalog.schema(table)?;
        let targets = target_columns(&schema, columns)?;

        if values.len() != targets.len() {
            return Err(SqlError::ColumnCountMismatch {
                expected: targets.len(),
                actual: values.len(),
            });
        }

        let mut row = Row::nulls(schema.width());
        for (column, value) in targets.iter().zip(values) {
            if !value.conforms_to(&column.data_type) {
                return Err(SqlError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.data_type.to_string(),
                    actual: value.type_name().to_string(),
                });
            }
            let value = match column.data_type.char_length() {
                Some(len) => value.truncate_to(len),
                None => value,
            };
            row.set(column.index, value);
        }

        for column in &schema.columns {
            if !column.nullable && row.get(column.index).map_or(true, Value::is_null) {
                return Err(SqlError::NotNullViolation(column.name.clone()));
            }
        }

        let data = self.catalog.data(table)?;
        let primary_key = if schema.table.has_primary_key() {
            let key = encode_key(&key_tuple(&row, &schema.primary_key_indices()?)?);
            if data.contains_key(&key) {
                return Err(SqlError::DuplicatePrimaryKeyValue(table.to_string()));
            }
            Some(key)
        } else {
            None
        };

        self.check_references(&schema, &row)?;

        let key = match primary_key {
            Some(key) => key,
            None => sequence_key(data.next_sequence()),
        };
        if !data.put_if_absent(key, encode_row(&row)?)? {
            return Err(SqlError::DuplicatePrimaryKeyValue(table.to_string()));
        }

        debug!(table = %table, "row inserted");
        trace!(table = %table, row = %row, "inserted values");
        Ok(())
    }

    /// Verifies that every fully non-null foreign key finds its referenced row.
    fn check_references(&self, schema: &TableSchema, row: &Row) -> SqlResult<()> {
        for fk in &schema.foreign_keys {
            let target = self.catalog.table(&fk.referenced_table).map_err(|_| {
                SqlError::internal(format!(
                    "'{}' references missing table '{}'",
                    schema.name(),
                    fk.referenced_table
                ))
            })?;

            // Referencing values in the referenced table's primary key order
            let mut tuple = Vec::with_capacity(target.primary_key.len());
            for pk_column in &target.primary_key {
                let position = fk
                    .referenced
                    .iter()
                    .position(|c| c == pk_column)
                    .ok_or_else(|| {
                        SqlError::internal(format!(
                            "foreign key of '{}' does not cover '{}'",
                            schema.name(),
                            pk_column
                        ))
                    })?;
                let index = schema.column_indices(&fk.referencing[position..=position])?[0];
                tuple.push(key_tuple(row, &[index])?.remove(0));
            }

            if tuple.iter().any(Value::is_null) {
                continue;
            }
            let referenced = self.catalog.data(&target.name)?;
            if !referenced.contains_key(&encode_key(&tuple)) {
                return Err(SqlError::ReferentialIntegrity {
                    table: schema.name().to_string(),
                    referenced_table: target.name.clone(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// Runs a SELECT: joins the FROM tables, keeps rows whose filter is
    /// `True`, and projects them.
    pub fn select(&self, query: &Select) -> SqlResult<ResultSet> {
        self.check_join_width(query.from.len())?;
        let resolver = ColumnResolver::new(&self.catalog, &query.from)?;
        let predicate = query
            .filter
            .as_ref()
            .map(|c| Predicate::bind(c, &resolver))
            .transpose()?;

        let (columns, indices) = match &query.projection {
            Projection::All => (resolver.column_labels(), (0..resolver.width()).collect()),
            Projection::Columns(refs) => {
                let indices = refs
                    .iter()
                    .map(|c| resolver.resolve(c.table.as_deref(), &c.column))
                    .collect::<SqlResult<Vec<usize>>>()?;
                (refs.iter().map(ToString::to_string).collect(), indices)
            }
        };

        let mut rows = Vec::new();
        let mut scanned = 0u64;
        for row in JoinIterator::open(&self.catalog, &resolver.table_names())? {
            let row = row?;
            scanned += 1;
            let keep = match &predicate {
                Some(p) => p.matches(row.values())?,
                None => true,
            };
            if keep {
                trace!(row = %row, "row selected");
                rows.push(row.project(&indices));
            }
        }

        debug!(
            tables = ?resolver.table_names(),
            scanned,
            matched = rows.len(),
            "select finished"
        );
        Ok(ResultSet { columns, rows })
    }

    fn check_join_width(&self, count: usize) -> SqlResult<()> {
        let max = self.config.query.max_join_tables;
        if count > max {
            return Err(SqlError::TooManyTables { count, max });
        }
        Ok(())
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Deletes the rows of `table` that satisfy `filter` (all rows without
    /// one).
    ///
    /// A matching row still referenced through a non-nullable foreign key is
    /// kept and counted as retained. Every other matching row first has the
    /// foreign keys that reference it set to NULL, then is removed.
    pub fn delete(&self, table: &str, filter: Option<&Condition>) -> SqlResult<DeleteSummary> {
        if !self.catalog.table_exists(table) {
            return Err(SqlError::TableNotFound(table.to_string()));
        }
        let resolver = ColumnResolver::new(&self.catalog, &[TableRef::new(table)])?;
        let predicate = filter.map(|c| Predicate::bind(c, &resolver)).transpose()?;
        let integrity = IntegrityManager::new(&self.catalog, table)?;

        let mut summary = DeleteSummary::default();
        let mut scan = TableScan::open(&self.catalog, table)?;
        while scan.advance() {
            let row = scan.current()?.ok_or_else(|| {
                SqlError::internal(format!("scan of '{}' lost its position", table))
            })?;
            if let Some(p) = &predicate {
                if !p.matches(row.values())? {
                    continue;
                }
            }

            if integrity.check_deletable(&row)? {
                integrity.cascade_delete(&row)?;
                scan.remove_current()?;
                summary.deleted += 1;
                trace!(table = %table, row = %row, "row deleted");
            } else {
                summary.retained += 1;
            }
        }

        debug!(
            table = %table,
            deleted = summary.deleted,
            retained = summary.retained,
            "delete finished"
        );
        Ok(summary)
    }
}

/// Resolves the insert column list to catalog columns.
fn target_columns<'a>(
    schema: &'a TableSchema,
    columns: Option<&[String]>,
) -> SqlResult<Vec<&'a ColumnEntry>> {
    match columns {
        None => Ok(schema.columns.iter().collect()),
        Some(names) => {
            let mut seen = HashSet::with_capacity(names.len());
            names
                .iter()
                .map(|name| {
                    let column = schema
                        .column(name)
                        .ok_or_else(|| SqlError::UnknownColumn(name.clone()))?;
                    if !seen.insert(name.as_str()) {
                        return Err(SqlError::DuplicateColumn(name.clone()));
                    }
                    Ok(column)
                })
                .collect()
        }
    }
}

fn key_tuple(row: &Row, indices: &[usize]) -> SqlResult<Vec<Value>> {
    row.tuple(indices)
        .ok_or_else(|| SqlError::internal("key column outside the row"))
}
