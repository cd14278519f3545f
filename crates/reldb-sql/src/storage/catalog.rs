//! Table catalog for metadata management.
//!
//! The catalog stores table, column and foreign key entries in dedicated
//! keyspaces of the storage environment:
//!
//! | keyspace                    | key                      | entry             |
//! |-----------------------------|--------------------------|-------------------|
//! | `SCHEMA_TableList`          | table name               | [`TableEntry`]      |
//! | `SCHEMA_COLUMN_<table>`     | column name              | [`ColumnEntry`]     |
//! | `SCHEMA_FOREIGNKEY_<table>` | referencing column list  | [`ForeignKeyEntry`] |
//! | `DATA_<table>`              | primary key or sequence  | encoded row       |
//!
//! The store has no multi-key transactions, so every mutating operation runs
//! in two phases: a validation pass that reads everything it needs and builds
//! a plan, then an apply pass that only writes.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use reldb_common::types::{Key, Value as StorageValue};
use reldb_common::{
    COLUMN_KEYSPACE_PREFIX, DATA_KEYSPACE_PREFIX, FOREIGN_KEY_KEYSPACE_PREFIX,
    TABLE_LIST_KEYSPACE,
};
use reldb_kv::{Environment, KvError, Keyspace, OpenMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::codec::{decode_entry, encode_entry, encode_name_list};
use crate::error::{SqlError, SqlResult};
use crate::types::DataType;

/// Name of the keyspace holding a table's column entries.
pub fn column_keyspace(table: &str) -> String {
    format!("{}{}", COLUMN_KEYSPACE_PREFIX, table)
}

/// Name of the keyspace holding a table's foreign key entries.
pub fn foreign_key_keyspace(table: &str) -> String {
    format!("{}{}", FOREIGN_KEY_KEYSPACE_PREFIX, table)
}

/// Name of the keyspace holding a table's rows.
pub fn data_keyspace(table: &str) -> String {
    format!("{}{}", DATA_KEYSPACE_PREFIX, table)
}

// =========================================================================
// Catalog Entries
// =========================================================================

/// A row of `SCHEMA_TableList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Table name.
    pub name: String,
    /// Primary key column names in declared order (empty if none).
    pub primary_key: Vec<String>,
    /// Number of foreign key clauses in other tables that reference this one.
    pub ref_count: u32,
}

impl TableEntry {
    /// Returns true if the table has a primary key.
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEntry {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Position in the stored row; fixed at creation.
    pub index: usize,
    /// Whether NULL is allowed. Always false for primary key columns.
    pub nullable: bool,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Part of at least one foreign key.
    pub foreign_key: bool,
}

/// A foreign key clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEntry {
    /// Referencing columns of the owning table.
    pub referencing: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns, positionally matched to `referencing`.
    pub referenced: Vec<String>,
}

/// Everything the catalog knows about one table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// The table entry.
    pub table: TableEntry,
    /// Columns in index order.
    pub columns: Vec<ColumnEntry>,
    /// Foreign key clauses of this table.
    pub foreign_keys: Vec<ForeignKeyEntry>,
}

impl TableSchema {
    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnEntry> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the row indices of the named columns, in the given order.
    pub fn column_indices(&self, names: &[String]) -> SqlResult<Vec<usize>> {
        names
            .iter()
            .map(|n| {
                self.column(n).map(|c| c.index).ok_or_else(|| {
                    SqlError::internal(format!("column '{}' missing from '{}'", n, self.name()))
                })
            })
            .collect()
    }

    /// Returns the row indices of the primary key columns in declared order.
    pub fn primary_key_indices(&self) -> SqlResult<Vec<usize>> {
        self.column_indices(&self.table.primary_key)
    }
}

// =========================================================================
// Table Definition Intake
// =========================================================================

/// A column definition inside [`CreateTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Declared NOT NULL.
    pub not_null: bool,
}

/// A FOREIGN KEY clause inside [`CreateTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
}

/// A pending CREATE TABLE statement.
///
/// Definitions are queued in statement order and validated together by
/// [`Catalog::create_table`].
///
/// # Example
///
/// ```rust
/// use reldb_sql::storage::CreateTable;
/// use reldb_sql::types::DataType;
///
/// let def = CreateTable::new("account")
///     .column("id", DataType::Int, true)
///     .column("owner", DataType::Char(20), false)
///     .primary_key(["id"]);
/// assert_eq!(def.name(), "account");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    name: String,
    columns: Vec<ColumnDef>,
    primary_keys: Vec<Vec<String>>,
    foreign_keys: Vec<ForeignKeyDef>,
}

impl CreateTable {
    /// Starts a definition for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Queues a column.
    pub fn column(mut self, name: impl Into<String>, data_type: DataType, not_null: bool) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type,
            not_null,
        });
        self
    }

    /// Queues a PRIMARY KEY clause.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Queues a FOREIGN KEY clause.
    pub fn foreign_key<I, S, J, T>(
        mut self,
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.foreign_keys.push(ForeignKeyDef {
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the queued columns.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }
}

// =========================================================================
// Describe
// =========================================================================

/// The key role of a column in DESC output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Not part of any key.
    None,
    /// Primary key column.
    Primary,
    /// Foreign key column.
    Foreign,
    /// Both.
    PrimaryForeign,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyRole::None => "",
            KeyRole::Primary => "PRI",
            KeyRole::Foreign => "FOR",
            KeyRole::PrimaryForeign => "PRI/FOR",
        };
        f.write_str(s)
    }
}

/// One line of DESC output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Nullability.
    pub nullable: bool,
    /// Key role.
    pub key: KeyRole,
}

/// The result of `DESC <table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    /// Table name.
    pub table: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescription>,
}

const RULE: &str = "-------------------------------------------------";

impl fmt::Display for TableDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "table_name [{}]", self.table)?;
        let header = format!("{:<25}{:<15}{:<15}{:<15}", "column_name", "type", "null", "key");
        writeln!(f, "{}", header.trim_end())?;
        for col in &self.columns {
            let line = format!(
                "{:<25}{:<15}{:<15}{:<15}",
                col.name,
                col.data_type.to_string(),
                if col.nullable { "Y" } else { "N" },
                col.key.to_string()
            );
            writeln!(f, "{}", line.trim_end())?;
        }
        write!(f, "{}", RULE)
    }
}

// =========================================================================
// Catalog
// =========================================================================

/// The schema catalog.
///
/// Source of truth for table, column and foreign key metadata. Holds the
/// storage environment the catalog and data keyspaces live in.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Storage environment.
    env: Arc<Environment>,
    /// `SCHEMA_TableList`.
    tables: Arc<Keyspace>,
}

/// A catalog record encoded and checked against the storage limits.
struct EncodedEntry {
    key: Key,
    value: StorageValue,
}

/// Writes a validated CREATE TABLE performs, already encoded.
struct CreatePlan {
    name: String,
    table: EncodedEntry,
    columns: Vec<EncodedEntry>,
    foreign_keys: Vec<EncodedEntry>,
    referenced: Vec<(TableEntry, EncodedEntry)>,
}

/// Writes a validated DROP TABLE performs.
struct DropPlan {
    name: String,
    referenced: Vec<TableEntry>,
}

impl Catalog {
    /// Opens the catalog in `env`, creating the table list if needed.
    pub fn open(env: Arc<Environment>) -> SqlResult<Self> {
        let tables = env.open_keyspace(TABLE_LIST_KEYSPACE, OpenMode::OpenOrCreate)?;
        Ok(Self { env, tables })
    }

    /// Returns the storage environment.
    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    // ===== Lookups =====

    /// Returns true if the table exists.
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(&Key::from(name))
    }

    /// Returns the table entry.
    pub fn table(&self, name: &str) -> SqlResult<TableEntry> {
        match self.tables.get(&Key::from(name)) {
            Some(bytes) => decode_catalog(bytes.as_bytes()),
            None => Err(SqlError::TableNotFound(name.to_string())),
        }
    }

    /// Returns the table's columns in index order.
    pub fn columns(&self, name: &str) -> SqlResult<Vec<ColumnEntry>> {
        self.table(name)?;
        let mut columns: Vec<ColumnEntry> =
            read_all(&self.schema_keyspace(&column_keyspace(name))?)?;
        columns.sort_by_key(|c| c.index);
        Ok(columns)
    }

    /// Returns the table's foreign key clauses.
    pub fn foreign_keys(&self, name: &str) -> SqlResult<Vec<ForeignKeyEntry>> {
        self.table(name)?;
        read_all(&self.schema_keyspace(&foreign_key_keyspace(name))?)
    }

    /// Returns the full schema of a table.
    pub fn schema(&self, name: &str) -> SqlResult<TableSchema> {
        Ok(TableSchema {
            table: self.table(name)?,
            columns: self.columns(name)?,
            foreign_keys: self.foreign_keys(name)?,
        })
    }

    /// Returns all table names in key order.
    pub fn table_names(&self) -> SqlResult<Vec<String>> {
        let mut names = Vec::with_capacity(self.tables.count());
        let mut cursor = self.tables.cursor();
        let mut entry = cursor.first();
        while let Some(e) = entry {
            let name = String::from_utf8(e.key.as_bytes().to_vec())
                .map_err(|_| SqlError::internal("table name is not valid UTF-8"))?;
            names.push(name);
            entry = cursor.next();
        }
        Ok(names)
    }

    /// Opens a table's data keyspace.
    pub fn data(&self, name: &str) -> SqlResult<Arc<Keyspace>> {
        self.table(name)?;
        self.schema_keyspace(&data_keyspace(name))
    }

    // ===== DDL =====

    /// Validates and commits a CREATE TABLE.
    ///
    /// Nothing is written unless every check passes.
    pub fn create_table(&self, def: CreateTable) -> SqlResult<()> {
        let plan = self.plan_create(&def)?;
        self.apply_create(plan)
    }

    fn plan_create(&self, def: &CreateTable) -> SqlResult<CreatePlan> {
        let name = def.name.as_str();

        // 1. Table name
        if self.table_exists(name) {
            return Err(SqlError::TableExists(name.to_string()));
        }

        // 2. Columns
        let mut defined: HashMap<&str, &ColumnDef> = HashMap::new();
        for col in &def.columns {
            if defined.insert(col.name.as_str(), col).is_some() {
                return Err(SqlError::DuplicateColumn(col.name.clone()));
            }
            if col.data_type == DataType::Char(0) {
                return Err(SqlError::InvalidCharLength(col.name.clone()));
            }
        }

        // 3. Single primary key clause
        if def.primary_keys.len() > 1 {
            return Err(SqlError::DuplicatePrimaryKey);
        }
        let primary_key = def.primary_keys.first().cloned().unwrap_or_default();

        // 4. Primary key columns exist
        let mut pk_set = HashSet::new();
        for col in &primary_key {
            if !defined.contains_key(col.as_str()) {
                return Err(SqlError::UnknownColumn(col.clone()));
            }
            if !pk_set.insert(col.as_str()) {
                return Err(SqlError::DuplicateColumn(col.clone()));
            }
        }

        // 5. Foreign keys
        let mut fk_sets: Vec<HashSet<&str>> = Vec::new();
        let mut fk_columns: HashSet<&str> = HashSet::new();
        let mut referenced: BTreeMap<String, TableEntry> = BTreeMap::new();
        for fk in &def.foreign_keys {
            for col in &fk.columns {
                if !defined.contains_key(col.as_str()) {
                    return Err(SqlError::UnknownColumn(col.clone()));
                }
            }

            let set: HashSet<&str> = fk.columns.iter().map(String::as_str).collect();
            let duplicate = fk_sets
                .iter()
                .any(|earlier| earlier.len() == set.len() && *earlier == set);
            if duplicate {
                return Err(SqlError::DuplicateForeignKey);
            }

            if fk.referenced_table == name {
                return Err(SqlError::SelfReference);
            }

            let target = match referenced.get(&fk.referenced_table) {
                Some(entry) => entry.clone(),
                None if self.table_exists(&fk.referenced_table) => {
                    self.table(&fk.referenced_table)?
                }
                None => {
                    return Err(SqlError::ReferencedTableNotFound(
                        fk.referenced_table.clone(),
                    ))
                }
            };
            let target_columns = self.columns(&target.name)?;

            let mut target_types = Vec::with_capacity(fk.referenced_columns.len());
            for col in &fk.referenced_columns {
                match target_columns.iter().find(|c| &c.name == col) {
                    Some(c) => target_types.push(c.data_type),
                    None => {
                        return Err(SqlError::ReferencedColumnNotFound {
                            table: target.name.clone(),
                            column: col.clone(),
                        })
                    }
                }
            }

            let referenced_set: HashSet<&str> =
                fk.referenced_columns.iter().map(String::as_str).collect();
            let target_pk: HashSet<&str> = target.primary_key.iter().map(String::as_str).collect();
            if target_pk.is_empty()
                || fk.referenced_columns.len() != target.primary_key.len()
                || referenced_set != target_pk
            {
                return Err(SqlError::ReferenceNonPrimaryKey(target.name.clone()));
            }

            if fk.columns.len() != fk.referenced_columns.len() {
                return Err(SqlError::ReferenceTypeMismatch {
                    column: fk.columns.join(", "),
                });
            }
            for (col, target_type) in fk.columns.iter().zip(&target_types) {
                let own = defined
                    .get(col.as_str())
                    .map(|c| c.data_type)
                    .ok_or_else(|| SqlError::UnknownColumn(col.clone()))?;
                if own != *target_type {
                    return Err(SqlError::ReferenceTypeMismatch {
                        column: col.clone(),
                    });
                }
            }

            fk_columns.extend(set.iter().copied());
            fk_sets.push(set);
            let mut updated = target;
            updated.ref_count = updated.ref_count.checked_add(1).ok_or_else(|| {
                SqlError::internal(format!("reference count overflow on '{}'", updated.name))
            })?;
            referenced.insert(updated.name.clone(), updated);
        }

        for keyspace in [
            column_keyspace(name),
            foreign_key_keyspace(name),
            data_keyspace(name),
        ] {
            if self.env.keyspace_exists(&keyspace) {
                return Err(SqlError::internal(format!(
                    "keyspace '{}' exists without a table entry",
                    keyspace
                )));
            }
        }

        let columns: Vec<ColumnEntry> = def
            .columns
            .iter()
            .enumerate()
            .map(|(index, col)| {
                let is_pk = pk_set.contains(col.name.as_str());
                ColumnEntry {
                    name: col.name.clone(),
                    data_type: col.data_type,
                    index,
                    nullable: !col.not_null && !is_pk,
                    primary_key: is_pk,
                    foreign_key: fk_columns.contains(col.name.as_str()),
                }
            })
            .collect();

        let foreign_keys: Vec<ForeignKeyEntry> = def
            .foreign_keys
            .iter()
            .map(|fk| ForeignKeyEntry {
                referencing: fk.columns.clone(),
                referenced_table: fk.referenced_table.clone(),
                referenced: fk.referenced_columns.clone(),
            })
            .collect();

        // 6. Every record must fit the storage limits before anything is written
        let table = TableEntry {
            name: name.to_string(),
            primary_key,
            ref_count: 0,
        };
        Ok(CreatePlan {
            name: name.to_string(),
            table: self.encode_table(&table)?,
            columns: columns
                .iter()
                .map(|col| self.encode_checked(Key::from(col.name.as_str()), col))
                .collect::<SqlResult<_>>()?,
            foreign_keys: foreign_keys
                .iter()
                .map(|fk| self.encode_checked(encode_name_list(&fk.referencing)?, fk))
                .collect::<SqlResult<_>>()?,
            referenced: referenced
                .into_values()
                .map(|target| {
                    let encoded = self.encode_table(&target)?;
                    Ok((target, encoded))
                })
                .collect::<SqlResult<_>>()?,
        })
    }

    fn apply_create(&self, plan: CreatePlan) -> SqlResult<()> {
        let name = plan.name.as_str();

        let columns = self
            .env
            .open_keyspace(&column_keyspace(name), OpenMode::CreateExclusive)?;
        for entry in &plan.columns {
            columns.put(entry.key.clone(), entry.value.clone())?;
        }

        let foreign_keys = self
            .env
            .open_keyspace(&foreign_key_keyspace(name), OpenMode::CreateExclusive)?;
        for entry in &plan.foreign_keys {
            foreign_keys.put(entry.key.clone(), entry.value.clone())?;
        }

        self.env
            .open_keyspace(&data_keyspace(name), OpenMode::CreateExclusive)?;

        for (target, entry) in &plan.referenced {
            self.tables.put(entry.key.clone(), entry.value.clone())?;
            debug!(table = %target.name, ref_count = target.ref_count, "reference count updated");
        }
        self.tables
            .put(plan.table.key.clone(), plan.table.value.clone())?;

        info!(
            table = %name,
            columns = plan.columns.len(),
            foreign_keys = plan.foreign_keys.len(),
            "table created"
        );
        Ok(())
    }

    /// Drops a table that no other table references.
    pub fn drop_table(&self, name: &str) -> SqlResult<()> {
        let plan = self.plan_drop(name)?;
        self.apply_drop(plan)
    }

    fn plan_drop(&self, name: &str) -> SqlResult<DropPlan> {
        let table = self.table(name)?;
        if table.ref_count > 0 {
            return Err(SqlError::TableReferenced(name.to_string()));
        }

        let mut referenced: BTreeMap<String, TableEntry> = BTreeMap::new();
        for fk in self.foreign_keys(name)? {
            let mut target = match referenced.remove(&fk.referenced_table) {
                Some(entry) => entry,
                None => self.table(&fk.referenced_table).map_err(|_| {
                    SqlError::internal(format!(
                        "'{}' references missing table '{}'",
                        name, fk.referenced_table
                    ))
                })?,
            };
            target.ref_count = target.ref_count.checked_sub(1).ok_or_else(|| {
                SqlError::internal(format!("reference count underflow on '{}'", target.name))
            })?;
            referenced.insert(target.name.clone(), target);
        }

        Ok(DropPlan {
            name: name.to_string(),
            referenced: referenced.into_values().collect(),
        })
    }

    fn apply_drop(&self, plan: DropPlan) -> SqlResult<()> {
        let name = plan.name.as_str();
        for target in &plan.referenced {
            self.put_table(target)?;
            debug!(table = %target.name, ref_count = target.ref_count, "reference count updated");
        }

        for keyspace in [
            column_keyspace(name),
            foreign_key_keyspace(name),
            data_keyspace(name),
        ] {
            match self.env.remove_keyspace(&keyspace) {
                Ok(()) | Err(KvError::KeyspaceNotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.tables.delete(&Key::from(name));

        info!(table = %name, "table dropped");
        Ok(())
    }

    // ===== Read-only statements =====

    /// Describes a table.
    pub fn describe(&self, name: &str) -> SqlResult<TableDescription> {
        let columns = self
            .columns(name)?
            .into_iter()
            .map(|c| ColumnDescription {
                key: match (c.primary_key, c.foreign_key) {
                    (true, true) => KeyRole::PrimaryForeign,
                    (true, false) => KeyRole::Primary,
                    (false, true) => KeyRole::Foreign,
                    (false, false) => KeyRole::None,
                },
                name: c.name,
                data_type: c.data_type,
                nullable: c.nullable,
            })
            .collect();
        Ok(TableDescription {
            table: name.to_string(),
            columns,
        })
    }

    /// Lists all tables.
    pub fn list_tables(&self) -> SqlResult<Vec<String>> {
        if self.tables.is_empty() {
            return Err(SqlError::NoTables);
        }
        self.table_names()
    }

    // ===== Helpers =====

    fn encode_table(&self, entry: &TableEntry) -> SqlResult<EncodedEntry> {
        self.encode_checked(Key::from(entry.name.as_str()), entry)
    }

    fn encode_checked<T: Serialize>(&self, key: Key, entry: &T) -> SqlResult<EncodedEntry> {
        let value = encode_entry(entry)?;
        self.env.check_entry(&key, &value)?;
        Ok(EncodedEntry { key, value })
    }

    fn put_table(&self, entry: &TableEntry) -> SqlResult<()> {
        self.tables
            .put(Key::from(entry.name.as_str()), encode_entry(entry)?)?;
        Ok(())
    }

    /// Opens a keyspace that must exist because its table exists.
    fn schema_keyspace(&self, name: &str) -> SqlResult<Arc<Keyspace>> {
        self.env
            .open_keyspace(name, OpenMode::OpenExisting)
            .map_err(|e| match e {
                KvError::KeyspaceNotFound(ks) => {
                    SqlError::internal(format!("keyspace '{}' is missing", ks))
                }
                other => other.into(),
            })
    }
}

/// Decodes a catalog entry; undecodable bytes mean a corrupted catalog.
fn decode_catalog<T: DeserializeOwned>(bytes: &[u8]) -> SqlResult<T> {
    decode_entry(bytes).map_err(|e| SqlError::internal(format!("corrupted catalog entry: {}", e)))
}

fn read_all<T: DeserializeOwned>(keyspace: &Arc<Keyspace>) -> SqlResult<Vec<T>> {
    let mut out = Vec::with_capacity(keyspace.count());
    let mut cursor = keyspace.cursor();
    let mut entry = cursor.first();
    while let Some(e) = entry {
        out.push(decode_catalog(e.value.as_bytes())?);
        entry = cursor.next();
    }
    Ok(out)
}
