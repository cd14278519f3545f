//! Column name resolution over a FROM list.
//!
//! Every table of the FROM list contributes its columns, in index order, to
//! one flat index space: the first table's columns come first, then the
//! second's, and so on. This is exactly the layout [`JoinIterator`] produces,
//! so a resolved index addresses the same value in every joined row.
//!
//! [`JoinIterator`]: crate::storage::JoinIterator

use std::collections::HashMap;

use crate::error::{SqlError, SqlResult};
use crate::storage::Catalog;

/// A FROM-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Table name.
    pub name: String,
    /// Optional alias; replaces the name as the qualifier when present.
    pub alias: Option<String>,
}

impl TableRef {
    /// References a table by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// References a table under an alias.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Returns the name columns of this table are qualified with.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
struct BoundTable {
    name: String,
    qualifier: String,
    columns: Vec<String>,
    by_name: HashMap<String, usize>,
}

/// Maps `(qualifier, column)` pairs to flat column indices.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    /// Bound tables in FROM order.
    tables: Vec<BoundTable>,
    /// Total number of columns.
    width: usize,
}

impl ColumnResolver {
    /// Binds every table of `from` in order.
    pub fn new(catalog: &Catalog, from: &[TableRef]) -> SqlResult<Self> {
        let mut tables: Vec<BoundTable> = Vec::with_capacity(from.len());
        let mut offset = 0;

        for table_ref in from {
            if !catalog.table_exists(&table_ref.name) {
                return Err(SqlError::UnknownTable(table_ref.name.clone()));
            }
            let columns = catalog.columns(&table_ref.name)?;

            let qualifier = table_ref.qualifier();
            if tables.iter().any(|t| t.qualifier == qualifier) {
                return Err(SqlError::DuplicateTableReference(qualifier.to_string()));
            }

            let by_name = columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name.clone(), offset + i))
                .collect();
            offset += columns.len();

            tables.push(BoundTable {
                name: table_ref.name.clone(),
                qualifier: qualifier.to_string(),
                columns: columns.into_iter().map(|c| c.name).collect(),
                by_name,
            });
        }

        Ok(Self {
            tables,
            width: offset,
        })
    }

    /// Resolves a column reference to its flat index.
    ///
    /// A qualified reference must name a bound table and one of its columns.
    /// An unqualified reference must match exactly one column across all
    /// bound tables.
    pub fn resolve(&self, table: Option<&str>, column: &str) -> SqlResult<usize> {
        match table {
            Some(qualifier) => {
                let bound = self
                    .tables
                    .iter()
                    .find(|t| t.qualifier == qualifier)
                    .ok_or_else(|| SqlError::TableNotSpecified(qualifier.to_string()))?;
                bound
                    .by_name
                    .get(column)
                    .copied()
                    .ok_or_else(|| SqlError::ColumnNotFound(format!("{}.{}", qualifier, column)))
            }
            None => {
                let mut matches = self.tables.iter().filter_map(|t| t.by_name.get(column));
                match (matches.next(), matches.next()) {
                    (Some(&index), None) => Ok(index),
                    (None, _) => Err(SqlError::ColumnNotFound(column.to_string())),
                    (Some(_), Some(_)) => Err(SqlError::AmbiguousColumn(column.to_string())),
                }
            }
        }
    }

    /// Returns the bound table names in FROM order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    /// Returns the total number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `qualifier.column` labels for every flat index.
    pub fn column_labels(&self) -> Vec<String> {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter().map(move |c| format!("{}.{}", t.qualifier, c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CreateTable;
    use crate::types::DataType;
    use reldb_kv::Environment;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        let catalog = Catalog::open(Arc::new(Environment::new())).unwrap();
        catalog
            .create_table(
                CreateTable::new("students")
                    .column("id", DataType::Int, true)
                    .column("name", DataType::Char(10), false)
                    .primary_key(["id"]),
            )
            .unwrap();
        catalog
            .create_table(
                CreateTable::new("lectures")
                    .column("id", DataType::Int, true)
                    .column("title", DataType::Char(20), false)
                    .column("room", DataType::Int, false),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_flat_indices_follow_from_order() {
        let catalog = catalog();
        let resolver = ColumnResolver::new(
            &catalog,
            &[TableRef::new("lectures"), TableRef::new("students")],
        )
        .unwrap();

        assert_eq!(resolver.width(), 5);
        assert_eq!(resolver.resolve(None, "title").unwrap(), 1);
        assert_eq!(resolver.resolve(None, "name").unwrap(), 4);
        assert_eq!(resolver.resolve(Some("students"), "id").unwrap(), 3);
        assert_eq!(resolver.table_names(), ["lectures", "students"]);
        assert_eq!(
            resolver.column_labels(),
            [
                "lectures.id",
                "lectures.title",
                "lectures.room",
                "students.id",
                "students.name"
            ]
        );
    }

    #[test]
    fn test_ambiguous_until_qualified() {
        let catalog = catalog();
        let resolver = ColumnResolver::new(
            &catalog,
            &[TableRef::aliased("students", "s"), TableRef::new("lectures")],
        )
        .unwrap();

        assert_eq!(
            resolver.resolve(None, "id").unwrap_err(),
            SqlError::AmbiguousColumn("id".into())
        );
        assert_eq!(resolver.resolve(Some("s"), "id").unwrap(), 0);
        assert_eq!(resolver.resolve(Some("lectures"), "id").unwrap(), 2);
        // An aliased table is no longer reachable under its own name
        assert_eq!(
            resolver.resolve(Some("students"), "id").unwrap_err(),
            SqlError::TableNotSpecified("students".into())
        );
    }

    #[test]
    fn test_resolution_failures() {
        let catalog = catalog();
        let resolver = ColumnResolver::new(&catalog, &[TableRef::new("students")]).unwrap();

        assert_eq!(
            resolver.resolve(None, "missing").unwrap_err(),
            SqlError::ColumnNotFound("missing".into())
        );
        assert_eq!(
            resolver.resolve(Some("students"), "title").unwrap_err(),
            SqlError::ColumnNotFound("students.title".into())
        );
    }

    #[test]
    fn test_bind_failures() {
        let catalog = catalog();
        assert_eq!(
            ColumnResolver::new(&catalog, &[TableRef::new("ghost")]).unwrap_err(),
            SqlError::UnknownTable("ghost".into())
        );
        assert_eq!(
            ColumnResolver::new(
                &catalog,
                &[TableRef::new("students"), TableRef::new("students")]
            )
            .unwrap_err(),
            SqlError::DuplicateTableReference("students".into())
        );
        assert_eq!(
            ColumnResolver::new(
                &catalog,
                &[TableRef::aliased("students", "x"), TableRef::aliased("lectures", "x")]
            )
            .unwrap_err(),
            SqlError::DuplicateTableReference("x".into())
        );
        // Self-join under distinct aliases is fine
        assert!(ColumnResolver::new(
            &catalog,
            &[TableRef::aliased("students", "a"), TableRef::aliased("students", "b")]
        )
        .is_ok());
    }
}
