//! Lazy Cartesian product over live table cursors.
//!
//! The iterator holds one cursor per table and yields combinations in
//! odometer order: the last table advances fastest and wraps into the
//! table before it, exactly like nested loops with the first table
//! outermost. Each yielded row is the concatenation of one record from each
//! table, in table order.

use reldb_kv::Cursor;
use tracing::debug;

use super::catalog::Catalog;
use super::table::decode_entry_row;
use crate::error::{SqlError, SqlResult};
use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinState {
    /// Every cursor is on its first record; nothing yielded yet.
    Fresh,
    /// The current combination has been yielded.
    Yielded,
    /// No combinations remain.
    Exhausted,
}

/// Iterator over the Cartesian product of several tables.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use reldb_kv::Environment;
/// use reldb_sql::storage::{Catalog, CreateTable, JoinIterator};
/// use reldb_sql::types::DataType;
///
/// let catalog = Catalog::open(Arc::new(Environment::new())).unwrap();
/// catalog
///     .create_table(CreateTable::new("empty").column("x", DataType::Int, false))
///     .unwrap();
/// let mut join = JoinIterator::open(&catalog, &["empty".to_string()]).unwrap();
/// assert!(join.next().is_none());
/// ```
#[derive(Debug)]
pub struct JoinIterator {
    /// Table names in join order.
    tables: Vec<String>,
    /// One cursor per table; empty once closed.
    cursors: Vec<Cursor>,
    /// Record counts snapshotted at open.
    counts: Vec<usize>,
    /// Record each cursor is on.
    current: Vec<Row>,
    /// Iteration state.
    state: JoinState,
}

impl JoinIterator {
    /// Opens a cursor on every table and positions each on its first record.
    ///
    /// If any table is empty the iterator is exhausted from the start.
    pub fn open(catalog: &Catalog, tables: &[String]) -> SqlResult<Self> {
        let mut cursors = Vec::with_capacity(tables.len());
        let mut counts = Vec::with_capacity(tables.len());
        for table in tables {
            let data = catalog.data(table)?;
            counts.push(data.count());
            cursors.push(data.cursor());
        }

        let mut iter = Self {
            tables: tables.to_vec(),
            cursors,
            counts,
            current: Vec::with_capacity(tables.len()),
            state: JoinState::Fresh,
        };
        iter.reset()?;
        debug!(tables = ?iter.tables, counts = ?iter.counts, "join opened");
        Ok(iter)
    }

    /// Returns the record counts snapshotted at open.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Repositions every cursor on its table's first record.
    pub fn reset(&mut self) -> SqlResult<()> {
        self.current.clear();
        if self.cursors.is_empty() || self.counts.contains(&0) {
            self.state = JoinState::Exhausted;
            return Ok(());
        }
        for i in 0..self.cursors.len() {
            let row = self.first_record(i)?;
            self.current.push(row);
        }
        self.state = JoinState::Fresh;
        Ok(())
    }

    /// Releases every cursor. The iterator yields nothing afterwards.
    pub fn close(&mut self) {
        if !self.cursors.is_empty() {
            debug!(tables = ?self.tables, "join closed");
        }
        self.cursors.clear();
        self.current.clear();
        self.state = JoinState::Exhausted;
    }

    fn first_record(&mut self, i: usize) -> SqlResult<Row> {
        match self.cursors[i].first() {
            Some(entry) => decode_entry_row(&entry),
            None => Err(self.vanished(i)),
        }
    }

    fn vanished(&self, i: usize) -> SqlError {
        SqlError::internal(format!(
            "cursor on '{}' cannot produce a record during join",
            self.tables[i]
        ))
    }

    /// Advances the odometer. Returns false when the last combination has
    /// been passed.
    fn advance(&mut self) -> SqlResult<bool> {
        for i in (0..self.cursors.len()).rev() {
            if let Some(entry) = self.cursors[i].next() {
                self.current[i] = decode_entry_row(&entry)?;
                return Ok(true);
            }
            if i == 0 {
                return Ok(false);
            }
            self.current[i] = self.first_record(i)?;
        }
        Ok(false)
    }

    fn combined(&self) -> Row {
        let mut row = Row::new(Vec::new());
        for part in &self.current {
            row.append(part);
        }
        row
    }

    fn fetch_next(&mut self) -> SqlResult<Option<Row>> {
        match self.state {
            JoinState::Exhausted => Ok(None),
            JoinState::Fresh => {
                self.state = JoinState::Yielded;
                Ok(Some(self.combined()))
            }
            JoinState::Yielded => {
                if self.advance()? {
                    Ok(Some(self.combined()))
                } else {
                    self.close();
                    Ok(None)
                }
            }
        }
    }
}

impl Iterator for JoinIterator {
    type Item = SqlResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fetch_next() {
            Ok(row) => row.map(Ok),
            Err(e) => {
                self.close();
                Some(Err(e))
            }
        }
    }
}
