//! Single-table scans.
//!
//! `TableScan` walks one table's data keyspace with a live cursor and lets
//! the caller delete or rewrite the record it is positioned on. Deleting the
//! current record steps the cursor back one record, so the next `advance`
//! lands on the record that followed the deleted one.

use reldb_kv::{Cursor, CursorEntry, CursorState};
use tracing::trace;

use super::catalog::Catalog;
use super::codec::{decode_row, encode_row};
use crate::error::{SqlError, SqlResult};
use crate::row::Row;

/// Where a [`TableScan`] is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPosition {
    /// Before the first record. `advance` moves to the (current) first record.
    BeforeFirst,
    /// On a record.
    OnRecord,
    /// Past the last record.
    AfterLast,
}

/// A cursor-backed scan over one table.
#[derive(Debug)]
pub struct TableScan {
    /// Table name.
    table: String,
    /// Cursor over the data keyspace.
    cursor: Cursor,
    /// Records not yet deleted through this scan, counted at open.
    remaining: usize,
}

impl TableScan {
    /// Opens a scan positioned before the first record.
    pub fn open(catalog: &Catalog, table: &str) -> SqlResult<Self> {
        let data = catalog.data(table)?;
        let remaining = data.count();
        Ok(Self {
            table: table.to_string(),
            cursor: data.cursor(),
            remaining,
        })
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns how many records remain after deletions through this scan.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the scan position.
    pub fn position(&self) -> ScanPosition {
        match self.cursor.state() {
            CursorState::Uninitialized | CursorState::BeforeStart => ScanPosition::BeforeFirst,
            CursorState::Valid => ScanPosition::OnRecord,
            CursorState::AtEnd => ScanPosition::AfterLast,
        }
    }

    /// Moves to the next record. Returns false once the table is exhausted.
    pub fn advance(&mut self) -> bool {
        self.cursor.next().is_some()
    }

    /// Returns the record under the scan, or `None` when not on a record.
    pub fn current(&self) -> SqlResult<Option<Row>> {
        match self.position() {
            ScanPosition::OnRecord => match self.cursor.current() {
                Some(entry) => decode_entry_row(&entry).map(Some),
                None => Err(SqlError::internal(format!(
                    "record under scan of '{}' disappeared",
                    self.table
                ))),
            },
            _ => Ok(None),
        }
    }

    /// Replaces the record under the scan.
    pub fn replace_current(&mut self, row: &Row) -> SqlResult<()> {
        self.cursor.put_current(encode_row(row)?)?;
        trace!(table = %self.table, row = %row, "record rewritten");
        Ok(())
    }

    /// Deletes the record under the scan and steps back one record.
    ///
    /// When the deleted record was the first one, the scan is left at
    /// [`ScanPosition::BeforeFirst`].
    pub fn remove_current(&mut self) -> SqlResult<ScanPosition> {
        if self.position() != ScanPosition::OnRecord {
            return Err(SqlError::internal(format!(
                "delete on scan of '{}' that is not on a record",
                self.table
            )));
        }
        self.cursor.delete()?;
        self.remaining = self.remaining.saturating_sub(1);
        self.cursor.prev();
        trace!(table = %self.table, remaining = self.remaining, "record removed");
        Ok(self.position())
    }
}

/// Decodes a stored row.
pub(crate) fn decode_entry_row(entry: &CursorEntry) -> SqlResult<Row> {
    decode_row(entry.value.as_bytes())
}
