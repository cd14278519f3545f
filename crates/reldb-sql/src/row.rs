//! Flat records.
//!
//! A `Row` is an ordered sequence of values addressed by one integer index.
//! A stored row holds one table's columns in declaration order; a joined row
//! is the concatenation of each participating table's columns in FROM-list
//! order.

use std::fmt;

use crate::types::Value;

/// A single flat record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Row {
    /// The values in this row.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates a row with all NULL values.
    pub fn nulls(num_columns: usize) -> Self {
        Self {
            values: vec![Value::Null; num_columns],
        }
    }

    /// Returns the number of columns in this row.
    pub fn num_columns(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at the given index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sets the value at the given index. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Returns the values as a slice.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row and returns the values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Returns the values at `indices`, in that order.
    ///
    /// Returns `None` if any index is out of range.
    pub fn tuple(&self, indices: &[usize]) -> Option<Vec<Value>> {
        indices.iter().map(|&i| self.values.get(i).cloned()).collect()
    }

    /// Projects this row to include only the specified columns.
    pub fn project(&self, indices: &[usize]) -> Row {
        let values = indices
            .iter()
            .map(|&i| self.values.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        Row { values }
    }

    /// Appends the columns of `other`.
    pub fn append(&mut self, other: &Row) {
        self.values.extend(other.values.iter().cloned());
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
