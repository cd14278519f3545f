//! Statement results.

use std::fmt;

use crate::row::Row;

/// Result of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSet {
    /// Column headers.
    pub columns: Vec<String>,
    /// Matching rows, projected.
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no row matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.values().iter().map(ToString::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let separator = format!("+{}+", separator);

        writeln!(f, "{}", separator)?;
        write!(f, "|")?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, " {:<width$} |", column, width = *width)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", separator)?;
        for row in &rendered {
            write!(f, "|")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, " {:<width$} |", cell, width = *width)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", separator)?;
        write!(f, "({} rows)", self.rows.len())
    }
}

/// Result of a DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteSummary {
    /// Rows physically deleted.
    pub deleted: u64,
    /// Matching rows kept because a non-nullable foreign key references them.
    pub retained: u64,
}

impl fmt::Display for DeleteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row(s) are deleted", self.deleted)?;
        if self.retained > 0 {
            write!(
                f,
                "\n{} row(s) are not deleted due to referential integrity",
                self.retained
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_result_set_display() {
        let result = ResultSet {
            columns: vec!["t.id".into(), "t.name".into()],
            rows: vec![
                Row::new(vec![Value::Int(1), Value::char("hello")]),
                Row::new(vec![Value::Int(22), Value::Null]),
            ],
        };
        let expected = "\
+------+--------+
| t.id | t.name |
+------+--------+
| 1    | hello  |
| 22   | NULL   |
+------+--------+
(2 rows)";
        assert_eq!(result.to_string(), expected);
    }

    #[test]
    fn test_delete_summary_display() {
        let summary = DeleteSummary {
            deleted: 3,
            retained: 0,
        };
        assert_eq!(summary.to_string(), "3 row(s) are deleted");

        let summary = DeleteSummary {
            deleted: 1,
            retained: 2,
        };
        assert!(summary.to_string().ends_with("2 row(s) are not deleted due to referential integrity"));
    }
}
