//! Column data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a column.
///
/// Nullability is a per-column flag, not a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int,
    /// Fixed-length character string; the length is in characters.
    Char(u32),
    /// Calendar date (year, month, day), not validated.
    Date,
}

impl DataType {
    /// Returns true if both types carry the same tag, ignoring `Char` length.
    pub fn same_kind(&self, other: &DataType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Returns the `Char` length, if this is a `Char` type.
    pub fn char_length(&self) -> Option<u32> {
        match self {
            DataType::Char(len) => Some(*len),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Char(len) => write!(f, "char({})", len),
            DataType::Date => write!(f, "date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_equality() {
        assert_eq!(DataType::Char(5), DataType::Char(5));
        assert_ne!(DataType::Char(5), DataType::Char(6));
        assert_ne!(DataType::Int, DataType::Date);
        assert!(DataType::Char(5).same_kind(&DataType::Char(6)));
        assert!(!DataType::Char(5).same_kind(&DataType::Int));
    }

    #[test]
    fn test_type_display() {
        assert_eq!(DataType::Int.to_string(), "int");
        assert_eq!(DataType::Char(10).to_string(), "char(10)");
        assert_eq!(DataType::Date.to_string(), "date");
    }
}
