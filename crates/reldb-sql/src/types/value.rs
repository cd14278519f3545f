//! Typed values.
//!
//! A `Value` is what a single column of a stored row holds. Equality and
//! hashing are structural and include the type tag, so `Int(1) != Char("1")`
//! and `Null == Null`. SQL comparison semantics (where `Null` yields
//! `Unknown`) live in [`compare`](super::compare).

use std::fmt;

use super::DataType;

/// A calendar date. Components are independent integers with no range
/// checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Year.
    pub year: i32,
    /// Month.
    pub month: i32,
    /// Day.
    pub day: i32,
}

impl Date {
    /// Creates a date.
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A column value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Integer value.
    Int(i64),
    /// Character string value.
    Char(String),
    /// Date value.
    Date(Date),
}

impl Value {
    /// Creates a character value.
    pub fn char(s: impl Into<String>) -> Self {
        Value::Char(s.into())
    }

    /// Creates a date value.
    pub fn date(year: i32, month: i32, day: i32) -> Self {
        Value::Date(Date::new(year, month, day))
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type of this value, or `None` for NULL.
    ///
    /// A `Char` reports its own length in characters.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(DataType::Int),
            Value::Char(s) => Some(DataType::Char(
                u32::try_from(s.chars().count()).unwrap_or(u32::MAX),
            )),
            Value::Date(_) => Some(DataType::Date),
        }
    }

    /// Returns a short name of the value's type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Char(_) => "char",
            Value::Date(_) => "date",
        }
    }

    /// Returns true if this value may be stored in a column of type `ty`.
    ///
    /// NULL conforms to every type (nullability is checked separately) and
    /// `Char` length is not compared, since values are truncated on insert.
    pub fn conforms_to(&self, ty: &DataType) -> bool {
        match self.data_type() {
            None => true,
            Some(own) => own.same_kind(ty),
        }
    }

    /// Truncates a `Char` value to at most `len` characters.
    ///
    /// Other values are returned unchanged.
    pub fn truncate_to(self, len: u32) -> Value {
        match self {
            Value::Char(s) => {
                let limit = len as usize;
                match s.char_indices().nth(limit) {
                    Some((byte_idx, _)) => Value::Char(s[..byte_idx].to_string()),
                    None => Value::Char(s),
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Char(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Char(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Char(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::char("hello").to_string(), "hello");
        assert_eq!(Value::date(2024, 3, 7).to_string(), "2024-03-07");
        assert_eq!(Value::date(7, 1, 1).to_string(), "0007-01-01");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_structural_equality() {
        assert_ne!(Value::Int(1), Value::char("1"));
        assert_eq!(Value::Null, Value::Null);

        let mut set = HashSet::new();
        set.insert(Value::Int(1));
        set.insert(Value::char("1"));
        set.insert(Value::Int(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Int(3).data_type(), Some(DataType::Int));
        assert_eq!(Value::char("héllo").data_type(), Some(DataType::Char(5)));
        assert_eq!(Value::date(1, 2, 3).data_type(), Some(DataType::Date));
    }

    #[test]
    fn test_conforms_to() {
        assert!(Value::Int(1).conforms_to(&DataType::Int));
        assert!(Value::char("much longer").conforms_to(&DataType::Char(2)));
        assert!(Value::Null.conforms_to(&DataType::Date));
        assert!(!Value::Int(1).conforms_to(&DataType::Char(1)));
        assert!(!Value::date(1, 1, 1).conforms_to(&DataType::Int));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(Value::char("hello world").truncate_to(5), Value::char("hello"));
        assert_eq!(Value::char("hi").truncate_to(5), Value::char("hi"));
        // Never splits a multi-byte character
        assert_eq!(Value::char("日本語です").truncate_to(2), Value::char("日本"));
        assert_eq!(Value::Int(12345).truncate_to(2), Value::Int(12345));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(5i64)), Value::Int(5));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
