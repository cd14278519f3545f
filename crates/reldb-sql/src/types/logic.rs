//! Three-valued logic and value comparison.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Not;

use super::Value;
use crate::error::{SqlError, SqlResult};

/// A Kleene truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tvl {
    /// Definitely true.
    True,
    /// Definitely false.
    False,
    /// Not known (a NULL was involved).
    Unknown,
}

impl Tvl {
    /// Kleene conjunction.
    pub fn and(self, other: Tvl) -> Tvl {
        match (self, other) {
            (Tvl::False, _) | (_, Tvl::False) => Tvl::False,
            (Tvl::True, Tvl::True) => Tvl::True,
            _ => Tvl::Unknown,
        }
    }

    /// Kleene disjunction.
    pub fn or(self, other: Tvl) -> Tvl {
        match (self, other) {
            (Tvl::True, _) | (_, Tvl::True) => Tvl::True,
            (Tvl::False, Tvl::False) => Tvl::False,
            _ => Tvl::Unknown,
        }
    }

    /// Returns true only for `True`. Rows are kept by a filter iff this holds.
    pub fn is_true(self) -> bool {
        self == Tvl::True
    }

    /// Negates the value if `negate` is set.
    pub fn negate_if(self, negate: bool) -> Tvl {
        if negate {
            !self
        } else {
            self
        }
    }
}

impl Not for Tvl {
    type Output = Tvl;

    fn not(self) -> Tvl {
        match self {
            Tvl::True => Tvl::False,
            Tvl::False => Tvl::True,
            Tvl::Unknown => Tvl::Unknown,
        }
    }
}

impl From<bool> for Tvl {
    fn from(b: bool) -> Self {
        if b {
            Tvl::True
        } else {
            Tvl::False
        }
    }
}

impl fmt::Display for Tvl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tvl::True => write!(f, "TRUE"),
            Tvl::False => write!(f, "FALSE"),
            Tvl::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `<>`
    Ne,
}

impl CompareOp {
    /// Returns true if `ordering` (left relative to right) satisfies the operator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
        }
    }

    /// Returns the SQL symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compares two values under SQL semantics.
///
/// Any NULL operand yields `Unknown`. Operands of different types are an
/// `Incomparable` error. `Char` compares bytewise, `Date` by year, then
/// month, then day.
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> SqlResult<Tvl> {
    let ordering = match (left, right) {
        (Value::Null, _) | (_, Value::Null) => return Ok(Tvl::Unknown),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Char(a), Value::Char(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        _ => {
            return Err(SqlError::Incomparable {
                left: left.type_name().to_string(),
                right: right.type_name().to_string(),
            })
        }
    };
    Ok(Tvl::from(op.holds(ordering)))
}
