//! WHERE-clause predicates.
//!
//! A parser produces a [`Condition`], which names columns the way the user
//! wrote them. [`Predicate::bind`] resolves those names against a FROM list
//! and yields a [`Predicate`] that addresses columns by flat index and can be
//! evaluated against joined rows.

use std::fmt;

use crate::error::{SqlError, SqlResult};
use crate::resolver::ColumnResolver;
use crate::types::{compare, CompareOp, Tvl, Value};

// =========================================================================
// Unresolved conditions
// =========================================================================

/// A possibly qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Table name or alias.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// An unqualified reference.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// A qualified reference.
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{}.{}", t, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// An operand of a comparison as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A column reference.
    Column(ColumnRef),
    /// A literal.
    Value(Value),
}

impl From<ColumnRef> for Term {
    fn from(c: ColumnRef) -> Self {
        Term::Column(c)
    }
}

impl From<Value> for Term {
    fn from(v: Value) -> Self {
        Term::Value(v)
    }
}

/// A WHERE clause as produced by a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Conjunction.
    And(Box<Condition>, Box<Condition>),
    /// Disjunction.
    Or(Box<Condition>, Box<Condition>),
    /// Negation.
    Not(Box<Condition>),
    /// Comparison.
    Compare {
        /// Left operand.
        left: Term,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Term,
    },
    /// `IS [NOT] NULL`.
    IsNull {
        /// Tested column.
        column: ColumnRef,
        /// True for `IS NOT NULL`.
        negated: bool,
    },
}

impl Condition {
    /// `left AND right`
    pub fn and(left: Condition, right: Condition) -> Self {
        Condition::And(Box::new(left), Box::new(right))
    }

    /// `left OR right`
    pub fn or(left: Condition, right: Condition) -> Self {
        Condition::Or(Box::new(left), Box::new(right))
    }

    /// `NOT inner`
    pub fn not(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }

    /// `left op right`
    pub fn compare(left: impl Into<Term>, op: CompareOp, right: impl Into<Term>) -> Self {
        Condition::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// `column IS NULL`
    pub fn is_null(column: ColumnRef) -> Self {
        Condition::IsNull {
            column,
            negated: false,
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: ColumnRef) -> Self {
        Condition::IsNull {
            column,
            negated: true,
        }
    }
}

// =========================================================================
// Bound predicates
// =========================================================================

/// Logical connective of a [`Predicate::Logical`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Kleene AND.
    And,
    /// Kleene OR.
    Or,
}

/// A comparison operand after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Flat column index, read from the row on every evaluation.
    Column(usize),
    /// Constant.
    Constant(Value),
}

impl Operand {
    fn value<'a>(&'a self, row: &'a [Value]) -> SqlResult<&'a Value> {
        match self {
            Operand::Constant(v) => Ok(v),
            Operand::Column(i) => row.get(*i).ok_or_else(|| {
                SqlError::internal(format!(
                    "column index {} out of range for row of width {}",
                    i,
                    row.len()
                ))
            }),
        }
    }
}

/// An evaluable predicate tree.
///
/// Every node carries a `negated` flag applied after the node's own logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// AND/OR over two subtrees.
    Logical {
        /// Connective.
        op: LogicalOp,
        /// Left subtree.
        left: Box<Predicate>,
        /// Right subtree.
        right: Box<Predicate>,
        /// Negate the result.
        negated: bool,
    },
    /// Comparison of two operands.
    Compare {
        /// Left operand.
        left: Operand,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Operand,
        /// Negate the result.
        negated: bool,
    },
    /// Null test on one column; never `Unknown`.
    NullTest {
        /// Flat column index.
        column: usize,
        /// True for `IS NULL`, false for `IS NOT NULL`.
        is_null: bool,
        /// Negate the result.
        negated: bool,
    },
}

impl Predicate {
    /// Resolves every column of `condition` and builds the predicate.
    ///
    /// `NOT` is folded into the `negated` flag of its operand, so
    /// `NOT NOT c` binds to the same tree as `c`.
    pub fn bind(condition: &Condition, resolver: &ColumnResolver) -> SqlResult<Predicate> {
        Self::bind_node(condition, resolver, false)
    }

    fn bind_node(
        condition: &Condition,
        resolver: &ColumnResolver,
        negated: bool,
    ) -> SqlResult<Predicate> {
        let bind_term = |term: &Term| -> SqlResult<Operand> {
            match term {
                Term::Value(v) => Ok(Operand::Constant(v.clone())),
                Term::Column(c) => resolver
                    .resolve(c.table.as_deref(), &c.column)
                    .map(Operand::Column),
            }
        };

        match condition {
            Condition::And(l, r) | Condition::Or(l, r) => {
                let op = if matches!(condition, Condition::And(..)) {
                    LogicalOp::And
                } else {
                    LogicalOp::Or
                };
                Ok(Predicate::Logical {
                    op,
                    left: Box::new(Self::bind_node(l, resolver, false)?),
                    right: Box::new(Self::bind_node(r, resolver, false)?),
                    negated,
                })
            }
            Condition::Not(inner) => Self::bind_node(inner, resolver, !negated),
            Condition::Compare { left, op, right } => Ok(Predicate::Compare {
                left: bind_term(left)?,
                op: *op,
                right: bind_term(right)?,
                negated,
            }),
            Condition::IsNull {
                column,
                negated: is_not,
            } => Ok(Predicate::NullTest {
                column: resolver.resolve(column.table.as_deref(), &column.column)?,
                is_null: !is_not,
                negated,
            }),
        }
    }

    /// Evaluates the predicate against a flat row.
    pub fn evaluate(&self, row: &[Value]) -> SqlResult<Tvl> {
        match self {
            Predicate::Logical {
                op,
                left,
                right,
                negated,
            } => {
                let l = left.evaluate(row)?;
                let r = right.evaluate(row)?;
                let result = match op {
                    LogicalOp::And => l.and(r),
                    LogicalOp::Or => l.or(r),
                };
                Ok(result.negate_if(*negated))
            }
            Predicate::Compare {
                left,
                op,
                right,
                negated,
            } => {
                let result = compare(left.value(row)?, *op, right.value(row)?)?;
                Ok(result.negate_if(*negated))
            }
            Predicate::NullTest {
                column,
                is_null,
                negated,
            } => {
                let operand = Operand::Column(*column);
                let value = operand.value(row)?;
                Ok(Tvl::from(value.is_null() == *is_null).negate_if(*negated))
            }
        }
    }

    /// Returns true if the row passes the filter (evaluates to `True`).
    pub fn matches(&self, row: &[Value]) -> SqlResult<bool> {
        Ok(self.evaluate(row)?.is_true())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TableRef;
    use crate::storage::{Catalog, CreateTable};
    use crate::types::DataType;
    use reldb_kv::Environment;
    use std::sync::Arc;

    fn resolver() -> ColumnResolver {
        let catalog = Catalog::open(Arc::new(Environment::new())).unwrap();
        catalog
            .create_table(
                CreateTable::new("t")
                    .column("a", DataType::Int, false)
                    .column("b", DataType::Char(5), false)
                    .column("c", DataType::Date, false),
            )
            .unwrap();
        ColumnResolver::new(&catalog, &[TableRef::new("t")]).unwrap()
    }

    fn gt(column: usize, value: i64) -> Predicate {
        Predicate::Compare {
            left: Operand::Column(column),
            op: CompareOp::Gt,
            right: Operand::Constant(Value::Int(value)),
            negated: false,
        }
    }

    #[test]
    fn test_compare_reads_current_row() {
        let p = gt(0, 5);
        assert_eq!(p.evaluate(&[Value::Int(7)]).unwrap(), Tvl::True);
        assert_eq!(p.evaluate(&[Value::Int(3)]).unwrap(), Tvl::False);
        assert_eq!(p.evaluate(&[Value::Null]).unwrap(), Tvl::Unknown);
    }

    #[test]
    fn test_negation_applied_after_logic() {
        let p = Predicate::Logical {
            op: LogicalOp::And,
            left: Box::new(gt(0, 5)),
            right: Box::new(gt(1, 5)),
            negated: true,
        };
        let row = [Value::Int(7), Value::Int(1)];
        assert_eq!(p.evaluate(&row).unwrap(), Tvl::True);
        let row = [Value::Int(7), Value::Null];
        assert_eq!(p.evaluate(&row).unwrap(), Tvl::Unknown);
    }

    #[test]
    fn test_null_test_is_definite() {
        let is_null = Predicate::NullTest {
            column: 0,
            is_null: true,
            negated: false,
        };
        assert_eq!(is_null.evaluate(&[Value::Null]).unwrap(), Tvl::True);
        assert_eq!(is_null.evaluate(&[Value::Int(1)]).unwrap(), Tvl::False);

        let negated = Predicate::NullTest {
            column: 0,
            is_null: false,
            negated: true,
        };
        assert_eq!(negated.evaluate(&[Value::Null]).unwrap(), Tvl::True);
    }

    #[test]
    fn test_incomparable_propagates() {
        let p = gt(0, 5);
        assert!(matches!(
            p.evaluate(&[Value::char("x")]),
            Err(SqlError::Incomparable { .. })
        ));
    }

    #[test]
    fn test_out_of_range_column_is_internal() {
        let err = gt(3, 5).evaluate(&[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, SqlError::Internal(_)));

        let null_test = Predicate::NullTest {
            column: 2,
            is_null: true,
            negated: false,
        };
        let err = null_test.evaluate(&[Value::Null]).unwrap_err();
        assert!(matches!(err, SqlError::Internal(_)));
    }

    #[test]
    fn test_bind_resolves_and_folds_not() {
        let resolver = resolver();
        let condition = Condition::not(Condition::and(
            Condition::compare(ColumnRef::new("a"), CompareOp::Ge, Value::Int(1)),
            Condition::not(Condition::is_not_null(ColumnRef::qualified("t", "c"))),
        ));

        let predicate = Predicate::bind(&condition, &resolver).unwrap();
        assert_eq!(
            predicate,
            Predicate::Logical {
                op: LogicalOp::And,
                left: Box::new(Predicate::Compare {
                    left: Operand::Column(0),
                    op: CompareOp::Ge,
                    right: Operand::Constant(Value::Int(1)),
                    negated: false,
                }),
                right: Box::new(Predicate::NullTest {
                    column: 2,
                    is_null: false,
                    negated: true,
                }),
                negated: true,
            }
        );

        let double = Condition::not(Condition::not(Condition::is_null(ColumnRef::new("b"))));
        assert_eq!(
            Predicate::bind(&double, &resolver).unwrap(),
            Predicate::bind(&Condition::is_null(ColumnRef::new("b")), &resolver).unwrap()
        );
    }

    #[test]
    fn test_bind_propagates_resolution_errors() {
        let resolver = resolver();
        let condition = Condition::or(
            Condition::is_null(ColumnRef::new("a")),
            Condition::compare(ColumnRef::qualified("u", "a"), CompareOp::Eq, Value::Int(1)),
        );
        assert_eq!(
            Predicate::bind(&condition, &resolver).unwrap_err(),
            SqlError::TableNotSpecified("u".into())
        );
    }

    #[test]
    fn test_bound_predicate_filters_rows() {
        let resolver = resolver();
        let condition = Condition::or(
            Condition::compare(ColumnRef::new("b"), CompareOp::Eq, Value::char("hello")),
            Condition::compare(
                Value::date(2024, 1, 1),
                CompareOp::Lt,
                ColumnRef::new("c"),
            ),
        );
        let predicate = Predicate::bind(&condition, &resolver).unwrap();

        let hit = [Value::Int(1), Value::char("hello"), Value::Null];
        let late = [Value::Int(2), Value::char("bye"), Value::date(2024, 6, 1)];
        let miss = [Value::Int(3), Value::char("bye"), Value::Null];
        assert!(predicate.matches(&hit).unwrap());
        assert!(predicate.matches(&late).unwrap());
        assert!(!predicate.matches(&miss).unwrap());
    }
}
