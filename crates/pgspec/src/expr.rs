//! Resolved predicate tree.
//!
//! Specifications are resolved into [`Expr`] once every attribute path has been
//! mapped to a concrete `alias.column`. `Expr::build()` then renders the SQL with
//! `$n` placeholders computed on the fly, so no string replacement is needed.

use crate::operator::LogicalOperator;
use crate::param::{Param, ParamList};
use std::fmt;

/// A column addressed through a query alias, e.g. `t1.title`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub alias: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.column)
    }
}

/// Expression node of a resolved WHERE clause.
#[derive(Clone, Debug)]
pub enum Expr {
    /// All children must hold.
    And(Vec<Expr>),

    /// At least one child must hold.
    Or(Vec<Expr>),

    /// Negation of the inner expression.
    Not(Box<Expr>),

    /// Explicit parentheses around an externally supplied group.
    Group(Box<Expr>),

    /// Simple comparison: column op $n
    Compare {
        column: ColumnRef,
        op: &'static str,
        value: Param,
    },

    /// Pattern match, optionally on the upper-cased column.
    Like {
        column: ColumnRef,
        pattern: Param,
        upper: bool,
        negated: bool,
    },

    /// column IS [NOT] NULL
    NullCheck { column: ColumnRef, is_null: bool },

    /// column [NOT] IN ($1, $2, ...)
    InList {
        column: ColumnRef,
        values: Vec<Param>,
        negated: bool,
    },

    /// column [NOT] BETWEEN $n AND $m
    Between {
        column: ColumnRef,
        from: Param,
        to: Param,
        negated: bool,
    },

    /// Always true.
    True,
}

impl Expr {
    /// Fold `rhs` into `lhs` with `op`, flattening runs of the same connector.
    pub fn connect(op: LogicalOperator, lhs: Expr, rhs: Expr) -> Expr {
        match (op, lhs) {
            (LogicalOperator::And, Expr::And(mut exprs)) => {
                exprs.push(rhs);
                Expr::And(exprs)
            }
            (LogicalOperator::Or, Expr::Or(mut exprs)) => {
                exprs.push(rhs);
                Expr::Or(exprs)
            }
            (LogicalOperator::And, lhs) => Expr::And(vec![lhs, rhs]),
            (LogicalOperator::Or, lhs) => Expr::Or(vec![lhs, rhs]),
        }
    }

    /// Negate this expression.
    pub fn negate(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    /// Build the SQL fragment, appending bind values to `params`.
    pub fn build(&self, params: &mut ParamList) -> String {
        match self {
            Expr::And(exprs) => build_joined(exprs, LogicalOperator::And, params),
            Expr::Or(exprs) => build_joined(exprs, LogicalOperator::Or, params),
            Expr::Not(inner) => format!("NOT ({})", inner.build(params)),
            Expr::Group(inner) => format!("({})", inner.build(params)),
            Expr::Compare { column, op, value } => {
                let idx = params.push_param(value.clone());
                format!("{column} {op} ${idx}")
            }
            Expr::Like {
                column,
                pattern,
                upper,
                negated,
            } => {
                let idx = params.push_param(pattern.clone());
                let op = if *negated { "NOT LIKE" } else { "LIKE" };
                if *upper {
                    format!("UPPER({column}) {op} ${idx}")
                } else {
                    format!("{column} {op} ${idx}")
                }
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| format!("${}", params.push_param(v.clone())))
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {op} ({})", placeholders.join(", "))
            }
            Expr::Between {
                column,
                from,
                to,
                negated,
            } => {
                let idx1 = params.push_param(from.clone());
                let idx2 = params.push_param(to.clone());
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{column} {op} ${idx1} AND ${idx2}")
            }
            Expr::True => "1=1".to_string(),
        }
    }
}

fn build_joined(exprs: &[Expr], op: LogicalOperator, params: &mut ParamList) -> String {
    let parts: Vec<String> = exprs
        .iter()
        .map(|e| {
            let sql = e.build(params);
            // A nested group with a different connector needs its own parentheses.
            match (op, e) {
                (LogicalOperator::And, Expr::Or(_)) | (LogicalOperator::Or, Expr::And(_)) => {
                    format!("({sql})")
                }
                _ => sql,
            }
        })
        .collect();
    parts.join(op.as_sql())
}
