//! Small enums shared by every predicate kind.

use crate::spec::Specification;
use serde::{Deserialize, Serialize};

/// Boolean connector used to fold a predicate into the running composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    /// Combine `spec` with `other` using this connector.
    pub fn connect<T>(self, spec: Specification<T>, other: Specification<T>) -> Specification<T> {
        match self {
            LogicalOperator::And => spec.and(other),
            LogicalOperator::Or => spec.or(other),
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        }
    }
}

/// Join used when a path crosses an association.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// Placement of the `%` wildcard around a LIKE fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wildcard {
    /// No wildcard: the fragment must match the whole value.
    #[default]
    Absence,
    /// `%value`
    Leading,
    /// `value%`
    Trailing,
    /// `%value%`
    Both,
}

impl Wildcard {
    /// Apply the wildcard to an already case-adjusted fragment.
    pub fn apply(self, value: &str) -> String {
        match self {
            Wildcard::Absence => value.to_string(),
            Wildcard::Leading => format!("%{value}"),
            Wildcard::Trailing => format!("{value}%"),
            Wildcard::Both => format!("%{value}%"),
        }
    }
}
