//! Predicates and the composable [`Specification`] tree.
//!
//! A [`Specification<T>`] is a pure value: a boolean tree of attribute
//! predicates rooted at entity `T`. It carries no schema information until it is
//! resolved with [`Specification::to_query`], which maps every attribute path to
//! a column and collects the joins the paths need.

mod comparison;
mod equal;
mod in_list;
mod like;
mod null;
mod predicate;

#[cfg(test)]
mod tests;

pub use comparison::{
    Bound, ComparisonBuilder, ComparisonKind, ComparisonPredicate, Range, Sign,
};
pub use equal::{EqualBuilder, EqualPredicate};
pub use in_list::{InBuilder, InPredicate};
pub use like::{DEFAULT_MIN_CHARS, LikeBuilder, LikePredicate};
pub use null::{NullBuilder, NullPredicate};
pub use predicate::{BaseOptions, Predicate, PredicateOptions};

use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::Expr;
use crate::query::SpecQuery;
use crate::schema::{Entity, Schema};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone)]
enum SpecNode {
    Predicate(Predicate),
    And(Vec<SpecNode>),
    Or(Vec<SpecNode>),
    Not(Box<SpecNode>),
    Group(Box<SpecNode>),
}

impl SpecNode {
    fn resolve(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        Ok(match self {
            SpecNode::Predicate(p) => p.to_expr(ctx)?,
            SpecNode::And(nodes) => Expr::And(
                nodes
                    .iter()
                    .map(|n| n.resolve(ctx))
                    .collect::<OrmResult<_>>()?,
            ),
            SpecNode::Or(nodes) => Expr::Or(
                nodes
                    .iter()
                    .map(|n| n.resolve(ctx))
                    .collect::<OrmResult<_>>()?,
            ),
            SpecNode::Not(inner) => inner.resolve(ctx)?.negate(),
            SpecNode::Group(inner) => Expr::Group(Box::new(inner.resolve(ctx)?)),
        })
    }

    fn count(&self) -> usize {
        match self {
            SpecNode::Predicate(_) => 1,
            SpecNode::And(nodes) | SpecNode::Or(nodes) => nodes.iter().map(SpecNode::count).sum(),
            SpecNode::Not(inner) | SpecNode::Group(inner) => inner.count(),
        }
    }
}

/// A filter over entity `T`.
///
/// The unrestricted specification is the identity for both [`and`](Self::and)
/// and [`or`](Self::or): combining it with another specification yields the
/// other one unchanged.
pub struct Specification<T> {
    node: Option<SpecNode>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Specification<T> {
    /// A specification that matches every record.
    pub fn unrestricted() -> Self {
        Self {
            node: None,
            _entity: PhantomData,
        }
    }

    fn from_node(node: Option<SpecNode>) -> Self {
        Self {
            node,
            _entity: PhantomData,
        }
    }

    /// Whether this specification matches every record.
    pub fn is_unrestricted(&self) -> bool {
        self.node.is_none()
    }

    /// Number of predicates in the tree.
    pub fn predicate_count(&self) -> usize {
        self.node.as_ref().map_or(0, SpecNode::count)
    }

    pub fn and(self, other: Specification<T>) -> Self {
        let node = match (self.node, other.node) {
            (None, n) | (n, None) => n,
            (Some(SpecNode::And(mut nodes)), Some(rhs)) => {
                nodes.push(rhs);
                Some(SpecNode::And(nodes))
            }
            (Some(lhs), Some(rhs)) => Some(SpecNode::And(vec![lhs, rhs])),
        };
        Self::from_node(node)
    }

    pub fn or(self, other: Specification<T>) -> Self {
        let node = match (self.node, other.node) {
            (None, n) | (n, None) => n,
            (Some(SpecNode::Or(mut nodes)), Some(rhs)) => {
                nodes.push(rhs);
                Some(SpecNode::Or(nodes))
            }
            (Some(lhs), Some(rhs)) => Some(SpecNode::Or(vec![lhs, rhs])),
        };
        Self::from_node(node)
    }

    /// Negate the specification. The unrestricted specification stays unrestricted.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::from_node(self.node.map(|n| SpecNode::Not(Box::new(n))))
    }

    /// Wrap the tree so it renders inside its own parentheses.
    pub(crate) fn grouped(self) -> Self {
        Self::from_node(self.node.map(|n| SpecNode::Group(Box::new(n))))
    }

    /// Resolve the tree to a WHERE expression; `None` when unrestricted.
    pub(crate) fn resolve(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Option<Expr>> {
        self.node.as_ref().map(|n| n.resolve(ctx)).transpose()
    }
}

impl<T: Entity> Specification<T> {
    /// Resolve against `schema`, producing an executable query over `T`'s table.
    pub fn to_query<'s>(&self, schema: &'s dyn Schema) -> OrmResult<SpecQuery<'s>> {
        let mut ctx = QueryContext::new(schema, T::entity_name())?;
        let filter = self.resolve(&mut ctx)?;
        tracing::debug!(
            target: "pgspec",
            entity = T::entity_name(),
            predicates = self.predicate_count(),
            joins = ctx.join_count(),
            distinct = ctx.is_distinct(),
            "resolved specification"
        );
        Ok(SpecQuery::new(ctx, filter))
    }
}

impl<T> From<Predicate> for Specification<T> {
    fn from(predicate: Predicate) -> Self {
        Self::from_node(Some(SpecNode::Predicate(predicate)))
    }
}

impl<T> Default for Specification<T> {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("entity", &std::any::type_name::<T>())
            .field("node", &self.node)
            .finish()
    }
}
