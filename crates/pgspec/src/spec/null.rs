use super::predicate::{BaseOptions, PredicateOptions};
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::Expr;
use crate::operator::JoinKind;
use crate::path::AttributePath;

/// `path IS NULL`, or `IS NOT NULL` when negated.
///
/// Always resolved through LEFT joins so a missing related row counts as null.
#[derive(Debug, Clone)]
pub struct NullPredicate {
    pub(crate) base: BaseOptions,
}

impl NullPredicate {
    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        let column = self.base.resolve(ctx)?;
        Ok(Expr::NullCheck {
            column,
            is_null: !self.base.not,
        })
    }
}

/// Builder for [`NullPredicate`].
#[derive(Debug, Clone)]
pub struct NullBuilder {
    base: BaseOptions,
}

impl NullBuilder {
    pub fn new(path: AttributePath) -> Self {
        Self {
            base: BaseOptions::new(path),
        }
    }

    /// The join kind is forced to LEFT regardless of what was requested.
    pub fn build(mut self) -> NullPredicate {
        self.base.join = JoinKind::Left;
        NullPredicate { base: self.base }
    }
}

impl PredicateOptions for NullBuilder {
    fn base_mut(&mut self) -> &mut BaseOptions {
        &mut self.base
    }
}
