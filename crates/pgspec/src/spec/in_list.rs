use super::predicate::{BaseOptions, PredicateOptions};
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::Expr;
use crate::param::Param;
use crate::path::AttributePath;

/// `path IN (...)`, or `NOT IN` when negated.
#[derive(Debug, Clone)]
pub struct InPredicate {
    pub(crate) base: BaseOptions,
    pub(crate) values: Vec<Param>,
}

impl InPredicate {
    pub fn values(&self) -> &[Param] {
        &self.values
    }

    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        let column = self.base.resolve(ctx)?;
        Ok(Expr::InList {
            column,
            values: self.values.clone(),
            negated: self.base.not,
        })
    }
}

/// Builder for [`InPredicate`].
#[derive(Debug, Clone)]
pub struct InBuilder {
    base: BaseOptions,
    values: Vec<Param>,
}

impl InBuilder {
    pub fn new(path: AttributePath, values: Vec<Param>) -> Self {
        Self {
            base: BaseOptions::new(path),
            values,
        }
    }

    /// `None` for an empty set, which would otherwise match nothing.
    pub fn build(self) -> Option<InPredicate> {
        if self.values.is_empty() {
            return None;
        }
        Some(InPredicate {
            base: self.base,
            values: self.values,
        })
    }
}

impl PredicateOptions for InBuilder {
    fn base_mut(&mut self) -> &mut BaseOptions {
        &mut self.base
    }
}
