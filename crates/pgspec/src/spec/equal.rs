use super::predicate::{BaseOptions, PredicateOptions};
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::Expr;
use crate::param::Param;
use crate::path::AttributePath;

/// `path = value`, or `path != value` when negated.
#[derive(Debug, Clone)]
pub struct EqualPredicate {
    pub(crate) base: BaseOptions,
    pub(crate) value: Param,
}

impl EqualPredicate {
    pub fn value(&self) -> &Param {
        &self.value
    }

    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        let column = self.base.resolve(ctx)?;
        Ok(Expr::Compare {
            column,
            op: if self.base.not { "!=" } else { "=" },
            value: self.value.clone(),
        })
    }
}

/// Builder for [`EqualPredicate`].
#[derive(Debug, Clone)]
pub struct EqualBuilder {
    base: BaseOptions,
    value: Param,
}

impl EqualBuilder {
    pub fn new(path: AttributePath, value: Param) -> Self {
        Self {
            base: BaseOptions::new(path),
            value,
        }
    }

    pub fn build(self) -> EqualPredicate {
        EqualPredicate {
            base: self.base,
            value: self.value,
        }
    }
}

impl PredicateOptions for EqualBuilder {
    fn base_mut(&mut self) -> &mut BaseOptions {
        &mut self.base
    }
}
