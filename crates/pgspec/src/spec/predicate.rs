use super::comparison::ComparisonPredicate;
use super::equal::EqualPredicate;
use super::in_list::InPredicate;
use super::like::LikePredicate;
use super::null::NullPredicate;
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::{ColumnRef, Expr};
use crate::operator::{JoinKind, LogicalOperator};
use crate::path::{self, AttributePath};

/// Options shared by every predicate kind.
#[derive(Debug, Clone)]
pub struct BaseOptions {
    pub(crate) path: AttributePath,
    pub(crate) connection: LogicalOperator,
    pub(crate) not: bool,
    pub(crate) join: JoinKind,
    pub(crate) fetch: bool,
    pub(crate) distinct: bool,
}

impl BaseOptions {
    pub fn new(path: AttributePath) -> Self {
        Self {
            path,
            connection: LogicalOperator::And,
            not: false,
            join: JoinKind::Inner,
            fetch: false,
            distinct: true,
        }
    }

    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    pub fn connection(&self) -> LogicalOperator {
        self.connection
    }

    pub fn is_negated(&self) -> bool {
        self.not
    }

    pub fn join(&self) -> JoinKind {
        self.join
    }

    pub fn is_fetch(&self) -> bool {
        self.fetch
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Resolve the path to a column, recording this predicate's distinct flag.
    ///
    /// The flag is stamped from [`SpecificationBuilder::distinct`](crate::SpecificationBuilder::distinct)
    /// when the predicate is folded, so it is not a per-predicate option.
    pub(crate) fn resolve(&self, ctx: &mut QueryContext<'_>) -> OrmResult<ColumnRef> {
        ctx.set_distinct(self.distinct);
        path::resolve(ctx, &self.path, self.join, self.fetch)
    }
}

/// Fluent options available on every predicate builder.
///
/// Builders are handed to the customisation closures of
/// [`SpecificationBuilder`](crate::SpecificationBuilder), e.g.
/// `.equal_with("author.name", name, |b| b.join(JoinKind::Left).not())`.
pub trait PredicateOptions: Sized {
    fn base_mut(&mut self) -> &mut BaseOptions;

    /// Connector used to fold the predicate into the running composite.
    fn connection(mut self, op: LogicalOperator) -> Self {
        self.base_mut().connection = op;
        self
    }

    /// Shorthand for `connection(LogicalOperator::Or)`.
    fn or(self) -> Self {
        self.connection(LogicalOperator::Or)
    }

    /// Join kind used when the path crosses associations.
    fn join(mut self, kind: JoinKind) -> Self {
        self.base_mut().join = kind;
        self
    }

    /// Load the related rows crossed by the path.
    fn fetch(mut self) -> Self {
        self.base_mut().fetch = true;
        self
    }

    /// Negate the predicate.
    fn not(mut self) -> Self {
        self.base_mut().not = true;
        self
    }
}

/// A single attribute filter.
#[derive(Debug, Clone)]
pub enum Predicate {
    Equal(EqualPredicate),
    Comparison(ComparisonPredicate),
    Like(LikePredicate),
    In(InPredicate),
    Null(NullPredicate),
}

impl Predicate {
    pub fn base(&self) -> &BaseOptions {
        match self {
            Predicate::Equal(p) => &p.base,
            Predicate::Comparison(p) => &p.base,
            Predicate::Like(p) => &p.base,
            Predicate::In(p) => &p.base,
            Predicate::Null(p) => &p.base,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut BaseOptions {
        match self {
            Predicate::Equal(p) => &mut p.base,
            Predicate::Comparison(p) => &mut p.base,
            Predicate::Like(p) => &mut p.base,
            Predicate::In(p) => &mut p.base,
            Predicate::Null(p) => &mut p.base,
        }
    }

    pub fn connection(&self) -> LogicalOperator {
        self.base().connection
    }

    pub(crate) fn set_distinct(&mut self, distinct: bool) {
        self.base_mut().distinct = distinct;
    }

    /// Resolve against `ctx`, adding any joins the path needs.
    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        match self {
            Predicate::Equal(p) => p.to_expr(ctx),
            Predicate::Comparison(p) => p.to_expr(ctx),
            Predicate::Like(p) => p.to_expr(ctx),
            Predicate::In(p) => p.to_expr(ctx),
            Predicate::Null(p) => p.to_expr(ctx),
        }
    }
}

macro_rules! impl_from_predicate {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Predicate {
                fn from(p: $ty) -> Self {
                    Predicate::$variant(p)
                }
            }
        )*
    };
}

impl_from_predicate!(
    EqualPredicate => Equal,
    ComparisonPredicate => Comparison,
    LikePredicate => Like,
    InPredicate => In,
    NullPredicate => Null,
);
