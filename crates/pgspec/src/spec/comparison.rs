//! Range filters: `min`, `max` and `between`.
//!
//! A [`ComparisonBuilder`] holds an optional lower and upper value, each with
//! its own [`Bound`]. Building it yields either a single `BETWEEN` predicate or
//! up to two independent inequalities:
//!
//! | min | max | min bound | max bound | result                    |
//! |-----|-----|-----------|-----------|---------------------------|
//! | -   | -   | any       | any       | nothing                   |
//! | v   | -   | incl/excl | any       | `>= v` / `> v`            |
//! | -   | w   | any       | incl/excl | `<= w` / `< w`            |
//! | v   | w   | excl      | excl      | `BETWEEN v AND w`         |
//! | v   | w   | incl      | any       | one inequality per side   |
//! | v   | w   | any       | incl      | one inequality per side   |
//!
//! `BETWEEN` is inclusive on both ends, so two exclusive bounds still match the
//! endpoints.
//!
//! A negated two-sided range that would split into two inequalities is kept as
//! one [`ComparisonKind::Span`] so the pair is negated together:
//! `NOT (col >= v AND col <= w)`.

use super::predicate::{BaseOptions, PredicateOptions};
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::{ColumnRef, Expr};
use crate::param::Param;
use crate::path::AttributePath;

/// An immutable pair of optional bounds. `None` means unbounded on that side.
///
/// `min <= max` is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Range<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    /// Neither side is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Range<U> {
        Range {
            min: self.min.map(&mut f),
            max: self.max.map(&mut f),
        }
    }
}

/// Comparison operator of a single-sided range predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Sign {
    pub fn as_sql(self) -> &'static str {
        match self {
            Sign::GreaterThan => ">",
            Sign::GreaterThanOrEqual => ">=",
            Sign::LessThan => "<",
            Sign::LessThanOrEqual => "<=",
        }
    }

    /// Lower-bound signs compare against `min`, upper-bound signs against `max`.
    fn operand(self, range: &Range<Param>) -> Option<&Param> {
        match self {
            Sign::GreaterThan | Sign::GreaterThanOrEqual => range.min(),
            Sign::LessThan | Sign::LessThanOrEqual => range.max(),
        }
    }
}

/// Whether a range side includes its endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bound {
    #[default]
    Inclusive,
    Exclusive,
}

impl Bound {
    fn lower_sign(self) -> Sign {
        match self {
            Bound::Inclusive => Sign::GreaterThanOrEqual,
            Bound::Exclusive => Sign::GreaterThan,
        }
    }

    fn upper_sign(self) -> Sign {
        match self {
            Bound::Inclusive => Sign::LessThanOrEqual,
            Bound::Exclusive => Sign::LessThan,
        }
    }

    /// Lower-bound inequality for `builder`'s min value.
    pub fn min(self, builder: &ComparisonBuilder) -> ComparisonPredicate {
        builder.inequality(self.lower_sign())
    }

    /// Upper-bound inequality for `builder`'s max value.
    pub fn max(self, builder: &ComparisonBuilder) -> ComparisonPredicate {
        builder.inequality(self.upper_sign())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    Inequality(Sign),
    Between,
    /// Both inequalities on one column, rendered as a single conjunction.
    Span { lower: Sign, upper: Sign },
}

/// A range predicate on one attribute.
#[derive(Debug, Clone)]
pub struct ComparisonPredicate {
    pub(crate) base: BaseOptions,
    pub(crate) range: Range<Param>,
    pub(crate) kind: ComparisonKind,
}

impl ComparisonPredicate {
    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    pub fn range(&self) -> &Range<Param> {
        &self.range
    }

    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        let column = self.base.resolve(ctx)?;
        let expr = match self.kind {
            ComparisonKind::Between => {
                let (Some(from), Some(to)) = (self.range.min(), self.range.max()) else {
                    return Ok(Expr::True);
                };
                return Ok(Expr::Between {
                    column,
                    from: from.clone(),
                    to: to.clone(),
                    negated: self.base.not,
                });
            }
            ComparisonKind::Inequality(sign) => match sign.operand(&self.range) {
                Some(value) => compare(column, sign, value),
                None => return Ok(Expr::True),
            },
            ComparisonKind::Span { lower, upper } => {
                let (Some(from), Some(to)) = (lower.operand(&self.range), upper.operand(&self.range))
                else {
                    return Ok(Expr::True);
                };
                Expr::And(vec![compare(column.clone(), lower, from), compare(column, upper, to)])
            }
        };
        Ok(if self.base.not { expr.negate() } else { expr })
    }
}

fn compare(column: ColumnRef, sign: Sign, value: &Param) -> Expr {
    Expr::Compare {
        column,
        op: sign.as_sql(),
        value: value.clone(),
    }
}

/// Builder for range predicates.
#[derive(Debug, Clone)]
pub struct ComparisonBuilder {
    base: BaseOptions,
    range: Range<Param>,
    min_bound: Bound,
    max_bound: Bound,
}

impl ComparisonBuilder {
    pub fn new(path: AttributePath, range: Range<Param>) -> Self {
        Self {
            base: BaseOptions::new(path),
            range,
            min_bound: Bound::Inclusive,
            max_bound: Bound::Inclusive,
        }
    }

    pub fn min_bound(mut self, bound: Bound) -> Self {
        self.min_bound = bound;
        self
    }

    pub fn max_bound(mut self, bound: Bound) -> Self {
        self.max_bound = bound;
        self
    }

    /// Shorthand for `min_bound(Bound::Exclusive)`.
    pub fn min_exclusive(self) -> Self {
        self.min_bound(Bound::Exclusive)
    }

    /// Shorthand for `max_bound(Bound::Exclusive)`.
    pub fn max_exclusive(self) -> Self {
        self.max_bound(Bound::Exclusive)
    }

    /// Whether building yields a single `BETWEEN` predicate.
    pub fn is_between(&self) -> bool {
        self.range.is_closed()
            && self.min_bound != Bound::Inclusive
            && self.max_bound != Bound::Inclusive
    }

    fn inequality(&self, sign: Sign) -> ComparisonPredicate {
        ComparisonPredicate {
            base: self.base.clone(),
            range: self.range.clone(),
            kind: ComparisonKind::Inequality(sign),
        }
    }

    /// Zero, one or two predicates depending on which sides are set.
    pub fn build(self) -> Vec<ComparisonPredicate> {
        if self.is_between() {
            return vec![ComparisonPredicate {
                base: self.base,
                range: self.range,
                kind: ComparisonKind::Between,
            }];
        }
        if self.base.not && self.range.is_closed() {
            return vec![ComparisonPredicate {
                kind: ComparisonKind::Span {
                    lower: self.min_bound.lower_sign(),
                    upper: self.max_bound.upper_sign(),
                },
                base: self.base,
                range: self.range,
            }];
        }
        let mut out = Vec::with_capacity(2);
        if self.range.min().is_some() {
            out.push(self.min_bound.min(&self));
        }
        if self.range.max().is_some() {
            out.push(self.max_bound.max(&self));
        }
        out
    }
}

impl PredicateOptions for ComparisonBuilder {
    fn base_mut(&mut self) -> &mut BaseOptions {
        &mut self.base
    }
}
