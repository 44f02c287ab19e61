use super::predicate::{BaseOptions, PredicateOptions};
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::Expr;
use crate::operator::Wildcard;
use crate::param::Param;
use crate::path::AttributePath;

/// Fragments whose trimmed length is below this are ignored.
pub const DEFAULT_MIN_CHARS: usize = 3;

/// Pattern match on a text attribute.
#[derive(Debug, Clone)]
pub struct LikePredicate {
    pub(crate) base: BaseOptions,
    pub(crate) value: String,
    pub(crate) ignore_case: bool,
    pub(crate) wildcard: Wildcard,
}

impl LikePredicate {
    /// The pattern bound to the query: case-adjusted, then wildcarded.
    pub fn pattern(&self) -> String {
        if self.ignore_case {
            self.wildcard.apply(&self.value.to_uppercase())
        } else {
            self.wildcard.apply(&self.value)
        }
    }

    pub fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    pub fn wildcard(&self) -> Wildcard {
        self.wildcard
    }

    pub(crate) fn to_expr(&self, ctx: &mut QueryContext<'_>) -> OrmResult<Expr> {
        let column = self.base.resolve(ctx)?;
        Ok(Expr::Like {
            column,
            pattern: Param::new(self.pattern()),
            upper: self.ignore_case,
            negated: self.base.not,
        })
    }
}

/// Builder for [`LikePredicate`].
#[derive(Debug, Clone)]
pub struct LikeBuilder {
    base: BaseOptions,
    value: String,
    ignore_case: bool,
    wildcard: Wildcard,
    min_chars: usize,
}

impl LikeBuilder {
    pub fn new(path: AttributePath, value: impl Into<String>) -> Self {
        Self {
            base: BaseOptions::new(path),
            value: value.into(),
            ignore_case: true,
            wildcard: Wildcard::Absence,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Compare case-sensitively.
    pub fn case_sensitive(self) -> Self {
        self.ignore_case(false)
    }

    pub fn wildcard(mut self, wildcard: Wildcard) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Minimum trimmed length for the fragment to filter at all.
    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Whether the fragment is long enough to be used.
    pub fn is_usable(&self) -> bool {
        let trimmed = self.value.trim();
        !trimmed.is_empty() && trimmed.chars().count() >= self.min_chars
    }

    /// `None` when the fragment is blank or shorter than the threshold.
    pub fn build(self) -> Option<LikePredicate> {
        if !self.is_usable() {
            tracing::debug!(
                target: "pgspec",
                path = %self.base.path,
                min_chars = self.min_chars,
                "like fragment below threshold; skipped"
            );
            return None;
        }
        Some(LikePredicate {
            base: self.base,
            value: self.value,
            ignore_case: self.ignore_case,
            wildcard: self.wildcard,
        })
    }
}

impl PredicateOptions for LikeBuilder {
    fn base_mut(&mut self) -> &mut BaseOptions {
        &mut self.base
    }
}
