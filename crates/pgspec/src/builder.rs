//! Fluent composer that folds optional filters into one [`Specification`].
//!
//! Every filter method takes its value as an `Option`. `None` (and the other
//! empty inputs of each predicate kind) leaves the composer unchanged, so
//! request parameters can be passed straight through:
//!
//! ```ignore
//! use pgspec::prelude::*;
//!
//! let spec = SpecificationBuilder::<Post>::new()
//!     .like_with("title", form.title, |b| b.wildcard(Wildcard::Both))
//!     .equal("author.name", form.author)
//!     .between("published_at", form.from, form.to)
//!     .is_null_if("deleted_at", !form.include_deleted)
//!     .build();
//! ```

use crate::config::BuilderConfig;
use crate::operator::LogicalOperator;
use crate::param::Param;
use crate::path::IntoPath;
use crate::spec::{
    ComparisonBuilder, EqualBuilder, InBuilder, LikeBuilder, NullBuilder, Predicate,
    PredicateOptions, Range, Specification,
};
use std::fmt;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

/// Accumulates predicates and pre-built groups until [`build`](Self::build).
///
/// `build` consumes the composer, so a finalized composer cannot be extended.
pub struct SpecificationBuilder<T> {
    predicates: Vec<Predicate>,
    inner: Vec<(Specification<T>, LogicalOperator)>,
    config: BuilderConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T> SpecificationBuilder<T> {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Start from custom defaults.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            predicates: Vec::new(),
            inner: Vec::new(),
            config,
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Distinct flag stamped onto every top-level predicate at build time.
    ///
    /// The query takes the flag of the last predicate it resolves, and inner
    /// groups resolve after the top-level predicates. A group built with the
    /// default flag therefore turns `DISTINCT` back on even when this builder
    /// says `distinct(false)`. When ordering across a to-many join, build the
    /// inner groups with `distinct(false)` as well.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.config.distinct = distinct;
        self
    }

    /// Number of top-level predicates accepted so far.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.inner.is_empty()
    }

    /// Append an already-built predicate.
    pub fn predicate(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    fn skipped(self, kind: &str, path: &dyn fmt::Display) -> Self {
        tracing::debug!(target: "pgspec", kind, path = %path, "empty filter value; skipped");
        self
    }

    // ==================== Equality ====================

    /// `path = value`.
    pub fn equal<V>(self, path: impl IntoPath, value: Option<V>) -> Self
    where
        V: ToSql + Send + Sync + 'static,
    {
        self.equal_with(path, value, |b| b)
    }

    /// `path = value`, customised by `f`.
    pub fn equal_with<V, F>(self, path: impl IntoPath, value: Option<V>, f: F) -> Self
    where
        V: ToSql + Send + Sync + 'static,
        F: FnOnce(EqualBuilder) -> EqualBuilder,
    {
        let path = path.into_path();
        let Some(value) = value else {
            return self.skipped("equal", &path);
        };
        let builder = EqualBuilder::new(path, Param::new(value)).join(self.config.join);
        self.predicate(f(builder).build())
    }

    /// `path != value`.
    pub fn not_equal<V>(self, path: impl IntoPath, value: Option<V>) -> Self
    where
        V: ToSql + Send + Sync + 'static,
    {
        self.equal_with(path, value, |b| b.not())
    }

    /// `path != value`, customised by `f`.
    pub fn not_equal_with<V, F>(self, path: impl IntoPath, value: Option<V>, f: F) -> Self
    where
        V: ToSql + Send + Sync + 'static,
        F: FnOnce(EqualBuilder) -> EqualBuilder,
    {
        self.equal_with(path, value, |b| f(b.not()))
    }

    // ==================== Membership ====================

    /// `path IN (values...)`. `None` and empty collections are ignored.
    pub fn in_list<I, V>(self, path: impl IntoPath, values: Option<I>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSql + Send + Sync + 'static,
    {
        self.in_list_with(path, values, |b| b)
    }

    pub fn in_list_with<I, V, F>(self, path: impl IntoPath, values: Option<I>, f: F) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSql + Send + Sync + 'static,
        F: FnOnce(InBuilder) -> InBuilder,
    {
        let path = path.into_path();
        let values: Vec<Param> = values
            .into_iter()
            .flatten()
            .map(Param::new)
            .collect();
        if values.is_empty() {
            return self.skipped("in", &path);
        }
        let builder = InBuilder::new(path, values).join(self.config.join);
        match f(builder).build() {
            Some(p) => self.predicate(p),
            None => self,
        }
    }

    // ==================== Pattern ====================

    /// `path LIKE value`, using the configured case and wildcard defaults.
    pub fn like<S>(self, path: impl IntoPath, value: Option<S>) -> Self
    where
        S: AsRef<str>,
    {
        self.like_with(path, value, |b| b)
    }

    pub fn like_with<S, F>(self, path: impl IntoPath, value: Option<S>, f: F) -> Self
    where
        S: AsRef<str>,
        F: FnOnce(LikeBuilder) -> LikeBuilder,
    {
        let path = path.into_path();
        let Some(value) = value.filter(|v| !v.as_ref().trim().is_empty()) else {
            return self.skipped("like", &path);
        };
        let builder = LikeBuilder::new(path, value.as_ref())
            .join(self.config.join)
            .ignore_case(self.config.like_ignore_case)
            .wildcard(self.config.like_wildcard)
            .min_chars(self.config.like_min_chars);
        match f(builder).build() {
            Some(p) => self.predicate(p),
            None => self,
        }
    }

    // ==================== Range ====================

    /// `path >= value`.
    pub fn min<V>(self, path: impl IntoPath, value: Option<V>) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
    {
        self.between_with(path, value, None, |b| b)
    }

    /// Lower bound, customised by `f` (e.g. `|b| b.min_exclusive()`).
    pub fn min_with<V, F>(self, path: impl IntoPath, value: Option<V>, f: F) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
        F: FnOnce(ComparisonBuilder) -> ComparisonBuilder,
    {
        self.between_with(path, value, None, f)
    }

    /// `path <= value`.
    pub fn max<V>(self, path: impl IntoPath, value: Option<V>) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
    {
        self.between_with(path, None, value, |b| b)
    }

    pub fn max_with<V, F>(self, path: impl IntoPath, value: Option<V>, f: F) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
        F: FnOnce(ComparisonBuilder) -> ComparisonBuilder,
    {
        self.between_with(path, None, value, f)
    }

    /// `min <= path <= max`; either side may be `None`.
    pub fn between<V>(self, path: impl IntoPath, min: Option<V>, max: Option<V>) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
    {
        self.between_with(path, min, max, |b| b)
    }

    /// Range filter, customised by `f`.
    ///
    /// See [`ComparisonBuilder`] for how the bounds decide between a single
    /// `BETWEEN` and separate inequalities.
    pub fn between_with<V, F>(
        mut self,
        path: impl IntoPath,
        min: Option<V>,
        max: Option<V>,
        f: F,
    ) -> Self
    where
        V: ToSql + PartialOrd + Send + Sync + 'static,
        F: FnOnce(ComparisonBuilder) -> ComparisonBuilder,
    {
        let path = path.into_path();
        let range = Range::new(min, max);
        if range.is_unbounded() {
            return self.skipped("range", &path);
        }
        let builder = ComparisonBuilder::new(path, range.map(Param::new)).join(self.config.join);
        self.predicates
            .extend(f(builder).build().into_iter().map(Predicate::from));
        self
    }

    // ==================== Null check ====================

    /// `path IS NULL`, through LEFT joins.
    pub fn is_null(self, path: impl IntoPath) -> Self {
        self.is_null_with(path, true, |b| b)
    }

    /// `path IS NULL` when `active`, otherwise nothing.
    pub fn is_null_if(self, path: impl IntoPath, active: bool) -> Self {
        self.is_null_with(path, active, |b| b)
    }

    pub fn is_null_with<F>(self, path: impl IntoPath, active: bool, f: F) -> Self
    where
        F: FnOnce(NullBuilder) -> NullBuilder,
    {
        let path = path.into_path();
        if !active {
            return self.skipped("null", &path);
        }
        self.predicate(f(NullBuilder::new(path)).build())
    }

    /// `path IS NOT NULL`, through LEFT joins.
    pub fn is_not_null(self, path: impl IntoPath) -> Self {
        self.is_not_null_with(path, true, |b| b)
    }

    /// `path IS NOT NULL` when `active`, otherwise nothing.
    pub fn is_not_null_if(self, path: impl IntoPath, active: bool) -> Self {
        self.is_not_null_with(path, active, |b| b)
    }

    pub fn is_not_null_with<F>(self, path: impl IntoPath, active: bool, f: F) -> Self
    where
        F: FnOnce(NullBuilder) -> NullBuilder,
    {
        self.is_null_with(path, active, |b| f(b.not()))
    }

    // ==================== Groups ====================

    /// Fold a pre-built specification in as a parenthesised group.
    ///
    /// `None` is ignored, which lets whole groups be made conditional.
    pub fn inner(
        mut self,
        spec: impl Into<Option<Specification<T>>>,
        op: LogicalOperator,
    ) -> Self {
        if let Some(spec) = spec.into() {
            self.inner.push((spec, op));
        }
        self
    }

    pub fn and_inner(self, spec: impl Into<Option<Specification<T>>>) -> Self {
        self.inner(spec, LogicalOperator::And)
    }

    pub fn or_inner(self, spec: impl Into<Option<Specification<T>>>) -> Self {
        self.inner(spec, LogicalOperator::Or)
    }

    /// Fold everything into one specification.
    ///
    /// Top-level predicates are folded first, left to right, each with its own
    /// connector; then the inner groups in insertion order. With nothing to fold
    /// the result is [`Specification::unrestricted`].
    pub fn build(self) -> Specification<T> {
        let distinct = self.config.distinct;
        let predicates = self.predicates.len();
        let groups = self.inner.len();

        let mut spec = Specification::unrestricted();
        for mut predicate in self.predicates {
            predicate.set_distinct(distinct);
            let op = predicate.connection();
            tracing::trace!(target: "pgspec", path = %predicate.base().path(), ?op, "folding predicate");
            spec = op.connect(spec, Specification::from(predicate));
        }
        for (group, op) in self.inner {
            tracing::trace!(target: "pgspec", ?op, "folding inner group");
            spec = op.connect(spec, group.grouped());
        }

        tracing::debug!(target: "pgspec", predicates, groups, distinct, "built specification");
        spec
    }
}

impl<T> Default for SpecificationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SpecificationBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationBuilder")
            .field("predicates", &self.predicates)
            .field("inner", &self.inner.len())
            .field("config", &self.config)
            .finish()
    }
}
