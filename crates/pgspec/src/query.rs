//! Executable form of a resolved specification.

use crate::client::GenericClient;
use crate::context::QueryContext;
use crate::error::OrmResult;
use crate::expr::{ColumnRef, Expr};
use crate::operator::JoinKind;
use crate::param::ParamList;
use crate::path::{self, IntoPath};
use crate::row::{FromRow, RowExt};
use tokio_postgres::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Asc,
    Desc,
}

/// A SELECT over the root entity's table with the joins and WHERE clause a
/// specification resolved to.
///
/// Ordering paths are resolved through the same join registry, so ordering by
/// `author.name` after filtering on `author.email` reuses the existing join.
/// Postgres rejects `SELECT DISTINCT` combined with an ORDER BY expression that
/// is not in the select list; use `distinct(false)` on the builder when ordering
/// through an association.
#[derive(Debug)]
pub struct SpecQuery<'s> {
    ctx: QueryContext<'s>,
    filter: Option<Expr>,
    order: Vec<(ColumnRef, Direction)>,
}

impl<'s> SpecQuery<'s> {
    pub(crate) fn new(ctx: QueryContext<'s>, filter: Option<Expr>) -> Self {
        Self {
            ctx,
            filter,
            order: Vec::new(),
        }
    }

    /// Whether rows are deduplicated.
    pub fn is_distinct(&self) -> bool {
        self.ctx.is_distinct()
    }

    /// Number of joins added while resolving paths.
    pub fn join_count(&self) -> usize {
        self.ctx.join_count()
    }

    /// Whether the query has a WHERE clause.
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn order_by_asc(self, path: impl IntoPath) -> OrmResult<Self> {
        self.order_by(path, Direction::Asc)
    }

    pub fn order_by_desc(self, path: impl IntoPath) -> OrmResult<Self> {
        self.order_by(path, Direction::Desc)
    }

    fn order_by(mut self, path: impl IntoPath, direction: Direction) -> OrmResult<Self> {
        let path = path.into_path();
        let column = path::resolve(&mut self.ctx, &path, JoinKind::Left, false)?;
        self.order.push((column, direction));
        Ok(self)
    }

    fn render_select(&self, params: &mut ParamList, with_order: bool) -> String {
        let mut sql = String::from("SELECT ");
        if self.ctx.is_distinct() {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.ctx.select_list());
        sql.push_str(" FROM ");
        sql.push_str(self.ctx.root_table());
        sql.push(' ');
        sql.push_str(self.ctx.root_alias());
        sql.push_str(&self.ctx.joins_sql());

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.build(params));
        }

        if with_order && !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|(column, direction)| match direction {
                    Direction::Asc => format!("{column} ASC"),
                    Direction::Desc => format!("{column} DESC"),
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }
        sql
    }

    /// Render the SELECT statement and its bind values.
    pub fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let sql = self.render_select(&mut params, true);
        (sql, params)
    }

    /// Render only the SQL text.
    pub fn to_sql(&self) -> String {
        self.build().0
    }

    /// Bind values in placeholder order.
    pub fn params(&self) -> ParamList {
        self.build().1
    }

    /// Render a `COUNT(*)` over the same rows, ignoring ordering.
    pub fn build_count(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let inner = self.render_select(&mut params, false);
        (format!("SELECT COUNT(*) FROM ({inner}) AS q"), params)
    }

    /// Execute and return raw rows.
    pub async fn query(&self, conn: &impl GenericClient) -> OrmResult<Vec<Row>> {
        let (sql, params) = self.build();
        tracing::debug!(target: "pgspec", sql = %sql, params = params.len(), "executing specification query");
        conn.query(&sql, &params.as_refs()).await
    }

    /// Execute and map every row with [`FromRow`].
    pub async fn fetch_all<R: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<Vec<R>> {
        self.query(conn).await?.iter().map(R::from_row).collect()
    }

    /// Execute and map the first row, failing with `NotFound` when there is none.
    pub async fn fetch_one<R: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<R> {
        let (sql, params) = self.build();
        tracing::debug!(target: "pgspec", sql = %sql, params = params.len(), "executing specification query");
        let row = conn.query_one(&sql, &params.as_refs()).await?;
        R::from_row(&row)
    }

    /// Execute and map the first row, if any.
    pub async fn fetch_opt<R: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<Option<R>> {
        let (sql, params) = self.build();
        tracing::debug!(target: "pgspec", sql = %sql, params = params.len(), "executing specification query");
        conn.query_opt(&sql, &params.as_refs())
            .await?
            .as_ref()
            .map(R::from_row)
            .transpose()
    }

    /// Count matching rows.
    pub async fn count(&self, conn: &impl GenericClient) -> OrmResult<i64> {
        let (sql, params) = self.build_count();
        tracing::debug!(target: "pgspec", sql = %sql, params = params.len(), "executing count query");
        let row = conn.query_one(&sql, &params.as_refs()).await?;
        row.try_get_column("count")
    }
}
