//! Per-query resolution state: root alias, join registry and the distinct flag.

use crate::error::{OrmError, OrmResult};
use crate::expr::ColumnRef;
use crate::ident;
use crate::operator::JoinKind;
use crate::schema::{Relation, Schema};

#[derive(Debug, Clone)]
struct JoinNode {
    parent: Option<usize>,
    /// Field name on the parent that produced this join.
    attribute: String,
    /// Entity behind the alias; `None` for element-collection tables.
    entity: Option<String>,
    alias: String,
    /// Dotted attribute path from the root, used to label fetched rows.
    path: String,
    fetch: bool,
    /// Rendered `JOIN ... ON ...` clause(s).
    clause: String,
}

/// Resolution context for one query.
///
/// Joins form a tree rooted at the queried entity. Association joins are
/// reused when a later path crosses the same attribute from the same node, so
/// `author.name` and `author.email` share one `JOIN`.
pub struct QueryContext<'s> {
    schema: &'s dyn Schema,
    root_table: String,
    nodes: Vec<JoinNode>,
    aliases: usize,
    distinct: bool,
}

impl<'s> QueryContext<'s> {
    pub(crate) const ROOT: usize = 0;

    /// Create a context rooted at `entity`.
    pub fn new(schema: &'s dyn Schema, entity: &str) -> OrmResult<Self> {
        let meta = schema.entity(entity)?;
        Ok(Self {
            schema,
            root_table: meta.table().to_string(),
            nodes: vec![JoinNode {
                parent: None,
                attribute: String::new(),
                entity: Some(meta.name().to_string()),
                alias: "t0".to_string(),
                path: String::new(),
                fetch: false,
                clause: String::new(),
            }],
            aliases: 1,
            distinct: false,
        })
    }

    pub fn schema(&self) -> &'s dyn Schema {
        self.schema
    }

    pub fn root_alias(&self) -> &str {
        &self.nodes[Self::ROOT].alias
    }

    pub fn root_table(&self) -> &str {
        &self.root_table
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    /// Number of joined nodes, excluding the root.
    pub fn join_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn alias(&self, node: usize) -> &str {
        &self.nodes[node].alias
    }

    pub(crate) fn entity_of(&self, node: usize) -> OrmResult<&str> {
        let node = &self.nodes[node];
        node.entity.as_deref().ok_or_else(|| {
            OrmError::InvalidPath(format!("'{}' is not an entity association", node.path))
        })
    }

    fn next_alias(&mut self) -> String {
        let alias = format!("t{}", self.aliases);
        self.aliases += 1;
        alias
    }

    fn child_path(&self, parent: usize, attribute: &str) -> String {
        let base = &self.nodes[parent].path;
        if base.is_empty() {
            attribute.to_string()
        } else {
            format!("{base}.{attribute}")
        }
    }

    fn find_association(&self, parent: usize, attribute: &str) -> Option<usize> {
        self.nodes.iter().position(|n| {
            n.parent == Some(parent) && n.entity.is_some() && n.attribute == attribute
        })
    }

    /// Find or create the join for `attribute` on `parent`.
    ///
    /// An existing join keeps its original join kind. Requesting a fetch on a
    /// plain join upgrades it so the related row is loaded.
    pub(crate) fn join_association(
        &mut self,
        parent: usize,
        attribute: &str,
        relation: &Relation,
        kind: JoinKind,
        fetch: bool,
    ) -> OrmResult<usize> {
        if let Some(existing) = self.find_association(parent, attribute) {
            if fetch && !self.nodes[existing].fetch {
                self.nodes[existing].fetch = true;
            }
            tracing::debug!(
                target: "pgspec",
                attribute,
                alias = %self.nodes[existing].alias,
                "reusing join"
            );
            return Ok(existing);
        }

        let schema = self.schema;
        let parent_alias = self.nodes[parent].alias.clone();
        let parent_meta = schema.entity(self.entity_of(parent)?)?;
        let target_meta = schema.entity(relation.target())?;
        let alias = self.next_alias();
        let join = kind.as_sql();

        let mut clause = String::new();
        match relation {
            Relation::BelongsTo { foreign_key, .. } => {
                let target_pk = target_meta.require_primary_key()?;
                clause.push_str(&format!(
                    "{join} {} {alias} ON {alias}.{target_pk} = {parent_alias}.{foreign_key}",
                    target_meta.table()
                ));
            }
            Relation::HasOne { foreign_key, .. } | Relation::HasMany { foreign_key, .. } => {
                let parent_pk = parent_meta.require_primary_key()?;
                clause.push_str(&format!(
                    "{join} {} {alias} ON {alias}.{foreign_key} = {parent_alias}.{parent_pk}",
                    target_meta.table()
                ));
            }
            Relation::ManyToMany {
                through,
                self_key,
                other_key,
                ..
            } => {
                let parent_pk = parent_meta.require_primary_key()?;
                let target_pk = target_meta.require_primary_key()?;
                let link = self.next_alias();
                clause.push_str(&format!(
                    "{join} {through} {link} ON {link}.{self_key} = {parent_alias}.{parent_pk} \
                     {join} {} {alias} ON {alias}.{target_pk} = {link}.{other_key}",
                    target_meta.table()
                ));
            }
        }

        let path = self.child_path(parent, attribute);
        tracing::debug!(target: "pgspec", path = %path, alias = %alias, ?kind, fetch, "adding join");
        self.nodes.push(JoinNode {
            parent: Some(parent),
            attribute: attribute.to_string(),
            entity: Some(target_meta.name().to_string()),
            alias,
            path,
            fetch,
            clause,
        });
        Ok(self.nodes.len() - 1)
    }

    /// Join an element-collection table and return its value column.
    ///
    /// Every call creates a fresh join, so two predicates on the same collection
    /// may match different elements.
    pub(crate) fn join_collection(
        &mut self,
        parent: usize,
        attribute: &str,
        table: &str,
        foreign_key: &str,
        column: &str,
        kind: JoinKind,
    ) -> OrmResult<ColumnRef> {
        let parent_alias = self.nodes[parent].alias.clone();
        let parent_pk = self
            .schema
            .entity(self.entity_of(parent)?)?
            .require_primary_key()?
            .to_string();
        let alias = self.next_alias();
        let clause = format!(
            "{} {table} {alias} ON {alias}.{foreign_key} = {parent_alias}.{parent_pk}",
            kind.as_sql()
        );
        let path = self.child_path(parent, attribute);
        tracing::debug!(target: "pgspec", path = %path, alias = %alias, "adding collection join");
        self.nodes.push(JoinNode {
            parent: Some(parent),
            attribute: attribute.to_string(),
            entity: None,
            alias: alias.clone(),
            path,
            fetch: false,
            clause,
        });
        Ok(ColumnRef::new(alias, column))
    }

    /// All join clauses in creation order, each prefixed by a space.
    pub(crate) fn joins_sql(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes[1..] {
            out.push(' ');
            out.push_str(&node.clause);
        }
        out
    }

    /// Select list: the root row plus one JSON column per fetch join.
    pub(crate) fn select_list(&self) -> String {
        let mut out = format!("{}.*", self.root_alias());
        for node in self.nodes.iter().filter(|n| n.fetch) {
            out.push_str(&format!(", to_jsonb({}.*) AS ", node.alias));
            ident::write_quoted(&mut out, &node.path);
        }
        out
    }
}

impl std::fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("root_table", &self.root_table)
            .field("joins", &self.join_count())
            .field("distinct", &self.distinct)
            .finish()
    }
}
