//! Attribute paths and their resolution against the record graph.
//!
//! A path like `author.profile.city` names the associations to traverse
//! (`author`, `profile`) followed by the filtered attribute (`city`). Resolution
//! walks the segments against the [`Schema`](crate::Schema), reusing or creating
//! joins in the [`QueryContext`] as it goes.

use crate::context::QueryContext;
use crate::error::{OrmError, OrmResult};
use crate::expr::ColumnRef;
use crate::operator::JoinKind;
use crate::schema::FieldKind;
use std::fmt;

/// Ordered field-name segments from the root entity to the filtered attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    segments: Vec<String>,
}

impl AttributePath {
    /// Build a path from explicit segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a dotted field name (`author.name`) into segments.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Fail on an empty path or an empty segment.
    pub fn validate(&self) -> OrmResult<()> {
        if self.segments.is_empty() || self.segments.iter().any(String::is_empty) {
            return Err(OrmError::InvalidPath(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Conversion into an [`AttributePath`].
///
/// Strings are split on `.`; slices, arrays and vectors are taken as explicit
/// segment lists.
pub trait IntoPath {
    fn into_path(self) -> AttributePath;
}

impl IntoPath for AttributePath {
    fn into_path(self) -> AttributePath {
        self
    }
}

impl IntoPath for &AttributePath {
    fn into_path(self) -> AttributePath {
        self.clone()
    }
}

impl IntoPath for &str {
    fn into_path(self) -> AttributePath {
        AttributePath::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> AttributePath {
        AttributePath::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> AttributePath {
        AttributePath::parse(self)
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> AttributePath {
        AttributePath::new(self.iter().copied())
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self) -> AttributePath {
        AttributePath::new(self)
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self) -> AttributePath {
        AttributePath::new(self)
    }
}

impl IntoPath for Vec<String> {
    fn into_path(self) -> AttributePath {
        AttributePath::new(self)
    }
}

/// Resolve `path` to a column in `ctx`.
///
/// Association segments descend through an existing join of the same name on the
/// current node, or create one with `join` (as a fetch join when `fetch` is set).
/// An element collection or a scalar ends the walk; any segments after it are
/// ignored. When every segment is an association, the last joined row itself is
/// the target and its primary key is returned.
pub(crate) fn resolve(
    ctx: &mut QueryContext<'_>,
    path: &AttributePath,
    join: JoinKind,
    fetch: bool,
) -> OrmResult<ColumnRef> {
    path.validate()?;
    let schema = ctx.schema();
    let mut node = QueryContext::ROOT;

    for (i, segment) in path.segments().iter().enumerate() {
        let entity = ctx.entity_of(node)?.to_string();
        match schema.field(&entity, segment)? {
            FieldKind::Association(relation) => {
                node = ctx.join_association(node, segment, relation, join, fetch)?;
            }
            FieldKind::ElementCollection {
                table,
                foreign_key,
                column,
            } => {
                warn_ignored(path, i);
                return ctx.join_collection(node, segment, table, foreign_key, column, join);
            }
            FieldKind::Scalar { column } => {
                warn_ignored(path, i);
                return Ok(ColumnRef::new(ctx.alias(node), column.as_str()));
            }
        }
    }

    let entity = ctx.entity_of(node)?;
    let pk = schema.entity(entity)?.require_primary_key()?;
    Ok(ColumnRef::new(ctx.alias(node), pk))
}

fn warn_ignored(path: &AttributePath, terminal: usize) {
    if terminal + 1 < path.len() {
        tracing::debug!(
            target: "pgspec",
            path = %path,
            ignored = path.len() - terminal - 1,
            "path ends at a non-association segment; trailing segments ignored"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_and_explicit_paths_agree() {
        assert_eq!("author.name".into_path(), ["author", "name"].into_path());
        assert_eq!(
            vec!["author".to_string(), "name".to_string()].into_path(),
            AttributePath::new(["author", "name"])
        );
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(AttributePath::parse("a.b.c").to_string(), "a.b.c");
    }

    #[test]
    fn validate_rejects_empty_segments() {
        assert!(AttributePath::parse("").validate().is_err());
        assert!(AttributePath::parse("a..b").validate().is_err());
        assert!(AttributePath::new(Vec::<String>::new()).validate().is_err());
        assert!(AttributePath::parse("a.b").validate().is_ok());
    }
}
