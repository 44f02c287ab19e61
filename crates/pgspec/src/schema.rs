//! Record-graph metadata consumed by the path resolver.
//!
//! The resolver never inspects Rust types at runtime. Instead every record type
//! describes itself once through [`EntityMeta`] (by hand or via `#[derive(Entity)]`)
//! and the metadata is looked up through the [`Schema`] trait.
//!
//! # Example
//!
//! ```ignore
//! use pgspec::{EntityMeta, SchemaRegistry};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register_entity(
//!     EntityMeta::new("User", "users")
//!         .primary_key("id")
//!         .column("username")
//!         .has_many("posts", "Post", "author_id"),
//! )?;
//! # Ok::<(), pgspec::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};
use crate::ident;
use std::collections::HashMap;

/// Implemented by record types that can be the root of a specification.
///
/// Usually generated by `#[derive(Entity)]`.
pub trait Entity {
    /// Name the entity is registered under.
    fn entity_name() -> &'static str;

    /// Full metadata of the entity.
    fn entity_meta() -> EntityMeta;
}

/// Shape of an association between two entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// To-one, the foreign key lives on this entity's table.
    BelongsTo { target: String, foreign_key: String },
    /// To-one, the foreign key lives on the target's table.
    HasOne { target: String, foreign_key: String },
    /// To-many, the foreign key lives on the target's table.
    HasMany { target: String, foreign_key: String },
    /// To-many through a link table.
    ManyToMany {
        target: String,
        through: String,
        self_key: String,
        other_key: String,
    },
}

impl Relation {
    /// Entity on the far side of the association.
    pub fn target(&self) -> &str {
        match self {
            Relation::BelongsTo { target, .. }
            | Relation::HasOne { target, .. }
            | Relation::HasMany { target, .. }
            | Relation::ManyToMany { target, .. } => target,
        }
    }

    /// Whether following this association can fan out rows.
    pub fn is_to_many(&self) -> bool {
        matches!(self, Relation::HasMany { .. } | Relation::ManyToMany { .. })
    }
}

/// What a field name resolves to on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain column.
    Scalar { column: String },
    /// Related entity (to-one or to-many).
    Association(Relation),
    /// Collection of scalar values stored in a side table.
    ElementCollection {
        table: String,
        foreign_key: String,
        column: String,
    },
}

/// Metadata for one record type.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    name: String,
    table: String,
    primary_key: Option<String>,
    fields: HashMap<String, FieldKind>,
}

impl EntityMeta {
    /// Create metadata for entity `name` stored in `table`.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: None,
            fields: HashMap::new(),
        }
    }

    /// Set the primary-key column.
    ///
    /// A scalar field named after the column is added unless some field
    /// already maps to it.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        let mapped = self
            .fields
            .values()
            .any(|kind| matches!(kind, FieldKind::Scalar { column: c } if *c == column));
        if !mapped {
            self.fields
                .entry(column.clone())
                .or_insert_with(|| FieldKind::Scalar {
                    column: column.clone(),
                });
        }
        self.primary_key = Some(column);
        self
    }

    /// Add a scalar field whose column has the same name.
    pub fn column(self, field: impl Into<String>) -> Self {
        let field = field.into();
        let column = field.clone();
        self.column_as(field, column)
    }

    /// Add a scalar field mapped to a differently named column.
    pub fn column_as(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.insert(
            field.into(),
            FieldKind::Scalar {
                column: column.into(),
            },
        );
        self
    }

    /// Add a to-one association whose foreign key is on this table.
    pub fn belongs_to(
        self,
        field: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relation(
            field,
            Relation::BelongsTo {
                target: target.into(),
                foreign_key: foreign_key.into(),
            },
        )
    }

    /// Add a to-one association whose foreign key is on the target table.
    pub fn has_one(
        self,
        field: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relation(
            field,
            Relation::HasOne {
                target: target.into(),
                foreign_key: foreign_key.into(),
            },
        )
    }

    /// Add a to-many association whose foreign key is on the target table.
    pub fn has_many(
        self,
        field: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relation(
            field,
            Relation::HasMany {
                target: target.into(),
                foreign_key: foreign_key.into(),
            },
        )
    }

    /// Add a to-many association through the link table `through`.
    pub fn many_to_many(
        self,
        field: impl Into<String>,
        target: impl Into<String>,
        through: impl Into<String>,
        self_key: impl Into<String>,
        other_key: impl Into<String>,
    ) -> Self {
        self.relation(
            field,
            Relation::ManyToMany {
                target: target.into(),
                through: through.into(),
                self_key: self_key.into(),
                other_key: other_key.into(),
            },
        )
    }

    /// Add a collection of scalar values stored in `table.column`, keyed by `foreign_key`.
    pub fn element_collection(
        mut self,
        field: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.fields.insert(
            field.into(),
            FieldKind::ElementCollection {
                table: table.into(),
                foreign_key: foreign_key.into(),
                column: column.into(),
            },
        );
        self
    }

    fn relation(mut self, field: impl Into<String>, relation: Relation) -> Self {
        self.fields
            .insert(field.into(), FieldKind::Association(relation));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key_column(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Primary key, or [`OrmError::MissingPrimaryKey`].
    pub fn require_primary_key(&self) -> OrmResult<&str> {
        self.primary_key
            .as_deref()
            .ok_or_else(|| OrmError::MissingPrimaryKey(self.name.clone()))
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldKind> {
        self.fields.get(name)
    }

    /// All fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldKind)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check that every table and column name is a safe SQL identifier.
    pub fn validate(&self) -> OrmResult<()> {
        ident::validate_qualified(&self.table)?;
        if let Some(pk) = &self.primary_key {
            ident::validate_part(pk)?;
        }
        for kind in self.fields.values() {
            match kind {
                FieldKind::Scalar { column } => ident::validate_part(column)?,
                FieldKind::Association(Relation::BelongsTo { foreign_key, .. })
                | FieldKind::Association(Relation::HasOne { foreign_key, .. })
                | FieldKind::Association(Relation::HasMany { foreign_key, .. }) => {
                    ident::validate_part(foreign_key)?
                }
                FieldKind::Association(Relation::ManyToMany {
                    through,
                    self_key,
                    other_key,
                    ..
                }) => {
                    ident::validate_qualified(through)?;
                    ident::validate_part(self_key)?;
                    ident::validate_part(other_key)?;
                }
                FieldKind::ElementCollection {
                    table,
                    foreign_key,
                    column,
                } => {
                    ident::validate_qualified(table)?;
                    ident::validate_part(foreign_key)?;
                    ident::validate_part(column)?;
                }
            }
        }
        Ok(())
    }
}

/// Schema metadata capability injected into path resolution.
///
/// Implementations must reflect the true shape of the record graph; any failure
/// they return is surfaced to the caller unmodified.
pub trait Schema {
    /// Look up an entity by name.
    fn entity(&self, name: &str) -> OrmResult<&EntityMeta>;

    /// Look up a field of an entity.
    fn field(&self, entity: &str, field: &str) -> OrmResult<&FieldKind> {
        self.entity(entity)?
            .field(field)
            .ok_or_else(|| OrmError::unknown_field(entity, field))
    }

    /// Whether `field` is a to-one or to-many association.
    fn is_association(&self, entity: &str, field: &str) -> OrmResult<bool> {
        Ok(matches!(
            self.field(entity, field)?,
            FieldKind::Association(_)
        ))
    }

    /// Whether `field` is a collection of scalar values.
    fn is_element_collection(&self, entity: &str, field: &str) -> OrmResult<bool> {
        Ok(matches!(
            self.field(entity, field)?,
            FieldKind::ElementCollection { .. }
        ))
    }
}

/// In-memory [`Schema`] built from registered entities.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntityMeta>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type.
    pub fn register<T: Entity>(&mut self) -> OrmResult<()> {
        self.register_entity(T::entity_meta())
    }

    /// Register entity metadata directly. Later registrations replace earlier ones.
    pub fn register_entity(&mut self, meta: EntityMeta) -> OrmResult<()> {
        meta.validate()?;
        self.entities.insert(meta.name.clone(), meta);
        Ok(())
    }

    /// Check if an entity is registered.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Get the number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Schema for SchemaRegistry {
    fn entity(&self, name: &str) -> OrmResult<&EntityMeta> {
        self.entities
            .get(name)
            .ok_or_else(|| OrmError::UnknownEntity(name.to_string()))
    }
}
