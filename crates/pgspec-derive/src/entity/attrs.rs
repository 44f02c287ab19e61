//! Attribute parsing for the Entity derive macro.
//!
//! Handles struct-level and field-level `#[orm(...)]` attributes.

use heck::ToSnakeCase;
use syn::meta::ParseNestedMeta;
use syn::{DeriveInput, LitStr, Result};

/// Shape of a declared relation.
pub(super) enum RelationKind {
    BelongsTo {
        foreign_key: String,
    },
    HasOne {
        foreign_key: String,
    },
    HasMany {
        foreign_key: String,
    },
    ManyToMany {
        through: String,
        self_key: String,
        other_key: String,
    },
}

/// An association declared on the struct.
pub(super) struct RelationAttr {
    /// The related entity type (e.g., User)
    pub model: syn::Path,
    /// Field name used in attribute paths (e.g., "author")
    pub name: String,
    pub kind: RelationKind,
}

/// A collection of scalar values in a side table.
pub(super) struct CollectionAttr {
    pub name: String,
    pub table: String,
    pub foreign_key: String,
    pub column: String,
}

/// Everything declared at struct level.
#[derive(Default)]
pub(super) struct StructAttrs {
    pub table: Option<String>,
    pub name: Option<String>,
    pub relations: Vec<RelationAttr>,
    pub collections: Vec<CollectionAttr>,
}

/// Field-level attributes.
#[derive(Default)]
pub(super) struct FieldAttrs {
    pub is_id: bool,
    pub column: Option<String>,
    pub skip: bool,
}

fn lit(meta: &ParseNestedMeta) -> Result<String> {
    Ok(meta.value()?.parse::<LitStr>()?.value())
}

/// Collected `key = "value"` pairs plus the leading model path of a relation.
#[derive(Default)]
struct RelationArgs {
    model: Option<syn::Path>,
    name: Option<String>,
    foreign_key: Option<String>,
    through: Option<String>,
    self_key: Option<String>,
    other_key: Option<String>,
    table: Option<String>,
    column: Option<String>,
}

impl RelationArgs {
    fn parse(meta: &ParseNestedMeta) -> Result<Self> {
        let mut args = RelationArgs::default();
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("name") || inner.path.is_ident("as") {
                args.name = Some(lit(&inner)?);
            } else if inner.path.is_ident("foreign_key") {
                args.foreign_key = Some(lit(&inner)?);
            } else if inner.path.is_ident("through") {
                args.through = Some(lit(&inner)?);
            } else if inner.path.is_ident("self_key") {
                args.self_key = Some(lit(&inner)?);
            } else if inner.path.is_ident("other_key") {
                args.other_key = Some(lit(&inner)?);
            } else if inner.path.is_ident("table") {
                args.table = Some(lit(&inner)?);
            } else if inner.path.is_ident("column") {
                args.column = Some(lit(&inner)?);
            } else if args.model.is_none() && !inner.input.peek(syn::Token![=]) {
                args.model = Some(inner.path.clone());
            } else {
                return Err(inner.error("unsupported relation argument"));
            }
            Ok(())
        })?;
        Ok(args)
    }

    fn require(value: Option<String>, meta: &ParseNestedMeta, what: &str) -> Result<String> {
        value.ok_or_else(|| meta.error(format!("missing {what} = \"...\"")))
    }

    fn into_relation(self, meta: &ParseNestedMeta, plural: bool) -> Result<RelationAttr> {
        let model = self
            .model
            .ok_or_else(|| meta.error("expected the related entity type first"))?;
        let name = match self.name {
            Some(name) => name,
            None => {
                let last = model
                    .segments
                    .last()
                    .map(|s| s.ident.to_string())
                    .unwrap_or_default();
                let snake = last.to_snake_case();
                if plural { format!("{snake}s") } else { snake }
            }
        };

        let kind = if meta.path.is_ident("belongs_to") {
            RelationKind::BelongsTo {
                foreign_key: Self::require(self.foreign_key, meta, "foreign_key")?,
            }
        } else if meta.path.is_ident("has_one") {
            RelationKind::HasOne {
                foreign_key: Self::require(self.foreign_key, meta, "foreign_key")?,
            }
        } else if meta.path.is_ident("has_many") {
            RelationKind::HasMany {
                foreign_key: Self::require(self.foreign_key, meta, "foreign_key")?,
            }
        } else {
            RelationKind::ManyToMany {
                through: Self::require(self.through, meta, "through")?,
                self_key: Self::require(self.self_key, meta, "self_key")?,
                other_key: Self::require(self.other_key, meta, "other_key")?,
            }
        };

        Ok(RelationAttr { model, name, kind })
    }

    fn into_collection(self, meta: &ParseNestedMeta) -> Result<CollectionAttr> {
        Ok(CollectionAttr {
            name: Self::require(self.name, meta, "name")?,
            table: Self::require(self.table, meta, "table")?,
            foreign_key: Self::require(self.foreign_key, meta, "foreign_key")?,
            column: Self::require(self.column, meta, "column")?,
        })
    }
}

/// Parse all struct-level `#[orm(...)]` attributes.
pub(super) fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                out.table = Some(lit(&meta)?);
            } else if meta.path.is_ident("name") {
                out.name = Some(lit(&meta)?);
            } else if meta.path.is_ident("belongs_to") || meta.path.is_ident("has_one") {
                let rel = RelationArgs::parse(&meta)?.into_relation(&meta, false)?;
                out.relations.push(rel);
            } else if meta.path.is_ident("has_many") || meta.path.is_ident("many_to_many") {
                let rel = RelationArgs::parse(&meta)?.into_relation(&meta, true)?;
                out.relations.push(rel);
            } else if meta.path.is_ident("element_collection") {
                let coll = RelationArgs::parse(&meta)?.into_collection(&meta)?;
                out.collections.push(coll);
            } else {
                return Err(meta.error("unsupported orm attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Parse `#[orm(id)]`, `#[orm(column = "...")]` and `#[orm(skip)]` on a field.
pub(super) fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                out.is_id = true;
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else if meta.path.is_ident("column") {
                out.column = Some(lit(&meta)?);
            } else {
                return Err(meta.error("unsupported orm field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}
