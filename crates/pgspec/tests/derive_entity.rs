//! Checks the metadata generated by `#[derive(Entity)]`.
//!
//! These tests do NOT touch a database.

#![allow(dead_code)]

use pgspec::prelude::*;
use pgspec::{FieldKind, Relation};

#[derive(Entity)]
#[orm(table = "authors")]
#[orm(has_many(Article, foreign_key = "author_id"))]
#[orm(has_one(AuthorBio, foreign_key = "author_id", name = "bio"))]
struct Author {
    #[orm(id)]
    author_id: i64,
    #[orm(column = "display_name")]
    name: String,
    #[orm(skip)]
    article_count: usize,
}

#[derive(Entity)]
#[orm(table = "author_bios")]
struct AuthorBio {
    #[orm(id)]
    id: i64,
    author_id: i64,
    body: String,
}

#[derive(Entity)]
#[orm(table = "articles", name = "Story")]
#[orm(belongs_to(Author, foreign_key = "author_id", as = "writer"))]
#[orm(many_to_many(Label, through = "article_labels", self_key = "article_id", other_key = "label_id"))]
#[orm(element_collection(name = "keywords", table = "article_keywords", foreign_key = "article_id", column = "keyword"))]
struct Article {
    #[orm(id)]
    id: i64,
    author_id: i64,
    title: String,
}

#[derive(Entity)]
#[orm(table = "labels")]
struct Label {
    #[orm(id)]
    id: i64,
    name: String,
}

#[derive(Entity)]
#[orm(table = "accounts")]
struct Account {
    #[orm(id, column = "account_id")]
    id: i64,
    email: String,
}

#[test]
fn renamed_id_column_is_a_single_field() {
    let meta = Account::entity_meta();
    assert_eq!(meta.primary_key_column(), Some("account_id"));
    assert_eq!(
        meta.field("id"),
        Some(&FieldKind::Scalar {
            column: "account_id".to_string()
        })
    );
    assert!(meta.field("account_id").is_none());
    assert_eq!(meta.fields().count(), 2);
}

#[test]
fn columns_and_primary_key() {
    let meta = Author::entity_meta();
    assert_eq!(Author::entity_name(), "Author");
    assert_eq!(meta.table(), "authors");
    assert_eq!(meta.primary_key_column(), Some("author_id"));
    assert_eq!(
        meta.field("name"),
        Some(&FieldKind::Scalar {
            column: "display_name".to_string()
        })
    );
    assert!(meta.field("article_count").is_none());
}

#[test]
fn relation_names_default_to_snake_case() {
    let meta = Author::entity_meta();
    assert_eq!(
        meta.field("articles"),
        Some(&FieldKind::Association(Relation::HasMany {
            target: "Story".to_string(),
            foreign_key: "author_id".to_string(),
        }))
    );
    assert!(matches!(
        meta.field("bio"),
        Some(FieldKind::Association(Relation::HasOne { .. }))
    ));

    let meta = Article::entity_meta();
    assert!(matches!(
        meta.field("labels"),
        Some(FieldKind::Association(Relation::ManyToMany { .. }))
    ));
}

#[test]
fn entity_name_override_and_explicit_relation_name() {
    assert_eq!(Article::entity_name(), "Story");
    let meta = Article::entity_meta();
    assert_eq!(meta.name(), "Story");
    assert_eq!(
        meta.field("writer"),
        Some(&FieldKind::Association(Relation::BelongsTo {
            target: "Author".to_string(),
            foreign_key: "author_id".to_string(),
        }))
    );
    assert!(matches!(
        meta.field("keywords"),
        Some(FieldKind::ElementCollection { .. })
    ));
}

#[test]
fn derived_entities_resolve_paths() -> OrmResult<()> {
    let mut schema = SchemaRegistry::new();
    schema.register::<Author>()?;
    schema.register::<AuthorBio>()?;
    schema.register::<Article>()?;
    schema.register::<Label>()?;

    let sql = SpecificationBuilder::<Article>::new()
        .distinct(false)
        .equal("writer.name", Some("Ada"))
        .build()
        .to_query(&schema)?
        .to_sql();
    assert_eq!(
        sql,
        "SELECT t0.* FROM articles t0 \
         INNER JOIN authors t1 ON t1.author_id = t0.author_id \
         WHERE t1.display_name = $1"
    );
    Ok(())
}
