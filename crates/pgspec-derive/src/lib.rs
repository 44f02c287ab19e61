//! Derive macros for pgspec
//!
//! Provides `#[derive(Entity)]`, which describes a record type to the
//! specification resolver.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive the `Entity` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use pgspec::Entity;
///
/// #[derive(Entity)]
/// #[orm(table = "posts")]
/// #[orm(belongs_to(User, foreign_key = "author_id", name = "author"))]
/// #[orm(many_to_many(Tag, through = "post_tags", self_key = "post_id", other_key = "tag_id"))]
/// #[orm(element_collection(name = "labels", table = "post_labels", foreign_key = "post_id", column = "label"))]
/// struct Post {
///     #[orm(id)]
///     id: i64,
///     #[orm(column = "title_text")]
///     title: String,
///     #[orm(skip)]
///     score: f64,
/// }
/// ```
///
/// # Attributes
///
/// Struct level:
/// - `#[orm(table = "name")]` - Table name (required)
/// - `#[orm(name = "Name")]` - Entity name, defaults to the struct name
/// - `#[orm(belongs_to(Model, foreign_key = "..", name = ".."))]` - Foreign key on this table
/// - `#[orm(has_one(Model, foreign_key = "..", name = ".."))]` - Foreign key on the other table
/// - `#[orm(has_many(Model, foreign_key = "..", name = ".."))]` - To-many, foreign key on the other table
/// - `#[orm(many_to_many(Model, through = "..", self_key = "..", other_key = "..", name = ".."))]`
/// - `#[orm(element_collection(name = "..", table = "..", foreign_key = "..", column = ".."))]`
///
/// Relation names default to the snake-cased model name, pluralised for
/// `has_many` and `many_to_many`.
///
/// Field level:
/// - `#[orm(id)]` - Primary key
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Not a column
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
