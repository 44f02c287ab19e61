//! # pgspec
//!
//! Composable, null-tolerant filter specifications for PostgreSQL.
//!
//! ## Features
//!
//! - **Optional by default**: every filter takes an `Option`; absent values drop out
//!   of the query instead of matching nothing
//! - **Association paths**: `author.profile.city` joins through the record graph,
//!   reusing a join when several filters cross the same association
//! - **Explicit schema**: relations are described once with [`EntityMeta`] or
//!   `#[derive(Entity)]`, never discovered at runtime
//! - **Transaction-friendly**: execute on anything implementing [`GenericClient`]
//!
//! ## Example
//!
//! ```ignore
//! use pgspec::prelude::*;
//!
//! #[derive(Entity)]
//! #[orm(table = "posts", belongs_to(User, foreign_key = "author_id", name = "author"))]
//! struct Post {
//!     #[orm(id)]
//!     id: i64,
//!     title: String,
//!     author_id: i64,
//! }
//!
//! let mut schema = SchemaRegistry::new();
//! schema.register::<User>()?;
//! schema.register::<Post>()?;
//!
//! let spec = SpecificationBuilder::<Post>::new()
//!     .like_with("title", params.title, |b| b.wildcard(Wildcard::Both))
//!     .equal("author.username", params.author)
//!     .build();
//!
//! let posts: Vec<Post> = spec
//!     .to_query(&schema)?
//!     .order_by_desc("id")?
//!     .fetch_all(&client)
//!     .await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod operator;
pub mod param;
pub mod path;
pub mod prelude;
pub mod query;
pub mod row;
pub mod schema;
pub mod spec;

mod ident;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::SpecificationBuilder;
pub use client::GenericClient;
pub use config::BuilderConfig;
pub use context::QueryContext;
pub use error::{OrmError, OrmResult};
pub use expr::{ColumnRef, Expr};
pub use operator::{JoinKind, LogicalOperator, Wildcard};
pub use param::{Param, ParamList};
pub use path::{AttributePath, IntoPath};
pub use query::SpecQuery;
pub use row::{FromRow, RowExt};
pub use schema::{Entity, EntityMeta, FieldKind, Relation, Schema, SchemaRegistry};
pub use spec::{
    BaseOptions, Bound, ComparisonBuilder, ComparisonKind, ComparisonPredicate, EqualBuilder,
    EqualPredicate, InBuilder, InPredicate, LikeBuilder, LikePredicate, NullBuilder,
    NullPredicate, Predicate, PredicateOptions, Range, Sign, Specification,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;

#[cfg(feature = "derive")]
pub use pgspec_derive::Entity;
