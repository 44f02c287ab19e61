//! Convenient imports for typical `pgspec` usage.
//!
//! Brings the composer, the predicate option trait used inside customisation
//! closures and the execution traits into scope:
//!
//! ```ignore
//! use pgspec::prelude::*;
//! ```

pub use crate::{
    Bound, BuilderConfig, Entity, EntityMeta, FromRow, GenericClient, JoinKind, LogicalOperator,
    OrmError, OrmResult, PredicateOptions, RowExt, Schema, SchemaRegistry, Specification,
    SpecificationBuilder, Wildcard,
};

#[cfg(feature = "pool")]
pub use crate::create_pool;
