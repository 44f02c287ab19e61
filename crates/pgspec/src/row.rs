//! Row mapping traits

use crate::error::{OrmError, OrmResult};
use serde::de::DeserializeOwned;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Json};

/// Trait for types that can be constructed from a database row
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning OrmError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Decode a related row loaded by a fetch join.
    ///
    /// `path` is the dotted association path the fetch was requested on. Returns
    /// `None` when no related row exists (outer join) or the path was not fetched.
    fn try_get_fetched<T>(&self, path: &str) -> OrmResult<Option<T>>
    where
        T: DeserializeOwned;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }

    fn try_get_fetched<T>(&self, path: &str) -> OrmResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        if self.columns().iter().all(|c| c.name() != path) {
            return Ok(None);
        }
        let value: Option<Json<T>> = self.try_get_column(path)?;
        Ok(value.map(|Json(v)| v))
    }
}
