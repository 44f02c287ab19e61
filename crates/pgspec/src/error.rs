//! Error types for pgspec

use thiserror::Error;

/// Result type alias for pgspec operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for specification resolution and execution.
///
/// Absent filter values are never reported here: they are silently dropped while
/// a specification is being built. Errors only surface when a specification is
/// resolved against a [`Schema`](crate::Schema) or executed.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The schema does not know the requested entity
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// The entity has no field with the requested name
    #[error("Unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    /// Malformed attribute path (empty path or empty segment)
    #[error("Invalid attribute path '{0}'")]
    InvalidPath(String),

    /// An operation needed the primary key of an entity that declares none
    #[error("Entity '{0}' has no primary key")]
    MissingPrimaryKey(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create an unknown field error
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error was raised by the schema while resolving a path
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity(_)
                | Self::UnknownField { .. }
                | Self::InvalidPath(_)
                | Self::MissingPrimaryKey(_)
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Wrap a tokio_postgres error
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_message_names_entity_and_field() {
        let err = OrmError::unknown_field("User", "nickname");
        assert_eq!(err.to_string(), "Unknown field 'nickname' on entity 'User'");
        assert!(err.is_resolution_error());
    }

    #[test]
    fn validation_is_not_resolution_error() {
        assert!(!OrmError::validation("bad").is_resolution_error());
    }
}
