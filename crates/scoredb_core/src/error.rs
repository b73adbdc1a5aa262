//! Error types for ScoreDB core.

use scoredb_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ScoreDB core operations.
///
/// Malformed entries and missing records are not errors: scans skip content
/// that does not parse, and lookups report "nothing matched" through `None`,
/// `false`, `0` or an empty list.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The backing store failed while operating on a collection.
    #[error("storage error on collection {collection:?}: {source}")]
    CollectionAccess {
        /// The collection being accessed.
        collection: String,
        /// The underlying storage error.
        #[source]
        source: StorageError,
    },

    /// The backing store failed outside any collection, e.g. while opening.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// An argument was rejected before any mutation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// A serialized document exceeds the configured content bound.
    #[error("document for collection {collection:?} is {len} characters, limit is {max}")]
    SizeLimitExceeded {
        /// The target collection.
        collection: String,
        /// Serialized length in characters.
        len: usize,
        /// The configured limit.
        max: usize,
    },

    /// No schema with the given name is defined.
    #[error("schema not found: {name}")]
    SchemaNotFound {
        /// Name of the schema.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wraps a storage error with the collection it occurred on.
    pub fn collection_access(collection: impl Into<String>, source: StorageError) -> Self {
        Self::CollectionAccess {
            collection: collection.into(),
            source,
        }
    }

    /// Creates a schema not found error.
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_access_keeps_context() {
        let err = CoreError::collection_access(
            "users",
            StorageError::objective_not_found("users"),
        );
        let message = err.to_string();
        assert!(message.contains("\"users\""));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn size_limit_message() {
        let err = CoreError::SizeLimitExceeded {
            collection: "logs".into(),
            len: 40_000,
            max: 32_767,
        };
        assert_eq!(
            err.to_string(),
            "document for collection \"logs\" is 40000 characters, limit is 32767"
        );
    }
}
