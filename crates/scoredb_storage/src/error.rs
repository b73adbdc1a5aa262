//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The objective name is empty or longer than the host allows.
    #[error("invalid objective name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// A participant string exceeds the host content bound.
    #[error("participant too long: {len} characters, host limit is {max}")]
    ContentTooLong {
        /// Length of the rejected participant in characters.
        len: usize,
        /// The host limit.
        max: usize,
    },

    /// The objective behind a handle no longer exists.
    #[error("objective not found: {name}")]
    ObjectiveNotFound {
        /// Name of the missing objective.
        name: String,
    },

    /// The snapshot file could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StorageError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an objective not found error.
    pub fn objective_not_found(name: impl Into<String>) -> Self {
        Self::ObjectiveNotFound { name: name.into() }
    }
}
