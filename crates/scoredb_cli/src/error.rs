//! CLI error type.

use scoredb_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// No `--path` was given.
    #[error("database path required for {command}")]
    MissingPath {
        /// The command that needed it.
        command: &'static str,
    },

    /// The snapshot file does not exist.
    #[error("no database found at {0:?}")]
    NoDatabase(PathBuf),

    /// A JSON argument could not be parsed.
    #[error("invalid JSON argument: {0}")]
    Json(#[from] serde_json::Error),

    /// The database rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
