//! CLI command implementations.
//!
//! Each command returns the text to print so that it can be tested without
//! capturing stdout.

pub mod inspect;
pub mod read;
pub mod write;

use crate::error::{CliError, CliResult};
use scoredb_core::Database;
use std::path::Path;

/// Output format for commands that support both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Opens a snapshot that must already exist.
pub fn open_existing(path: &Path) -> CliResult<Database> {
    if !path.exists() {
        return Err(CliError::NoDatabase(path.to_path_buf()));
    }
    Ok(Database::open_file(path)?)
}
