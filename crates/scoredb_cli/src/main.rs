//! ScoreDB CLI
//!
//! Command-line tools for ScoreDB snapshot files.
//!
//! # Commands
//!
//! - `inspect` - Display collections and counts
//! - `get` / `find` / `count` - Read records
//! - `save` / `delete` / `clear` - Modify records
//! - `version` - Show version information

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::Format;
use error::{CliError, CliResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ScoreDB command-line database tools.
#[derive(Parser)]
#[command(name = "scoredb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database snapshot file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display collections and record counts
    Inspect {
        /// Include engine counters
        #[arg(short, long)]
        stats: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print one record by id
    Get {
        /// Collection name
        collection: String,
        /// Record id
        id: i32,
    },

    /// Print records matching an equality filter
    Find {
        /// Collection name
        collection: String,
        /// JSON object of field values to match
        filter: Option<String>,
        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Count records, optionally matching an equality filter
    Count {
        /// Collection name
        collection: String,
        /// JSON object of field values to match
        filter: Option<String>,
    },

    /// Save a JSON document and print its id
    Save {
        /// Collection name
        collection: String,
        /// JSON document
        document: String,
    },

    /// Delete a record by id
    Delete {
        /// Collection name
        collection: String,
        /// Record id
        id: i32,
    },

    /// Remove every record of a collection
    Clear {
        /// Collection name
        collection: String,
    },

    /// Show version information
    Version,
}

fn require<'a>(path: &'a Option<PathBuf>, command: &'static str) -> CliResult<&'a Path> {
    path.as_deref().ok_or(CliError::MissingPath { command })
}

fn execute(cli: Cli) -> CliResult<String> {
    let path = &cli.path;
    match cli.command {
        Commands::Inspect { stats, format } => {
            commands::inspect::run(require(path, "inspect")?, stats, format)
        }
        Commands::Get { collection, id } => {
            commands::read::get(require(path, "get")?, &collection, id)
        }
        Commands::Find {
            collection,
            filter,
            limit,
        } => commands::read::find(require(path, "find")?, &collection, filter.as_deref(), limit),
        Commands::Count { collection, filter } => {
            commands::read::count(require(path, "count")?, &collection, filter.as_deref())
        }
        Commands::Save {
            collection,
            document,
        } => commands::write::save(require(path, "save")?, &collection, &document),
        Commands::Delete { collection, id } => {
            commands::write::delete(require(path, "delete")?, &collection, id)
        }
        Commands::Clear { collection } => {
            commands::write::clear(require(path, "clear")?, &collection)
        }
        Commands::Version => Ok(format!(
            "ScoreDB CLI v{}\nScoreDB Core v{}",
            env!("CARGO_PKG_VERSION"),
            scoredb_core::VERSION
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    println!("{}", execute(cli)?);
    Ok(())
}
