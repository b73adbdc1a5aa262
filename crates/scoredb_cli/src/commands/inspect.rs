//! Inspect command implementation.

use super::{open_existing, Format};
use crate::error::CliResult;
use scoredb_core::StatsSnapshot;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Snapshot path.
    pub path: String,
    /// Snapshot size in bytes.
    pub file_size: u64,
    /// Per-collection statistics.
    pub collections: Vec<CollectionStats>,
    /// Engine counters gathered while inspecting (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsSnapshot>,
}

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Number of backing entries.
    pub entries: usize,
    /// Number of entries that parse as documents.
    pub documents: usize,
    /// Highest record id, if any.
    pub max_id: Option<i32>,
}

/// Runs the inspect command.
pub fn run(path: &Path, show_stats: bool, format: Format) -> CliResult<String> {
    let db = open_existing(path)?;
    let store = db.store();

    let mut collections = Vec::new();
    for name in store.collections() {
        let records = store.get_elements(&name, None)?;
        collections.push(CollectionStats {
            entries: store.count(&name, None)?,
            documents: records.len(),
            max_id: records.iter().map(|r| r.id).max(),
            name,
        });
    }

    let result = InspectResult {
        path: path.display().to_string(),
        file_size: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        collections,
        stats: show_stats.then(|| store.stats().snapshot()),
    };

    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&result)?,
        Format::Text => render_text(&result),
    })
}

fn render_text(result: &InspectResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== ScoreDB Inspection ===");
    let _ = writeln!(out, "Path: {}", result.path);
    let _ = writeln!(out, "Size: {} bytes", result.file_size);
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Collections ({}) ---", result.collections.len());
    for c in &result.collections {
        let skipped = c.entries.saturating_sub(c.documents);
        let max_id = c.max_id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let _ = writeln!(
            out,
            "  {:<16} entries: {:>6}  documents: {:>6}  malformed: {:>4}  max id: {}",
            c.name, c.entries, c.documents, skipped, max_id
        );
    }
    if let Some(stats) = &result.stats {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Engine Counters ---");
        let _ = writeln!(out, "  Scans:            {}", stats.scans);
        let _ = writeln!(out, "  Parsed:           {}", stats.documents_parsed);
        let _ = writeln!(out, "  Parse failures:   {}", stats.parse_failures);
    }
    out
}
