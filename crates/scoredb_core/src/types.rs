//! Core type definitions for ScoreDB.

use scoredb_storage::Score;
use serde::{Deserialize, Serialize};

/// Identifier of a record within a collection.
///
/// Ids are the scores attached to backing entries. The engine assigns them
/// as one more than the highest id present, so they increase monotonically
/// and are never reused while a higher id exists.
pub type RecordId = Score;

/// A parsed document.
pub type Document = serde_json::Value;

/// A record: an engine-assigned id and its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record id.
    pub id: RecordId,
    /// The parsed document.
    pub data: Document,
}

impl Record {
    /// Creates a new record.
    pub fn new(id: RecordId, data: Document) -> Self {
        Self { id, data }
    }
}
