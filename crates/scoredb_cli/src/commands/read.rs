//! Read commands: get, find and count.

use super::open_existing;
use crate::error::CliResult;
use scoredb_core::{Filter, Query, RecordId};
use std::path::Path;

/// Prints one record as JSON, or `null` if absent.
pub fn get(path: &Path, collection: &str, id: RecordId) -> CliResult<String> {
    let db = open_existing(path)?;
    let document = db.store().get_by_id(collection, id)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Prints the records matching an equality filter as a JSON array.
///
/// `filter` is a JSON object; `None` lists every record.
pub fn find(
    path: &Path,
    collection: &str,
    filter: Option<&str>,
    limit: Option<usize>,
) -> CliResult<String> {
    let db = open_existing(path)?;
    let query = parse_filter(filter)?;
    let mut records = db.store().get_elements(collection, query.as_ref())?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Prints the number of records matching an optional equality filter.
pub fn count(path: &Path, collection: &str, filter: Option<&str>) -> CliResult<String> {
    let db = open_existing(path)?;
    let query = parse_filter(filter)?;
    Ok(db.store().count(collection, query.as_ref())?.to_string())
}

fn parse_filter(filter: Option<&str>) -> CliResult<Option<Query<'static>>> {
    let Some(text) = filter else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(Some(Query::filter(Filter::from_value(value)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoredb_core::Database;
    use serde_json::json;
    use tempfile::tempdir;

    fn seeded() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let db = Database::open_file(&path).unwrap();
        for (name, age) in [("alice", 30), ("bob", 25), ("carol", 30)] {
            db.store()
                .save("users", &json!({"name": name, "age": age}))
                .unwrap();
        }
        (dir, path)
    }

    #[test]
    fn get_prints_document_or_null() {
        let (_dir, path) = seeded();
        let found: serde_json::Value =
            serde_json::from_str(&get(&path, "users", 2).unwrap()).unwrap();
        assert_eq!(found["name"], "bob");
        assert_eq!(get(&path, "users", 9).unwrap(), "null");
    }

    #[test]
    fn find_applies_filter_and_limit() {
        let (_dir, path) = seeded();
        let out = find(&path, "users", Some(r#"{"age": 30}"#), None).unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], 1);

        let out = find(&path, "users", None, Some(1)).unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn count_with_and_without_filter() {
        let (_dir, path) = seeded();
        assert_eq!(count(&path, "users", None).unwrap(), "3");
        assert_eq!(count(&path, "users", Some(r#"{"age": 25}"#)).unwrap(), "1");
        assert!(count(&path, "users", Some("[1]")).is_err());
        assert!(count(&path, "users", Some("{oops")).is_err());
    }
}
