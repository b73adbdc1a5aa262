//! Write commands: save, delete and clear.

use crate::error::CliResult;
use scoredb_core::{Database, RecordId};
use std::path::Path;
use tracing::info;

/// Saves a JSON document and prints its id.
///
/// The snapshot is created if it does not exist.
pub fn save(path: &Path, collection: &str, document: &str) -> CliResult<String> {
    let document: serde_json::Value = serde_json::from_str(document)?;
    let db = Database::open_file(path)?;
    let id = db.store().save(collection, &document)?;
    info!(collection, id, "saved record");
    Ok(id.to_string())
}

/// Deletes a record and reports whether it existed.
pub fn delete(path: &Path, collection: &str, id: RecordId) -> CliResult<String> {
    let db = super::open_existing(path)?;
    let deleted = db.store().delete_by_id(collection, id)?;
    Ok(if deleted {
        format!("deleted {collection}/{id}")
    } else {
        format!("{collection}/{id} not found")
    })
}

/// Removes every record of a collection.
pub fn clear(path: &Path, collection: &str) -> CliResult<String> {
    let db = super::open_existing(path)?;
    let removed = db.store().count(collection, None)?;
    db.store().clear(collection)?;
    Ok(format!("cleared {removed} entries from {collection}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::read;
    use tempfile::tempdir;

    #[test]
    fn save_delete_clear_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        assert_eq!(save(&path, "users", r#"{"name": "alice"}"#).unwrap(), "1");
        assert_eq!(save(&path, "users", r#"{"name": "bob"}"#).unwrap(), "2");
        assert!(save(&path, "users", "null").is_err());
        assert!(save(&path, "users", "{not json").is_err());

        assert_eq!(delete(&path, "users", 1).unwrap(), "deleted users/1");
        assert_eq!(delete(&path, "users", 1).unwrap(), "users/1 not found");
        assert_eq!(read::count(&path, "users", None).unwrap(), "1");

        assert_eq!(clear(&path, "users").unwrap(), "cleared 1 entries from users");
        assert_eq!(read::count(&path, "users", None).unwrap(), "0");
    }

    #[test]
    fn delete_requires_existing_snapshot() {
        let dir = tempdir().unwrap();
        assert!(delete(&dir.path().join("none.json"), "users", 1).is_err());
    }
}
