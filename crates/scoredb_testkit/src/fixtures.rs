//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use crate::counting::CountingScoreboard;
use scoredb_core::{Config, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Snapshot file name used by file-backed fixtures.
pub const SNAPSHOT_FILE: &str = "scoreboard.json";

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory(),
            temp_dir: None,
        }
    }

    /// Creates a new file-backed test database in a temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open_file(&temp_dir.path().join(SNAPSHOT_FILE))
            .expect("Failed to open file database");
        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }

    /// Creates a database over a [`CountingScoreboard`], returning both.
    pub fn counting() -> (Self, Arc<CountingScoreboard>) {
        let backend = Arc::new(CountingScoreboard::in_memory());
        let db = Database::open_with_backend(backend.clone(), Config::default());
        (
            Self {
                db,
                temp_dir: None,
            },
            backend,
        )
    }

    /// Returns the snapshot path if file-backed, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(SNAPSHOT_FILE))
    }

    /// Reopens a file-backed database from its snapshot.
    ///
    /// Bindings and schemas are not persisted and start empty.
    pub fn reopen(self) -> Self {
        let path = self.path().expect("Only file databases can be reopened");
        let TestDatabase { db, temp_dir } = self;
        drop(db);
        Self {
            db: Database::open_file(&path).expect("Failed to reopen file database"),
            temp_dir,
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust
/// use scoredb_testkit::with_temp_db;
///
/// with_temp_db(|db| {
///     assert!(db.store().collections().is_empty());
/// });
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a test with a temporary file-backed database.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::file();
    let path = test_db.path().expect("File database should have a path");
    f(&test_db.db, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a database with `count` records `{"index": i}` in `"test"`.
    pub fn populated_database(count: usize) -> TestDatabase {
        let test_db = TestDatabase::memory();
        for i in 0..count {
            test_db
                .store()
                .save("test", &json!({ "index": i }))
                .expect("Failed to save record");
        }
        test_db
    }

    /// Creates a database with guilds, users and posts, and bindings:
    ///
    /// - `users.guild -> guilds.name` as `guildData` (direct)
    /// - `users.name <- posts.author` as `posts` (reverse)
    /// - `posts.tags -> tags.slug` as `tagData` (direct, array keys)
    pub fn social_database() -> TestDatabase {
        let test_db = TestDatabase::memory();
        let store = test_db.store();
        let save = |collection: &str, doc: serde_json::Value| {
            store.save(collection, &doc).expect("Failed to save record");
        };

        save("guilds", json!({"name": "red", "level": 3}));
        save("guilds", json!({"name": "blue", "level": 1}));
        save("users", json!({"name": "alice", "guild": "red"}));
        save("users", json!({"name": "bob", "guild": "blue"}));
        save("users", json!({"name": "carol"}));
        save("posts", json!({"author": "alice", "title": "hello", "tags": ["intro"]}));
        save("posts", json!({"author": "alice", "title": "again", "tags": ["intro", "misc"]}));
        save("posts", json!({"author": "bob", "title": "hi", "tags": []}));
        save("tags", json!({"slug": "intro"}));
        save("tags", json!({"slug": "misc"}));

        let relations = test_db.relations();
        relations
            .bind_direct("users", "guild", "guilds", "name", "guildData")
            .expect("Failed to bind");
        relations
            .bind_reverse("users", "name", "posts", "author", "posts")
            .expect("Failed to bind");
        relations
            .bind_direct("posts", "tags", "tags", "slug", "tagData")
            .expect("Failed to bind");

        test_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_database() {
        let test_db = TestDatabase::memory();
        assert!(test_db.path().is_none());
        assert_eq!(test_db.store().count("test", None).unwrap(), 0);
    }

    #[test]
    fn test_file_database_reopen() {
        let test_db = TestDatabase::file();
        let id = test_db.store().save("test", &json!({"x": 1})).unwrap();

        let test_db = test_db.reopen();
        assert_eq!(test_db.store().get_by_id("test", id).unwrap(), Some(json!({"x": 1})));
    }

    #[test]
    fn test_with_file_db() {
        with_file_db(|db, path| {
            db.store().save("test", &json!({"x": 1})).unwrap();
            assert!(path.exists());
        });
    }

    #[test]
    fn test_populated_scenario() {
        let test_db = scenarios::populated_database(10);
        assert_eq!(test_db.store().count("test", None).unwrap(), 10);
    }

    #[test]
    fn test_counting_database() {
        let (test_db, backend) = TestDatabase::counting();
        test_db.store().save("test", &json!({"x": 1})).unwrap();
        assert_eq!(backend.set_calls(), 1);
    }
}
