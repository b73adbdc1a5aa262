//! Cross-crate integration test helpers.
//!
//! Provides a harness that mirrors every write in a plain map and checks
//! the store and the cache against it.

use scoredb_core::{Database, Document, RecordId};
use std::collections::HashMap;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The database instance.
    pub db: Database,
    /// Expected documents, keyed by collection and id.
    records: HashMap<(String, RecordId), Document>,
}

impl IntegrationHarness {
    /// Creates a new integration harness with an in-memory database.
    pub fn new() -> Self {
        Self::with_database(Database::open_in_memory())
    }

    /// Creates a harness over an existing database.
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            records: HashMap::new(),
        }
    }

    /// Saves through the cache and tracks the record.
    ///
    /// Panics if the content is already tracked under another id; the
    /// harness does not model collisions.
    pub fn save(&mut self, collection: &str, document: Document) -> RecordId {
        assert!(
            !self
                .records
                .iter()
                .any(|((c, _), d)| c == collection && *d == document),
            "harness does not model content collisions"
        );
        let id = self
            .db
            .cache()
            .save(collection, &document)
            .expect("Failed to save record");
        self.records.insert((collection.to_string(), id), document);
        id
    }

    /// Replaces a record through the cache and updates tracking.
    pub fn update(&mut self, collection: &str, id: RecordId, document: Document) -> bool {
        let updated = self
            .db
            .cache()
            .update_by_id(collection, id, &document)
            .expect("Failed to update record");
        let key = (collection.to_string(), id);
        assert_eq!(updated, self.records.contains_key(&key));
        if updated {
            self.records.insert(key, document);
        }
        updated
    }

    /// Deletes a record through the cache and updates tracking.
    pub fn delete(&mut self, collection: &str, id: RecordId) -> bool {
        let deleted = self
            .db
            .cache()
            .delete_by_id(collection, id)
            .expect("Failed to delete record");
        let tracked = self.records.remove(&(collection.to_string(), id)).is_some();
        assert_eq!(deleted, tracked, "delete result disagrees with tracking");
        deleted
    }

    /// Gets a record from the store and verifies it against tracking.
    pub fn get_and_verify(&self, collection: &str, id: RecordId) -> Option<Document> {
        let actual = self
            .db
            .store()
            .get_by_id(collection, id)
            .expect("Failed to get record");
        assert_eq!(
            actual.as_ref(),
            self.records.get(&(collection.to_string(), id)),
            "Record mismatch for {collection}/{id}"
        );
        actual
    }

    /// Verifies that the store and the cache both hold exactly the tracked
    /// records.
    pub fn verify_all(&self) {
        let mut collections: Vec<&String> = self.records.keys().map(|(c, _)| c).collect();
        collections.sort();
        collections.dedup();

        for collection in collections {
            let mut expected: Vec<(RecordId, &Document)> = self
                .records
                .iter()
                .filter(|((c, _), _)| c == collection)
                .map(|((_, id), doc)| (*id, doc))
                .collect();
            expected.sort_by_key(|(id, _)| *id);

            let mut stored = self
                .db
                .store()
                .get_elements(collection, None)
                .expect("Failed to read store");
            stored.sort_by_key(|r| r.id);
            let cached = self
                .db
                .cache()
                .get_all(collection)
                .expect("Failed to read cache");

            for records in [&stored, &cached] {
                let actual: Vec<(RecordId, &Document)> =
                    records.iter().map(|r| (r.id, &r.data)).collect();
                assert_eq!(actual, expected, "Collection {collection} diverged");
            }
        }
    }

    /// Returns the count of tracked records.
    pub fn tracked_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_harness_basic() {
        let mut harness = IntegrationHarness::new();
        let a = harness.save("users", json!({"name": "alice"}));
        let b = harness.save("users", json!({"name": "bob"}));

        assert!(harness.update("users", a, json!({"name": "alice", "level": 2})));
        assert!(!harness.update("users", 99, json!({})));
        assert!(harness.delete("users", b));

        harness.get_and_verify("users", a);
        harness.get_and_verify("users", b);
        harness.verify_all();
        assert_eq!(harness.tracked_count(), 1);
    }
}
