//! Storage engine behavior across crates.

use scoredb_core::{CoreError, DocumentStore, Query, Update};
use scoredb_storage::ScoreboardBackend;
use scoredb_testkit::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[test]
fn update_of_missing_id_changes_nothing() {
    let (db, backend) = TestDatabase::counting();
    let store = db.store();
    store.save("users", &json!({"name": "alice"})).unwrap();
    let writes = backend.set_calls();

    assert!(!store.update_by_id("users", 42, &json!({"name": "ghost"})).unwrap());
    assert_eq!(backend.set_calls(), writes);
    assert_eq!(backend.remove_calls(), 0);
    assert_eq!(store.count("users", None).unwrap(), 1);
}

#[test]
fn delete_decrements_count() {
    let db = scenarios::populated_database(5);
    let store = db.store();

    assert!(store.delete_by_id("test", 3).unwrap());
    assert_eq!(store.count("test", None).unwrap(), 4);
    assert!(!store.delete_by_id("test", 3).unwrap());
    assert_eq!(store.count("test", None).unwrap(), 4);
}

#[test]
fn equality_is_subset_match() {
    with_temp_db(|db| {
        let store = db.store();
        store.save("users", &json!({"name": "alice", "age": 30, "city": "x"})).unwrap();
        store.save("users", &json!({"name": "bob", "age": 30})).unwrap();
        store.save("users", &json!(["not", "an", "object"])).unwrap();

        let age = Query::eq("age", 30);
        assert_eq!(store.count("users", Some(&age)).unwrap(), 2);

        let alice = Query::filter(scoredb_core::Filter::new().eq("age", 30.0).eq("city", "x"));
        let found = store.get_elements("users", Some(&alice)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data["name"], "alice");

        let missing_field = Query::eq("country", "y");
        assert!(!store.exists("users", Some(&missing_field)).unwrap());
    });
}

#[test]
fn exists_by_id_never_parses() {
    let db = scenarios::populated_database(20);
    let store = db.store();
    let parsed = store.stats().documents_parsed();

    for id in 0..25 {
        let exists = store.exists("test", Some(&Query::id(id))).unwrap();
        assert_eq!(exists, (1..=20).contains(&id));
    }
    assert_eq!(store.count("test", Some(&Query::id(7))).unwrap(), 1);
    assert_eq!(store.stats().documents_parsed(), parsed);

    for id in 0..25 {
        let exists = store.exists("test", Some(&Query::id(id))).unwrap();
        assert_eq!(exists, store.get_by_id("test", id).unwrap().is_some());
    }
}

#[test]
fn identical_content_collapses_to_latest_id() {
    let store = DocumentStore::open_in_memory();
    let doc = json!({"name": "same"});

    assert_eq!(store.save("dupes", &doc).unwrap(), 1);
    assert_eq!(store.save("dupes", &doc).unwrap(), 2);

    assert_eq!(store.count("dupes", None).unwrap(), 1);
    assert_eq!(store.get_by_id("dupes", 1).unwrap(), None);
    assert_eq!(store.get_by_id("dupes", 2).unwrap(), Some(doc));
    assert_eq!(store.stats().collisions(), 1);
}

#[test]
fn clear_empties_collection() {
    let db = scenarios::populated_database(3);
    let store = db.store();

    store.clear("test").unwrap();
    assert_eq!(store.count("test", None).unwrap(), 0);
    assert!(!store.exists("test", None).unwrap());
    store.clear("never_created").unwrap();
    assert!(!store.collection_exists("never_created").unwrap());
}

#[test]
fn reads_do_not_create_collections() {
    with_temp_db(|db| {
        let store = db.store();
        assert_eq!(store.get_by_id("ghost", 1).unwrap(), None);
        assert!(store.get_elements("ghost", None).unwrap().is_empty());
        assert_eq!(store.count("ghost", None).unwrap(), 0);
        assert!(!store.exists("ghost", None).unwrap());
        assert!(!store.delete_by_id("ghost", 1).unwrap());
        assert!(!store.collection_exists("ghost").unwrap());
    });
}

#[test]
fn malformed_entries_are_skipped() {
    let store = DocumentStore::open_in_memory();
    store.save("mixed", &json!({"ok": 1})).unwrap();
    let objective = store.backend().objective("mixed").unwrap();
    store.backend().set_score(&objective, "{broken", 5).unwrap();

    let records = store.get_elements("mixed", None).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(store.get_by_id("mixed", 5).unwrap(), None);
    assert!(store.stats().parse_failures() >= 1);
    assert_eq!(store.save("mixed", &json!({"ok": 2})).unwrap(), 6);
}

#[test]
fn invalid_input_is_rejected_before_writing() {
    let (db, backend) = TestDatabase::counting();
    let store = db.store();

    let err = store.save("users", &serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument { .. }));

    let err = store.save("a_name_longer_than_16", &json!({})).unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument { .. }));

    let huge = json!({ "blob": "x".repeat(40_000) });
    let err = store.save("users", &huge).unwrap_err();
    assert!(matches!(err, CoreError::SizeLimitExceeded { .. }));

    assert_eq!(backend.set_calls(), 0);
    assert!(!store.collection_exists("users").unwrap());
}

#[test]
fn exhausted_id_space_is_an_error() {
    let store = DocumentStore::open_in_memory();
    let objective = store.backend().objective("full").unwrap();
    store
        .backend()
        .set_score(&objective, "{\"last\":true}", i32::MAX)
        .unwrap();

    let err = store.save("full", &json!({"one": "more"})).unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument { .. }));
    assert_eq!(store.count("full", None).unwrap(), 1);
}

#[test]
fn bulk_update_and_delete() {
    let store = Arc::new(DocumentStore::open_in_memory());
    for level in [1, 2, 3, 4] {
        store.save("players", &json!({ "level": level, "active": true })).unwrap();
    }

    let high = Query::predicate(|doc| doc["level"].as_i64().is_some_and(|l| l >= 3));
    let changed = store
        .update("players", &high, Update::merge(json!({"active": false})))
        .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(store.count("players", Some(&Query::eq("active", false))).unwrap(), 2);

    let removed = store.delete("players", &Query::eq("active", false)).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.count("players", None).unwrap(), 2);
}
