//! Cache layer behavior against an instrumented backend.

use scoredb_core::CoreError;
use scoredb_testkit::prelude::*;
use serde_json::json;

#[test]
fn collection_loads_once() {
    let (db, backend) = TestDatabase::counting();
    db.store().save("users", &json!({"name": "alice"})).unwrap();
    db.store().save("users", &json!({"name": "bob"})).unwrap();
    backend.reset_counts();

    let cache = db.cache();
    assert_eq!(cache.get_by_id("users", 1).unwrap(), Some(json!({"name": "alice"})));
    assert_eq!(cache.get_all("users").unwrap().len(), 2);
    assert_eq!(cache.count("users", None).unwrap(), 2);
    assert_eq!(backend.scans_of("users"), 1);
}

#[test]
fn failed_writes_leave_mirror_untouched() {
    let (db, backend) = TestDatabase::counting();
    let cache = db.cache();
    let id = cache.save("users", &json!({"name": "alice"})).unwrap();
    cache.ensure_loaded("users").unwrap();

    backend.set_fail_writes(true);
    let err = cache.save("users", &json!({"name": "bob"})).unwrap_err();
    assert!(matches!(err, CoreError::CollectionAccess { .. }));
    assert!(cache.update_by_id("users", id, &json!({"name": "eve"})).is_err());
    assert!(cache.delete_by_id("users", id).is_err());
    backend.set_fail_writes(false);

    let all = cache.get_all("users").unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].data, json!({"name": "alice"}));
}

#[test]
fn mirror_follows_content_collisions() {
    with_temp_db(|db| {
        let cache = db.cache();
        cache.ensure_loaded("dupes").unwrap();
        cache.save("dupes", &json!({"v": 1})).unwrap();
        let second = cache.save("dupes", &json!({"v": 1})).unwrap();

        let cached = cache.get_all("dupes").unwrap();
        let stored = db.store().get_elements("dupes", None).unwrap();
        assert_eq!(cached, stored);
        assert_eq!(cached[0].id, second);
    });
}

#[test]
fn invalidate_picks_up_out_of_band_writes() {
    with_temp_db(|db| {
        let cache = db.cache();
        assert_eq!(cache.count("users", None).unwrap(), 0);

        db.store().save("users", &json!({"name": "direct"})).unwrap();
        assert_eq!(cache.count("users", None).unwrap(), 0);

        cache.invalidate("users");
        assert_eq!(cache.count("users", None).unwrap(), 1);
    });
}

#[test]
fn cached_clear_empties_both_sides() {
    with_file_db(|db, _| {
        let cache = db.cache();
        cache.save("users", &json!({"name": "alice"})).unwrap();
        cache.ensure_loaded("users").unwrap();

        cache.clear("users").unwrap();
        assert!(cache.get_all("users").unwrap().is_empty());
        assert_eq!(db.store().count("users", None).unwrap(), 0);
    });
}
