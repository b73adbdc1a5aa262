//! Fuzz harnesses for ScoreDB.
//!
//! Byte-driven targets that can be used with cargo-fuzz or fed from
//! proptest. None of them may panic on any input.

use scoredb_core::{DocumentStore, Query};
use scoredb_storage::ScoreboardBackend;
use serde_json::json;

/// Fuzz target for foreign content.
///
/// Writes `data` (lossily decoded as UTF-8) straight into the backend and
/// checks that every read path skips or parses it without failing.
pub fn fuzz_foreign_content(data: &[u8]) {
    let store = DocumentStore::open_in_memory();
    let participant = String::from_utf8_lossy(data);
    if participant.is_empty() {
        return;
    }

    let Ok(objective) = store.backend().objective("fuzz") else {
        return;
    };
    if store.backend().set_score(&objective, &participant, 1).is_err() {
        return;
    }

    let listed = store.get_elements("fuzz", None).expect("scan must not fail");
    assert!(listed.len() <= 1);
    assert_eq!(store.count("fuzz", None).expect("count must not fail"), 1);
    assert!(store.exists("fuzz", Some(&Query::id(1))).expect("exists must not fail"));
    let _ = store.get_by_id("fuzz", 1).expect("get must not fail");
    let next = store.save("fuzz", &json!({"ok": true})).expect("save must not fail");
    assert_eq!(next, 2);
}

/// Fuzz target for operation sequences.
///
/// Interprets `data` as a stream of `(opcode, id)` byte pairs.
pub fn fuzz_store_operations(data: &[u8]) {
    let store = DocumentStore::open_in_memory();

    for chunk in data.chunks_exact(2) {
        let id = i32::from(chunk[1] % 16);
        match chunk[0] % 5 {
            0 => {
                let _ = store.save("fuzz", &json!({ "n": chunk[1] }));
            }
            1 => {
                let _ = store.update_by_id("fuzz", id, &json!({ "u": chunk[1] }));
            }
            2 => {
                let _ = store.delete_by_id("fuzz", id);
            }
            3 => {
                let _ = store.get_by_id("fuzz", id);
            }
            _ => {
                let _ = store.count("fuzz", Some(&Query::eq("n", chunk[1])));
            }
        }
    }

    let count = store.count("fuzz", None).expect("count must not fail");
    let listed = store.get_elements("fuzz", None).expect("scan must not fail");
    assert_eq!(count, listed.len());
}
