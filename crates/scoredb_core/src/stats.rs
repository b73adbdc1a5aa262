//! Store statistics.
//!
//! Counters for monitoring how much work the linear-scan engine and the cache
//! mirror perform.
//!
//! # Usage
//!
//! ```rust
//! use scoredb_core::DocumentStore;
//! use serde_json::json;
//!
//! let store = DocumentStore::open_in_memory();
//! store.save("users", &json!({"name": "alice"})).unwrap();
//! store.exists("users", Some(&scoredb_core::Query::id(1))).unwrap();
//!
//! let stats = store.stats().snapshot();
//! assert_eq!(stats.writes, 1);
//! assert_eq!(stats.documents_parsed, 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Full enumerations of a collection.
    scans: AtomicU64,
    /// Entries whose content was parsed as a document.
    documents_parsed: AtomicU64,
    /// Entries whose content failed to parse and was skipped.
    parse_failures: AtomicU64,
    /// Entries written to the backing store.
    writes: AtomicU64,
    /// Entries removed from the backing store.
    deletes: AtomicU64,
    /// Writes that landed on content owned by another record.
    collisions: AtomicU64,
    /// Collections loaded into the cache mirror.
    cache_loads: AtomicU64,
    /// Reads served from the cache mirror.
    cache_hits: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_parse(&self) {
        self.documents_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_load(&self) {
        self.cache_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of full collection enumerations.
    pub fn scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Returns the number of entries parsed as documents.
    ///
    /// Id-only lookups (`exists`/`count` with an id query) never parse.
    pub fn documents_parsed(&self) -> u64 {
        self.documents_parsed.load(Ordering::Relaxed)
    }

    /// Returns the number of entries skipped because they did not parse.
    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    /// Returns the number of entries written.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of entries removed.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Returns the number of content collisions.
    pub fn collisions(&self) -> u64 {
        self.collisions.load(Ordering::Relaxed)
    }

    /// Returns the number of cache mirror loads.
    pub fn cache_loads(&self) -> u64 {
        self.cache_loads.load(Ordering::Relaxed)
    }

    /// Returns the number of reads served from the cache mirror.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            scans: self.scans(),
            documents_parsed: self.documents_parsed(),
            parse_failures: self.parse_failures(),
            writes: self.writes(),
            deletes: self.deletes(),
            collisions: self.collisions(),
            cache_loads: self.cache_loads(),
            cache_hits: self.cache_hits(),
        }
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct StatsSnapshot {
    /// Full collection enumerations.
    pub scans: u64,
    /// Entries parsed as documents.
    pub documents_parsed: u64,
    /// Entries skipped because they did not parse.
    pub parse_failures: u64,
    /// Entries written.
    pub writes: u64,
    /// Entries removed.
    pub deletes: u64,
    /// Writes that collapsed onto another record's content.
    pub collisions: u64,
    /// Cache mirror loads.
    pub cache_loads: u64,
    /// Reads served from the cache mirror.
    pub cache_hits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = StoreStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = StoreStats::new();
        stats.record_scan();
        stats.record_parse();
        stats.record_parse();
        stats.record_parse_failure();
        stats.record_write();
        stats.record_delete();

        let snap = stats.snapshot();
        assert_eq!(snap.scans, 1);
        assert_eq!(snap.documents_parsed, 2);
        assert_eq!(snap.parse_failures, 1);
        assert_eq!(snap.writes, 1);
        assert_eq!(snap.deletes, 1);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StoreStats::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_cache_hit();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.cache_hits(), 800);
    }
}
