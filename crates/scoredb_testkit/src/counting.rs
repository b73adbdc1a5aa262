//! Instrumented backend.
//!
//! [`CountingScoreboard`] wraps any backend and counts the calls that reach
//! it. Tests use it to check that cached reads never touch the backend and
//! that target collections are scanned once per population. It can also
//! be told to fail writes, to check that callers fail closed.

use parking_lot::Mutex;
use scoredb_storage::{
    HostLimits, InMemoryScoreboard, Objective, Score, ScoreEntry, ScoreboardBackend, StorageError,
    StorageResult,
};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A backend wrapper that counts calls.
pub struct CountingScoreboard {
    inner: Arc<dyn ScoreboardBackend>,
    entries_calls: AtomicUsize,
    set_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    scans_by_objective: Mutex<HashMap<String, usize>>,
    fail_writes: AtomicBool,
}

impl CountingScoreboard {
    /// Wraps a backend.
    pub fn new(inner: Arc<dyn ScoreboardBackend>) -> Self {
        Self {
            inner,
            entries_calls: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            scans_by_objective: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Wraps a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryScoreboard::new()))
    }

    /// Number of `entries` calls (full scans).
    pub fn entries_calls(&self) -> usize {
        self.entries_calls.load(Ordering::Relaxed)
    }

    /// Number of `entries` calls for one objective.
    pub fn scans_of(&self, objective: &str) -> usize {
        self.scans_by_objective
            .lock()
            .get(objective)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `set_score` calls.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::Relaxed)
    }

    /// Number of `remove_participant` calls.
    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::Relaxed)
    }

    /// Makes every subsequent write fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Resets all counters.
    pub fn reset_counts(&self) {
        self.entries_calls.store(0, Ordering::Relaxed);
        self.set_calls.store(0, Ordering::Relaxed);
        self.remove_calls.store(0, Ordering::Relaxed);
        self.scans_by_objective.lock().clear();
    }

    fn check_write(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::Io(io::Error::other("injected write failure")));
        }
        Ok(())
    }
}

impl ScoreboardBackend for CountingScoreboard {
    fn limits(&self) -> HostLimits {
        self.inner.limits()
    }

    fn objective(&self, name: &str) -> StorageResult<Objective> {
        if !self.inner.has_objective(name) {
            self.check_write()?;
        }
        self.inner.objective(name)
    }

    fn has_objective(&self, name: &str) -> bool {
        self.inner.has_objective(name)
    }

    fn objective_names(&self) -> Vec<String> {
        self.inner.objective_names()
    }

    fn remove_objective(&self, name: &str) -> StorageResult<bool> {
        self.check_write()?;
        self.inner.remove_objective(name)
    }

    fn entries(&self, objective: &Objective) -> StorageResult<Vec<ScoreEntry>> {
        self.entries_calls.fetch_add(1, Ordering::Relaxed);
        *self
            .scans_by_objective
            .lock()
            .entry(objective.name().to_string())
            .or_insert(0) += 1;
        self.inner.entries(objective)
    }

    fn set_score(&self, objective: &Objective, participant: &str, score: Score) -> StorageResult<()> {
        self.set_calls.fetch_add(1, Ordering::Relaxed);
        self.check_write()?;
        self.inner.set_score(objective, participant, score)
    }

    fn remove_participant(&self, objective: &Objective, participant: &str) -> StorageResult<bool> {
        self.remove_calls.fetch_add(1, Ordering::Relaxed);
        self.check_write()?;
        self.inner.remove_participant(objective, participant)
    }
}

impl std::fmt::Debug for CountingScoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingScoreboard")
            .field("entries_calls", &self.entries_calls())
            .field("set_calls", &self.set_calls())
            .field("remove_calls", &self.remove_calls())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_reach_the_backend() {
        let backend = CountingScoreboard::in_memory();
        let users = backend.objective("users").unwrap();
        backend.set_score(&users, "a", 1).unwrap();
        backend.entries(&users).unwrap();
        backend.entries(&users).unwrap();
        backend.remove_participant(&users, "a").unwrap();

        assert_eq!(backend.set_calls(), 1);
        assert_eq!(backend.entries_calls(), 2);
        assert_eq!(backend.scans_of("users"), 2);
        assert_eq!(backend.scans_of("posts"), 0);
        assert_eq!(backend.remove_calls(), 1);

        backend.reset_counts();
        assert_eq!(backend.entries_calls(), 0);
    }

    #[test]
    fn injected_failures_leave_data_alone() {
        let backend = CountingScoreboard::in_memory();
        let users = backend.objective("users").unwrap();
        backend.set_score(&users, "a", 1).unwrap();

        backend.set_fail_writes(true);
        assert!(backend.set_score(&users, "b", 2).is_err());
        assert!(backend.remove_participant(&users, "a").is_err());
        assert!(backend.objective("posts").is_err());
        assert!(backend.objective("users").is_ok());

        backend.set_fail_writes(false);
        assert_eq!(backend.entries(&users).unwrap(), vec![ScoreEntry::new("a", 1)]);
    }
}
