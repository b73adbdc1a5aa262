//! In-memory scoreboard backend for testing.

use crate::backend::{Objective, Score, ScoreEntry, ScoreboardBackend};
use crate::error::{StorageError, StorageResult};
use crate::limits::HostLimits;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Objectives and their entries, in insertion order per objective.
///
/// Shared by [`InMemoryScoreboard`] and [`crate::FileScoreboard`]; the file
/// backend serializes this table as its snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct ScoreTable {
    objectives: BTreeMap<String, Vec<ScoreEntry>>,
}

impl ScoreTable {
    /// Creates the objective if absent. Returns `true` if it was created.
    pub(crate) fn ensure_objective(&mut self, name: &str) -> bool {
        if self.objectives.contains_key(name) {
            return false;
        }
        self.objectives.insert(name.to_string(), Vec::new());
        true
    }

    pub(crate) fn has_objective(&self, name: &str) -> bool {
        self.objectives.contains_key(name)
    }

    pub(crate) fn objective_names(&self) -> Vec<String> {
        self.objectives.keys().cloned().collect()
    }

    pub(crate) fn remove_objective(&mut self, name: &str) -> bool {
        self.objectives.remove(name).is_some()
    }

    pub(crate) fn entries(&self, objective: &Objective) -> StorageResult<Vec<ScoreEntry>> {
        self.objectives
            .get(objective.name())
            .cloned()
            .ok_or_else(|| StorageError::objective_not_found(objective.name()))
    }

    pub(crate) fn set_score(
        &mut self,
        objective: &Objective,
        participant: &str,
        score: Score,
    ) -> StorageResult<()> {
        let entries = self
            .objectives
            .get_mut(objective.name())
            .ok_or_else(|| StorageError::objective_not_found(objective.name()))?;

        match entries.iter_mut().find(|e| e.participant == participant) {
            Some(existing) => existing.score = score,
            None => entries.push(ScoreEntry::new(participant, score)),
        }
        Ok(())
    }

    pub(crate) fn remove_participant(
        &mut self,
        objective: &Objective,
        participant: &str,
    ) -> StorageResult<bool> {
        let entries = self
            .objectives
            .get_mut(objective.name())
            .ok_or_else(|| StorageError::objective_not_found(objective.name()))?;

        match entries.iter().position(|e| e.participant == participant) {
            Some(index) => {
                entries.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// An in-memory scoreboard backend.
///
/// This backend stores all objectives in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use scoredb_storage::{InMemoryScoreboard, ScoreboardBackend};
///
/// let board = InMemoryScoreboard::new();
/// let obj = board.objective("guilds").unwrap();
/// board.set_score(&obj, "a", 1).unwrap();
/// board.set_score(&obj, "a", 7).unwrap();
/// let entries = board.entries(&obj).unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].score, 7);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryScoreboard {
    table: RwLock<ScoreTable>,
    limits: HostLimits,
}

impl InMemoryScoreboard {
    /// Creates a new empty scoreboard with the reference host limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty scoreboard with custom host limits.
    #[must_use]
    pub fn with_limits(limits: HostLimits) -> Self {
        Self {
            table: RwLock::new(ScoreTable::default()),
            limits,
        }
    }

    /// Returns the total number of entries across all objectives.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.table.read().objectives.values().map(Vec::len).sum()
    }

    /// Removes every objective.
    pub fn clear(&self) {
        self.table.write().objectives.clear();
    }
}

impl ScoreboardBackend for InMemoryScoreboard {
    fn limits(&self) -> HostLimits {
        self.limits
    }

    fn objective(&self, name: &str) -> StorageResult<Objective> {
        self.limits.check_name(name)?;
        self.table.write().ensure_objective(name);
        Ok(Objective::new(name))
    }

    fn has_objective(&self, name: &str) -> bool {
        self.table.read().has_objective(name)
    }

    fn objective_names(&self) -> Vec<String> {
        self.table.read().objective_names()
    }

    fn remove_objective(&self, name: &str) -> StorageResult<bool> {
        Ok(self.table.write().remove_objective(name))
    }

    fn entries(&self, objective: &Objective) -> StorageResult<Vec<ScoreEntry>> {
        self.table.read().entries(objective)
    }

    fn set_score(
        &self,
        objective: &Objective,
        participant: &str,
        score: Score,
    ) -> StorageResult<()> {
        self.limits.check_participant(participant)?;
        self.table.write().set_score(objective, participant, score)
    }

    fn remove_participant(&self, objective: &Objective, participant: &str) -> StorageResult<bool> {
        self.table.write().remove_participant(objective, participant)
    }
}
