//! Scoreboard backend trait definition.

use crate::error::StorageResult;
use crate::limits::HostLimits;
use serde::{Deserialize, Serialize};

/// The integer attribute attached to a participant.
pub type Score = i32;

/// A handle to an objective (a named collection of entries).
///
/// Handles are obtained from [`ScoreboardBackend::objective`] and are cheap
/// to clone. A handle outlives the objective it names; operations on a
/// removed objective fail with `ObjectiveNotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Objective {
    name: String,
}

impl Objective {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the objective name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A physical `(participant, score)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// The participant string. This is the entry's identity key.
    pub participant: String,
    /// The score attached to the participant.
    pub score: Score,
}

impl ScoreEntry {
    /// Creates a new entry.
    pub fn new(participant: impl Into<String>, score: Score) -> Self {
        Self {
            participant: participant.into(),
            score,
        }
    }
}

/// A scoreboard-style backing store for ScoreDB.
///
/// Backends store participant strings with an attached integer score,
/// grouped by objective. ScoreDB owns all interpretation of the participant
/// strings - backends never parse them.
///
/// # Invariants
///
/// - `objective` is idempotent: it creates the objective only if absent
/// - `entries` returns each participant exactly once, in an order that is
///   stable for the duration of the call
/// - `set_score` on an existing participant overwrites its score and keeps
///   its position; two entries with the same participant cannot coexist
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryScoreboard`] - For testing
/// - [`super::FileScoreboard`] - For persistent storage
pub trait ScoreboardBackend: Send + Sync {
    /// Returns the host limits this backend enforces.
    fn limits(&self) -> HostLimits;

    /// Gets or creates the objective with the given name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the name is empty or exceeds the host limit,
    /// or an I/O error if a persistent backend fails to record the creation.
    fn objective(&self, name: &str) -> StorageResult<Objective>;

    /// Returns `true` if an objective with this name exists.
    ///
    /// Never creates the objective.
    fn has_objective(&self, name: &str) -> bool;

    /// Returns the names of all objectives, sorted.
    fn objective_names(&self) -> Vec<String>;

    /// Removes an objective and all of its entries.
    ///
    /// Returns `false` if the objective did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent backend fails to record the removal.
    fn remove_objective(&self, name: &str) -> StorageResult<bool>;

    /// Returns a snapshot of all entries of an objective.
    ///
    /// # Errors
    ///
    /// Returns `ObjectiveNotFound` if the objective was removed.
    fn entries(&self, objective: &Objective) -> StorageResult<Vec<ScoreEntry>>;

    /// Sets the score of a participant, inserting it if absent.
    ///
    /// # Errors
    ///
    /// Returns `ContentTooLong` if the participant exceeds the host limit,
    /// `ObjectiveNotFound` if the objective was removed, or an I/O error.
    fn set_score(&self, objective: &Objective, participant: &str, score: Score)
        -> StorageResult<()>;

    /// Removes a participant whose string matches exactly.
    ///
    /// Returns `false` if no such participant exists.
    ///
    /// # Errors
    ///
    /// Returns `ObjectiveNotFound` if the objective was removed, or an I/O
    /// error.
    fn remove_participant(&self, objective: &Objective, participant: &str)
        -> StorageResult<bool>;
}
