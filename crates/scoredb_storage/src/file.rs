//! File-based scoreboard backend for persistent storage.

use crate::backend::{Objective, Score, ScoreEntry, ScoreboardBackend};
use crate::error::StorageResult;
use crate::limits::HostLimits;
use crate::memory::ScoreTable;
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A file-based scoreboard backend.
///
/// The whole scoreboard is kept in memory and written to disk as a JSON
/// snapshot after every mutation. Data survives process restarts.
///
/// # Durability
///
/// Each snapshot is written to a sibling temporary file, synced, and then
/// renamed over the snapshot path, so a crash leaves either the previous or
/// the new snapshot on disk.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
/// The table lock is held while the snapshot is written. A mutation
/// becomes visible only after its snapshot has been renamed into place.
///
/// # Example
///
/// ```no_run
/// use scoredb_storage::{FileScoreboard, ScoreboardBackend};
/// use std::path::Path;
///
/// let board = FileScoreboard::open(Path::new("scoreboard.json")).unwrap();
/// let obj = board.objective("users").unwrap();
/// board.set_score(&obj, "{}", 1).unwrap();
/// ```
#[derive(Debug)]
pub struct FileScoreboard {
    path: PathBuf,
    table: RwLock<ScoreTable>,
    limits: HostLimits,
}

impl FileScoreboard {
    /// Opens the snapshot at `path`, or starts empty if it does not exist.
    ///
    /// Nothing is written until the first mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_limits(path, HostLimits::default())
    }

    /// Opens the snapshot at `path` with custom host limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open_with_limits(path: &Path, limits: HostLimits) -> StorageResult<Self> {
        let table = if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader)?
        } else {
            ScoreTable::default()
        };

        tracing::debug!(path = %path.display(), "opened scoreboard snapshot");

        Ok(Self {
            path: path.to_path_buf(),
            table: RwLock::new(table),
            limits,
        })
    }

    /// Opens a snapshot, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the snapshot
    /// cannot be read.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the table and installs the copy once
    /// its snapshot is on disk. `change` returns whether anything changed;
    /// unchanged tables are not written.
    fn commit<F>(&self, change: F) -> StorageResult<bool>
    where
        F: FnOnce(&mut ScoreTable) -> StorageResult<bool>,
    {
        let mut table = self.table.write();
        let mut staged = table.clone();
        if !change(&mut staged)? {
            return Ok(false);
        }
        self.persist(&staged)?;
        *table = staged;
        Ok(true)
    }

    fn persist(&self, table: &ScoreTable) -> StorageResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, table)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreboardBackend for FileScoreboard {
    fn limits(&self) -> HostLimits {
        self.limits
    }

    fn objective(&self, name: &str) -> StorageResult<Objective> {
        self.limits.check_name(name)?;
        self.commit(|table| Ok(table.ensure_objective(name)))?;
        Ok(Objective::new(name))
    }

    fn has_objective(&self, name: &str) -> bool {
        self.table.read().has_objective(name)
    }

    fn objective_names(&self) -> Vec<String> {
        self.table.read().objective_names()
    }

    fn remove_objective(&self, name: &str) -> StorageResult<bool> {
        self.commit(|table| Ok(table.remove_objective(name)))
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
        self.commit(|table| table.set_score(objective, participant, score).map(|()| true))?;
        Ok(())
    }

    fn remove_participant(&self, objective: &Objective, participant: &str) -> StorageResult<bool> {
        self.commit(|table| table.remove_participant(objective, participant))
    }
}
