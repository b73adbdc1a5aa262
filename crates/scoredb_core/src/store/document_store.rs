//! Document CRUD and query evaluation over a scoreboard backend.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::query::{Query, Update};
use crate::stats::StoreStats;
use crate::store::codec;
use crate::types::{Document, Record, RecordId};
use scoredb_storage::{InMemoryScoreboard, Objective, ScoreEntry, ScoreboardBackend};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Persists documents in scoreboard objectives.
///
/// Each collection is an objective. A record is stored as one entry whose
/// participant string is the serialized document and whose score is the
/// record id.
///
/// # Scans
///
/// There is no secondary index: every operation enumerates the collection
/// once, and `save` scans to find the highest id. "First match" always
/// follows the backend's enumeration order.
///
/// # Content identity
///
/// The backend keys entries by content. Two records whose documents
/// serialize identically cannot coexist: writing content that is already
/// stored rewrites that entry's id instead of adding a second entry.
///
/// Content that does not parse (foreign data sharing the objective) is
/// treated as absent by every scan.
///
/// # Example
///
/// ```rust
/// use scoredb_core::{DocumentStore, Query};
/// use serde_json::json;
///
/// let store = DocumentStore::open_in_memory();
/// let id = store.save("guilds", &json!({"uuid": "g1", "name": "X"})).unwrap();
/// assert_eq!(id, 1);
///
/// let found = store.get_elements("guilds", Some(&Query::eq("uuid", "g1"))).unwrap();
/// assert_eq!(found[0].data["name"], "X");
/// ```
pub struct DocumentStore {
    backend: Arc<dyn ScoreboardBackend>,
    config: Config,
    stats: StoreStats,
}

impl DocumentStore {
    /// Creates a store over a backend.
    pub fn new(backend: Arc<dyn ScoreboardBackend>, config: Config) -> Self {
        Self {
            backend,
            config,
            stats: StoreStats::new(),
        }
    }

    /// Creates a store over a fresh in-memory scoreboard.
    pub fn open_in_memory() -> Self {
        Self::new(Arc::new(InMemoryScoreboard::new()), Config::default())
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<dyn ScoreboardBackend> {
        &self.backend
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the statistics counters.
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    // === Writes ===

    /// Saves a document and returns its new id.
    ///
    /// The id is one more than the highest id in the collection (ids start
    /// at 1). The collection is created if it does not exist.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a bad collection name, a document that does
    ///   not serialize or serializes to `null`, or an exhausted id space
    /// - `SizeLimitExceeded` if the serialized document is too long
    /// - `CollectionAccess` if the backend fails
    ///
    /// Nothing is written when an error is returned.
    pub fn save<T>(&self, collection: &str, document: &T) -> CoreResult<RecordId>
    where
        T: Serialize + ?Sized,
    {
        self.check_name(collection)?;
        let content = codec::encode(collection, document, &self.config)?;

        let objective = self.objective(collection)?;
        let entries = self.entries(collection, &objective)?;
        let highest = entries.iter().map(|e| e.score).fold(0, RecordId::max);
        let id = highest
            .checked_add(1)
            .ok_or_else(|| CoreError::invalid_argument("record id space exhausted"))?;

        self.note_collision(collection, &entries, &content, id);
        self.write(collection, &objective, &content, id)?;
        debug!(collection, id, "saved document");
        Ok(id)
    }

    /// Replaces the document of a record, keeping its id.
    ///
    /// Returns `false` without side effects if no record has this id.
    ///
    /// # Errors
    ///
    /// Same validation as [`save`](Self::save).
    pub fn update_by_id<T>(&self, collection: &str, id: RecordId, document: &T) -> CoreResult<bool>
    where
        T: Serialize + ?Sized,
    {
        self.check_name(collection)?;
        let content = codec::encode(collection, document, &self.config)?;

        let Some(objective) = self.existing(collection)? else {
            return Ok(false);
        };
        let entries = self.entries(collection, &objective)?;
        let query = Query::id(id);
        let Some((old, _)) = self.matching(collection, entries.clone(), Some(&query)).next() else {
            return Ok(false);
        };

        self.replace(collection, &objective, &entries, &old.participant, &content, id)?;
        debug!(collection, id, "replaced document");
        Ok(true)
    }

    /// Rewrites every record matching `query` and returns how many were
    /// touched.
    ///
    /// All replacement documents are computed and validated before the first
    /// write, so a rejected replacement leaves the collection unchanged.
    ///
    /// The count is the number of records rewritten, not the number left
    /// afterwards. A replacement identical to another record's content
    /// collapses onto it, as with [`save`](Self::save): updating `{"v":1}`
    /// and `{"v":2}` with `v + 1` returns 2 and leaves one record.
    ///
    /// # Errors
    ///
    /// Same validation as [`save`](Self::save), applied to each replacement.
    pub fn update(&self, collection: &str, query: &Query<'_>, update: Update<'_>) -> CoreResult<usize> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(0);
        };
        let entries = self.entries(collection, &objective)?;

        let mut planned = Vec::new();
        for (entry, document) in self.matching(collection, entries.clone(), Some(query)) {
            let replacement = update.apply(&document);
            let content = codec::encode(collection, &replacement, &self.config)?;
            planned.push((entry, content));
        }

        for (entry, content) in &planned {
            self.replace(
                collection,
                &objective,
                &entries,
                &entry.participant,
                content,
                entry.score,
            )?;
        }

        debug!(collection, touched = planned.len(), "updated documents");
        Ok(planned.len())
    }

    /// Deletes the record with this id. Returns `false` if there is none.
    ///
    /// An entry whose content does not parse is absent here as it is for
    /// reads, and is left in place.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn delete_by_id(&self, collection: &str, id: RecordId) -> CoreResult<bool> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(false);
        };
        let entries = self.entries(collection, &objective)?;
        let query = Query::id(id);
        let Some((entry, _)) = self.matching(collection, entries, Some(&query)).next() else {
            return Ok(false);
        };

        self.remove(collection, &objective, &entry.participant)?;
        debug!(collection, id, "deleted document");
        Ok(true)
    }

    /// Deletes every record matching `query` and returns how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn delete(&self, collection: &str, query: &Query<'_>) -> CoreResult<usize> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(0);
        };
        let entries = self.entries(collection, &objective)?;
        let doomed: Vec<ScoreEntry> = self
            .matching(collection, entries, Some(query))
            .map(|(entry, _)| entry)
            .collect();

        for entry in &doomed {
            self.remove(collection, &objective, &entry.participant)?;
        }

        debug!(collection, removed = doomed.len(), "deleted documents");
        Ok(doomed.len())
    }

    /// Removes every entry of a collection. A missing collection is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn clear(&self, collection: &str) -> CoreResult<()> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(());
        };
        let entries = self.entries(collection, &objective)?;
        for entry in &entries {
            self.remove(collection, &objective, &entry.participant)?;
        }
        debug!(collection, removed = entries.len(), "cleared collection");
        Ok(())
    }

    // === Reads ===

    /// Returns the document with this id, or `None` if there is no record
    /// with this id or its content does not parse.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn get_by_id(&self, collection: &str, id: RecordId) -> CoreResult<Option<Document>> {
        let query = Query::id(id);
        Ok(self
            .first(collection, Some(&query))?
            .map(|record| record.data))
    }

    /// Returns every record matching `query` (all records if `None`), in
    /// enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn get_elements(&self, collection: &str, query: Option<&Query<'_>>) -> CoreResult<Vec<Record>> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(Vec::new());
        };
        let entries = self.entries(collection, &objective)?;
        Ok(self
            .matching(collection, entries, query)
            .map(|(entry, data)| Record::new(entry.score, data))
            .collect())
    }

    /// Returns the first record for which the predicate holds.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn find<F>(&self, collection: &str, predicate: F) -> CoreResult<Option<Record>>
    where
        F: Fn(&Document) -> bool,
    {
        let query = Query::predicate(predicate);
        self.first(collection, Some(&query))
    }

    /// Returns every record for which the predicate holds.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn find_all<F>(&self, collection: &str, predicate: F) -> CoreResult<Vec<Record>>
    where
        F: Fn(&Document) -> bool,
    {
        let query = Query::predicate(predicate);
        self.get_elements(collection, Some(&query))
    }

    /// Returns `true` if any record matches.
    ///
    /// Without a query this checks that the collection has at least one
    /// entry. An id query compares ids only and never parses content; other
    /// queries parse entries until the first match.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn exists(&self, collection: &str, query: Option<&Query<'_>>) -> CoreResult<bool> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(false);
        };
        let entries = self.entries(collection, &objective)?;
        Ok(match query {
            None => !entries.is_empty(),
            Some(q) if !q.needs_document() => entries.iter().any(|e| q.matches_id(e.score)),
            Some(q) => self.matching(collection, entries, Some(q)).next().is_some(),
        })
    }

    /// Counts matching records.
    ///
    /// Without a query this is the number of entries in the collection. Id
    /// queries are evaluated without parsing, as in [`exists`](Self::exists).
    ///
    /// # Errors
    ///
    /// Returns an error for a bad collection name or a backend failure.
    pub fn count(&self, collection: &str, query: Option<&Query<'_>>) -> CoreResult<usize> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(0);
        };
        let entries = self.entries(collection, &objective)?;
        Ok(match query {
            None => entries.len(),
            Some(q) if !q.needs_document() => {
                entries.iter().filter(|e| q.matches_id(e.score)).count()
            }
            Some(q) => self.matching(collection, entries, Some(q)).count(),
        })
    }

    /// Returns `true` if the collection exists, without creating it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad collection name.
    pub fn collection_exists(&self, collection: &str) -> CoreResult<bool> {
        self.check_name(collection)?;
        Ok(self.backend.has_objective(collection))
    }

    /// Returns the names of all collections in the backend.
    pub fn collections(&self) -> Vec<String> {
        self.backend.objective_names()
    }

    // === Internals ===

    fn check_name(&self, collection: &str) -> CoreResult<()> {
        if collection.is_empty() {
            return Err(CoreError::invalid_argument("collection name is empty"));
        }
        let len = collection.chars().count();
        if len > self.config.max_name_len {
            return Err(CoreError::invalid_argument(format!(
                "collection name {collection:?} is {len} characters, limit is {}",
                self.config.max_name_len
            )));
        }
        Ok(())
    }

    fn objective(&self, collection: &str) -> CoreResult<Objective> {
        self.backend
            .objective(collection)
            .map_err(|e| CoreError::collection_access(collection, e))
    }

    fn existing(&self, collection: &str) -> CoreResult<Option<Objective>> {
        if !self.backend.has_objective(collection) {
            return Ok(None);
        }
        self.objective(collection).map(Some)
    }

    fn entries(&self, collection: &str, objective: &Objective) -> CoreResult<Vec<ScoreEntry>> {
        self.stats.record_scan();
        self.backend
            .entries(objective)
            .map_err(|e| CoreError::collection_access(collection, e))
    }

    fn parse(&self, collection: &str, entry: &ScoreEntry) -> Option<Document> {
        match codec::decode(&entry.participant) {
            Some(document) => {
                self.stats.record_parse();
                Some(document)
            }
            None => {
                self.stats.record_parse_failure();
                trace!(collection, score = entry.score, "skipping malformed entry");
                None
            }
        }
    }

    /// Lazily yields parsed entries that match `query`.
    ///
    /// Id queries reject non-matching entries before parsing them.
    fn matching<'a>(
        &'a self,
        collection: &'a str,
        entries: Vec<ScoreEntry>,
        query: Option<&'a Query<'a>>,
    ) -> impl Iterator<Item = (ScoreEntry, Document)> + 'a {
        entries.into_iter().filter_map(move |entry| {
            if let Some(q) = query {
                if !q.needs_document() && !q.matches_id(entry.score) {
                    return None;
                }
            }
            let document = self.parse(collection, &entry)?;
            match query {
                Some(q) if !q.matches(entry.score, &document) => None,
                _ => Some((entry, document)),
            }
        })
    }

    fn first(&self, collection: &str, query: Option<&Query<'_>>) -> CoreResult<Option<Record>> {
        self.check_name(collection)?;
        let Some(objective) = self.existing(collection)? else {
            return Ok(None);
        };
        let entries = self.entries(collection, &objective)?;
        Ok(self
            .matching(collection, entries, query)
            .next()
            .map(|(entry, data)| Record::new(entry.score, data)))
    }

    fn write(&self, collection: &str, objective: &Objective, content: &str, id: RecordId) -> CoreResult<()> {
        self.backend
            .set_score(objective, content, id)
            .map_err(|e| CoreError::collection_access(collection, e))?;
        self.stats.record_write();
        Ok(())
    }

    fn remove(&self, collection: &str, objective: &Objective, content: &str) -> CoreResult<()> {
        let removed = self
            .backend
            .remove_participant(objective, content)
            .map_err(|e| CoreError::collection_access(collection, e))?;
        if removed {
            self.stats.record_delete();
        }
        Ok(())
    }

    /// Writes `content` under `id`, then drops the record's previous content.
    fn replace(
        &self,
        collection: &str,
        objective: &Objective,
        entries: &[ScoreEntry],
        old_content: &str,
        content: &str,
        id: RecordId,
    ) -> CoreResult<()> {
        if old_content != content {
            self.note_collision(collection, entries, content, id);
        }
        self.write(collection, objective, content, id)?;
        if old_content != content {
            self.remove(collection, objective, old_content)?;
        }
        Ok(())
    }

    fn note_collision(&self, collection: &str, entries: &[ScoreEntry], content: &str, id: RecordId) {
        let Some(owner) = entries.iter().find(|e| e.participant == content) else {
            return;
        };
        if owner.score == id {
            return;
        }
        self.stats.record_collision();
        if self.config.warn_on_collision {
            warn!(
                collection,
                previous_id = owner.score,
                id,
                "identical content already stored; entry now carries the new id"
            );
        }
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}
