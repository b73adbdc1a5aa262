//! RAM mirror over the storage engine.
//!
//! [`CachedStore`] keeps one map of `id -> document` per collection. A
//! collection is loaded with a single full scan the first time it is
//! touched; afterwards reads never reach the backend, and every mutation
//! made through the cache is applied to the mirror once the backend has
//! confirmed it.
//!
//! Writes that bypass the cache (calling [`DocumentStore`] directly, or a
//! second process sharing the backend) are not observed. Call
//! [`CachedStore::invalidate`] after such writes.

use crate::error::CoreResult;
use crate::query::Query;
use crate::store::codec;
use crate::store::DocumentStore;
use crate::types::{Document, Record, RecordId};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

type Mirror = BTreeMap<RecordId, Document>;

/// A write-through cache in front of a [`DocumentStore`].
///
/// # Example
///
/// ```rust
/// use scoredb_core::{CachedStore, DocumentStore};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let cache = CachedStore::new(Arc::new(DocumentStore::open_in_memory()));
/// let id = cache.save("users", &json!({"name": "alice"})).unwrap();
/// assert_eq!(cache.get_by_id("users", id).unwrap(), Some(json!({"name": "alice"})));
/// ```
pub struct CachedStore {
    store: Arc<DocumentStore>,
    mirrors: RwLock<HashMap<String, Mirror>>,
}

impl CachedStore {
    /// Creates an empty cache over a store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            mirrors: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Loads a collection into the mirror unless it is already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial scan fails; nothing is cached then.
    pub fn ensure_loaded(&self, collection: &str) -> CoreResult<()> {
        if self.mirrors.read().contains_key(collection) {
            return Ok(());
        }

        let records = self.store.get_elements(collection, None)?;
        let mut mirror = Mirror::new();
        for record in records {
            mirror.entry(record.id).or_insert(record.data);
        }

        let loaded = mirror.len();
        let mut mirrors = self.mirrors.write();
        if !mirrors.contains_key(collection) {
            mirrors.insert(collection.to_string(), mirror);
            self.store.stats().record_cache_load();
            debug!(collection, records = loaded, "loaded collection into cache");
        }
        Ok(())
    }

    /// Returns `true` if the collection is mirrored.
    pub fn is_loaded(&self, collection: &str) -> bool {
        self.mirrors.read().contains_key(collection)
    }

    /// Returns a document from the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection has to be loaded and the load fails.
    pub fn get_by_id(&self, collection: &str, id: RecordId) -> CoreResult<Option<Document>> {
        self.ensure_loaded(collection)?;
        self.store.stats().record_cache_hit();
        Ok(self
            .mirrors
            .read()
            .get(collection)
            .and_then(|mirror| mirror.get(&id).cloned()))
    }

    /// Returns every mirrored record in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection has to be loaded and the load fails.
    pub fn get_all(&self, collection: &str) -> CoreResult<Vec<Record>> {
        self.ensure_loaded(collection)?;
        self.store.stats().record_cache_hit();
        Ok(self
            .mirrors
            .read()
            .get(collection)
            .map(|mirror| {
                mirror
                    .iter()
                    .map(|(id, data)| Record::new(*id, data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Saves through the store, then mirrors the new record.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the mirror is untouched on failure.
    pub fn save<T>(&self, collection: &str, document: &T) -> CoreResult<RecordId>
    where
        T: Serialize + ?Sized,
    {
        let document = codec::to_document(document)?;
        let id = self.store.save(collection, &document)?;
        self.mirror_write(collection, id, document);
        Ok(id)
    }

    /// Replaces a record through the store, then mirrors the replacement.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the mirror is untouched on failure.
    pub fn update_by_id<T>(&self, collection: &str, id: RecordId, document: &T) -> CoreResult<bool>
    where
        T: Serialize + ?Sized,
    {
        let document = codec::to_document(document)?;
        let updated = self.store.update_by_id(collection, id, &document)?;
        if updated {
            self.mirror_write(collection, id, document);
        }
        Ok(updated)
    }

    /// Deletes a record through the store, then drops it from the mirror.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the mirror is untouched on failure.
    pub fn delete_by_id(&self, collection: &str, id: RecordId) -> CoreResult<bool> {
        let deleted = self.store.delete_by_id(collection, id)?;
        if deleted {
            if let Some(mirror) = self.mirrors.write().get_mut(collection) {
                mirror.remove(&id);
            }
        }
        Ok(deleted)
    }

    /// Clears a collection through the store, then empties its mirror.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the mirror is untouched on failure.
    pub fn clear(&self, collection: &str) -> CoreResult<()> {
        self.store.clear(collection)?;
        if let Some(mirror) = self.mirrors.write().get_mut(collection) {
            mirror.clear();
        }
        Ok(())
    }

    /// Counts mirrored records matching `query` (all if `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection has to be loaded and the load fails.
    pub fn count(&self, collection: &str, query: Option<&Query<'_>>) -> CoreResult<usize> {
        let records = self.get_all(collection)?;
        Ok(match query {
            None => records.len(),
            Some(q) => records.iter().filter(|r| q.matches(r.id, &r.data)).count(),
        })
    }

    /// Drops the mirror of one collection; the next read reloads it.
    pub fn invalidate(&self, collection: &str) {
        if self.mirrors.write().remove(collection).is_some() {
            debug!(collection, "invalidated cached collection");
        }
    }

    /// Drops every mirror.
    pub fn invalidate_all(&self) {
        self.mirrors.write().clear();
    }

    /// Applies a confirmed write. The backend keys entries by content, so any
    /// other id holding identical content has been absorbed by this one.
    fn mirror_write(&self, collection: &str, id: RecordId, document: Document) {
        let mut mirrors = self.mirrors.write();
        let Some(mirror) = mirrors.get_mut(collection) else {
            return;
        };
        mirror.retain(|other, data| *other == id || *data != document);
        mirror.insert(id, document);
    }
}

impl std::fmt::Debug for CachedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mirrors = self.mirrors.read();
        let mut loaded: Vec<&String> = mirrors.keys().collect();
        loaded.sort();
        f.debug_struct("CachedStore")
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}
