//! Typed collection implementation.

use crate::error::CoreResult;
use crate::store::DocumentStore;
use crate::types::{Record, RecordId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// A typed view of one collection.
///
/// `Collection<T>` saves values of `T` as JSON documents and reads them
/// back as `T`. Documents in the collection that do not deserialize to `T`
/// are skipped, the same way the engine skips foreign content.
///
/// Filtering is done with host-language closures over `&T`:
///
/// ```rust
/// use scoredb_core::{Collection, DocumentStore};
/// use serde::{Deserialize, Serialize};
/// use std::sync::Arc;
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Player {
///     name: String,
///     level: u32,
/// }
///
/// let store = Arc::new(DocumentStore::open_in_memory());
/// let players: Collection<Player> = Collection::new(store, "players");
///
/// let id = players.save(&Player { name: "alice".into(), level: 3 }).unwrap();
/// let veteran = players.find(|p| p.level > 2).unwrap();
/// assert_eq!(veteran.map(|(found, _)| found), Some(id));
/// ```
pub struct Collection<T> {
    name: String,
    store: Arc<DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    /// Creates a typed view of `name` over a store.
    ///
    /// The collection itself is created on the first save.
    pub fn new(store: Arc<DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saves a value and returns its id.
    pub fn save(&self, value: &T) -> CoreResult<RecordId> {
        self.store.save(&self.name, value)
    }

    /// Gets a value by id.
    ///
    /// Returns `None` if the id is absent or its document is not a `T`.
    pub fn get(&self, id: RecordId) -> CoreResult<Option<T>> {
        Ok(self
            .store
            .get_by_id(&self.name, id)?
            .and_then(|document| serde_json::from_value(document).ok()))
    }

    /// Returns every value in enumeration order.
    pub fn all(&self) -> CoreResult<Vec<(RecordId, T)>> {
        let records = self.store.get_elements(&self.name, None)?;
        Ok(records.into_iter().filter_map(|r| self.decode(r)).collect())
    }

    /// Returns the first value matching a predicate.
    pub fn find<F>(&self, predicate: F) -> CoreResult<Option<(RecordId, T)>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.all()?.into_iter().find(|(_, value)| predicate(value)))
    }

    /// Replaces the value stored under `id`. Returns `false` if absent.
    pub fn update(&self, id: RecordId, value: &T) -> CoreResult<bool> {
        self.store.update_by_id(&self.name, id, value)
    }

    /// Deletes the value stored under `id`. Returns `false` if absent.
    pub fn delete(&self, id: RecordId) -> CoreResult<bool> {
        self.store.delete_by_id(&self.name, id)
    }

    /// Counts the values that decode as `T`.
    pub fn count(&self) -> CoreResult<usize> {
        Ok(self.all()?.len())
    }

    fn decode(&self, record: Record) -> Option<(RecordId, T)> {
        match serde_json::from_value(record.data) {
            Ok(value) => Some((record.id, value)),
            Err(err) => {
                trace!(collection = %self.name, id = record.id, %err, "skipping record of another shape");
                None
            }
        }
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Guild {
        name: String,
        members: u32,
    }

    fn guild(name: &str, members: u32) -> Guild {
        Guild {
            name: name.into(),
            members,
        }
    }

    fn guilds() -> (Arc<DocumentStore>, Collection<Guild>) {
        let store = Arc::new(DocumentStore::open_in_memory());
        let collection = Collection::new(Arc::clone(&store), "guilds");
        (store, collection)
    }

    #[test]
    fn save_and_get() {
        let (_, guilds) = guilds();
        let id = guilds.save(&guild("red", 4)).unwrap();
        assert_eq!(guilds.get(id).unwrap(), Some(guild("red", 4)));
        assert_eq!(guilds.get(id + 1).unwrap(), None);
    }

    #[test]
    fn foreign_documents_are_skipped() {
        let (store, guilds) = guilds();
        store.save("guilds", &json!({"unrelated": true})).unwrap();
        let id = guilds.save(&guild("blue", 2)).unwrap();

        let all = guilds.all().unwrap();
        assert_eq!(all, vec![(id, guild("blue", 2))]);
        assert_eq!(guilds.count().unwrap(), 1);
        assert_eq!(guilds.get(1).unwrap(), None);
    }

    #[test]
    fn find_update_delete() {
        let (_, guilds) = guilds();
        guilds.save(&guild("red", 4)).unwrap();
        let big = guilds.save(&guild("green", 40)).unwrap();

        let (found, value) = guilds.find(|g| g.members > 10).unwrap().unwrap();
        assert_eq!(found, big);
        assert_eq!(value.name, "green");

        assert!(guilds.update(big, &guild("green", 41)).unwrap());
        assert_eq!(guilds.get(big).unwrap().unwrap().members, 41);
        assert!(!guilds.update(99, &guild("ghost", 0)).unwrap());

        assert!(guilds.delete(big).unwrap());
        assert!(!guilds.delete(big).unwrap());
        assert!(guilds.find(|g| g.members > 10).unwrap().is_none());
    }
}
