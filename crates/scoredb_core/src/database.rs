//! Database context object.

use crate::cache::CachedStore;
use crate::collection::Collection;
use crate::config::Config;
use crate::error::CoreResult;
use crate::relation::RelationRegistry;
use crate::schema::SchemaRegistry;
use crate::store::DocumentStore;
use crate::types::{Document, RecordId};
use scoredb_storage::{FileScoreboard, InMemoryScoreboard, ScoreboardBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The main database handle.
///
/// `Database` ties together everything that operates on one backend:
/// - the storage engine ([`DocumentStore`])
/// - the write-through cache ([`CachedStore`])
/// - relation bindings ([`RelationRegistry`])
/// - named schemas ([`SchemaRegistry`])
///
/// Registries live on the handle, so two databases never share bindings
/// or schemas.
///
/// # Example
///
/// ```rust
/// use scoredb_core::{Database, Schema};
/// use serde_json::json;
///
/// let db = Database::open_in_memory();
/// db.schemas().define("guild", Schema::new().field("members", json!([])));
///
/// let guild = db.save_with_schema("guilds", "guild", &json!({"name": "red"})).unwrap();
/// db.cache().save("users", &json!({"name": "alice", "guild": "red"})).unwrap();
/// db.relations().bind_direct("users", "guild", "guilds", "name", "guildData").unwrap();
///
/// let user = db.cache().get_by_id("users", 1).unwrap().unwrap();
/// let hydrated = db.populate("users", &user, None).unwrap();
/// assert_eq!(hydrated["guildData"]["members"], json!([]));
/// # let _ = guild;
/// ```
pub struct Database {
    store: Arc<DocumentStore>,
    cache: CachedStore,
    relations: RelationRegistry,
    schemas: SchemaRegistry,
}

impl Database {
    /// Opens a database over a fresh in-memory scoreboard.
    pub fn open_in_memory() -> Self {
        Self::open_with_backend(Arc::new(InMemoryScoreboard::new()), Config::default())
    }

    /// Opens a database over an existing backend.
    pub fn open_with_backend(backend: Arc<dyn ScoreboardBackend>, config: Config) -> Self {
        let store = Arc::new(DocumentStore::new(backend, config));
        Self {
            cache: CachedStore::new(Arc::clone(&store)),
            store,
            relations: RelationRegistry::new(),
            schemas: SchemaRegistry::new(),
        }
    }

    /// Opens a database persisted to a JSON snapshot file.
    ///
    /// The snapshot is created on the first write if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be read or parsed.
    pub fn open_file(path: &Path) -> CoreResult<Self> {
        let backend = FileScoreboard::open(path)?;
        let config = Config::from_limits(backend.limits());
        debug!(path = %path.display(), "opened file database");
        Ok(Self::open_with_backend(Arc::new(backend), config))
    }

    /// Returns the storage engine.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Returns the cache.
    pub fn cache(&self) -> &CachedStore {
        &self.cache
    }

    /// Returns the relation registry.
    pub fn relations(&self) -> &RelationRegistry {
        &self.relations
    }

    /// Returns the schema registry.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        self.store.config()
    }

    /// Fills `partial` from a named schema and saves it through the cache.
    ///
    /// # Errors
    ///
    /// Returns `SchemaNotFound` for an unknown schema, `InvalidArgument`
    /// for a non-object document, or any error from the save.
    pub fn save_with_schema(
        &self,
        collection: &str,
        schema: &str,
        partial: &Document,
    ) -> CoreResult<RecordId> {
        let document = self.schemas.resolve(schema, partial)?;
        self.cache.save(collection, &document)
    }

    /// Hydrates a document (or array of documents) from `collection`,
    /// reading targets through the cache.
    pub fn populate(
        &self,
        collection: &str,
        value: &Value,
        aliases: Option<&[&str]>,
    ) -> CoreResult<Value> {
        self.relations.populate(&self.cache, collection, value, aliases)
    }

    /// Returns a typed view of a collection.
    pub fn typed_collection<T>(&self, name: impl Into<String>) -> Collection<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Collection::new(Arc::clone(&self.store), name)
    }

    /// Clears bindings, schemas and cache mirrors. Stored records are kept.
    pub fn reset(&self) {
        self.relations.reset();
        self.schemas.reset();
        self.cache.invalidate_all();
        debug!("database context reset");
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("store", &self.store)
            .field("bindings", &self.relations.len())
            .field("schemas", &self.schemas.len())
            .finish()
    }
}
