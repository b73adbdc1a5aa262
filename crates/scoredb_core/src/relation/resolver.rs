//! Binding registry and population.

use crate::cache::CachedStore;
use crate::error::CoreResult;
use crate::query::values_equal;
use crate::relation::binding::{Binding, Direction};
use crate::store::DocumentStore;
use crate::types::{Document, Record};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Where related documents are read from.
///
/// Implemented by [`DocumentStore`] (reads the backend) and [`CachedStore`]
/// (reads the RAM mirror). "First match" follows the order of `records`.
pub trait RecordSource {
    /// Returns every record of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    fn records(&self, collection: &str) -> CoreResult<Vec<Record>>;
}

impl RecordSource for DocumentStore {
    fn records(&self, collection: &str) -> CoreResult<Vec<Record>> {
        self.get_elements(collection, None)
    }
}

impl RecordSource for CachedStore {
    fn records(&self, collection: &str) -> CoreResult<Vec<Record>> {
        self.get_all(collection)
    }
}

/// Registry of bindings, keyed by source collection.
///
/// Bindings for a collection are applied in registration order. Aliases are
/// not deduplicated: when two bindings share an alias, the later one wins.
///
/// # Example
///
/// ```rust
/// use scoredb_core::{Binding, DocumentStore, RelationRegistry};
/// use serde_json::json;
///
/// let store = DocumentStore::open_in_memory();
/// store.save("guilds", &json!({"uuid": "g1", "name": "X"})).unwrap();
///
/// let relations = RelationRegistry::new();
/// relations
///     .bind(Binding::direct("users", "guildId", "guilds", "uuid", "guildData"))
///     .unwrap();
///
/// let user = json!({"name": "alice", "guildId": "g1"});
/// let hydrated = relations.populate(&store, "users", &user, None).unwrap();
/// assert_eq!(hydrated["guildData"]["name"], "X");
/// ```
#[derive(Debug, Default)]
pub struct RelationRegistry {
    bindings: RwLock<HashMap<String, Vec<Binding>>>,
}

impl RelationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any field of the binding is empty.
    pub fn bind(&self, binding: Binding) -> CoreResult<()> {
        binding.validate()?;
        tracing::debug!(
            source = %binding.source,
            target = %binding.target,
            alias = %binding.alias,
            direction = ?binding.direction,
            "registered binding"
        );
        self.bindings
            .write()
            .entry(binding.source.clone())
            .or_default()
            .push(binding);
        Ok(())
    }

    /// Registers a direct binding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any argument is empty.
    pub fn bind_direct(
        &self,
        source: &str,
        local_field: &str,
        target: &str,
        target_field: &str,
        alias: &str,
    ) -> CoreResult<()> {
        self.bind(Binding::direct(source, local_field, target, target_field, alias))
    }

    /// Registers a reverse binding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any argument is empty.
    pub fn bind_reverse(
        &self,
        source: &str,
        local_field: &str,
        target: &str,
        target_field: &str,
        alias: &str,
    ) -> CoreResult<()> {
        self.bind(Binding::reverse(source, local_field, target, target_field, alias))
    }

    /// Returns the bindings registered for a source collection.
    pub fn bindings_for(&self, collection: &str) -> Vec<Binding> {
        self.bindings
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the total number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.read().values().map(Vec::len).sum()
    }

    /// Returns `true` if no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every binding.
    ///
    /// Call this when (re)initializing so bindings registered by a previous
    /// start-up do not accumulate.
    pub fn reset(&self) {
        self.bindings.write().clear();
    }

    /// Returns a hydrated copy of `input`.
    ///
    /// `input` may be `null` (returned as is), an array of documents
    /// (populated element-wise) or a single document. With `aliases`, only
    /// bindings whose alias is listed are applied, so unrelated target
    /// collections are never read.
    ///
    /// For each applied binding the alias is always set:
    ///
    /// - local field absent or `null`: `null` (direct) or `[]` (reverse)
    /// - direct, scalar key: the first target whose field equals the key,
    ///   or `null`
    /// - direct, array of keys: the first match of each key; keys without
    ///   a match are dropped
    /// - reverse: every target whose field equals the key or is an array
    ///   containing it
    ///
    /// Non-object documents are returned unchanged. The input is never
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if a target collection cannot be read.
    pub fn populate<S>(
        &self,
        source: &S,
        collection: &str,
        input: &Value,
        aliases: Option<&[&str]>,
    ) -> CoreResult<Value>
    where
        S: RecordSource + ?Sized,
    {
        if input.is_null() {
            return Ok(Value::Null);
        }

        let bindings: Vec<Binding> = self
            .bindings_for(collection)
            .into_iter()
            .filter(|b| aliases.map_or(true, |wanted| wanted.contains(&b.alias.as_str())))
            .collect();

        let mut targets = Targets::new(source);
        match input {
            Value::Array(documents) => {
                let hydrated = documents
                    .iter()
                    .map(|doc| hydrate(doc, &bindings, &mut targets))
                    .collect::<CoreResult<Vec<_>>>()?;
                Ok(Value::Array(hydrated))
            }
            document => hydrate(document, &bindings, &mut targets),
        }
    }
}

/// Target collections read during one `populate` call, each read once.
struct Targets<'a, S: ?Sized> {
    source: &'a S,
    loaded: HashMap<String, Vec<Record>>,
}

impl<'a, S: RecordSource + ?Sized> Targets<'a, S> {
    fn new(source: &'a S) -> Self {
        Self {
            source,
            loaded: HashMap::new(),
        }
    }

    fn get(&mut self, collection: &str) -> CoreResult<&[Record]> {
        if !self.loaded.contains_key(collection) {
            let records = self.source.records(collection)?;
            self.loaded.insert(collection.to_string(), records);
        }
        Ok(self
            .loaded
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}

fn hydrate<S>(document: &Document, bindings: &[Binding], targets: &mut Targets<'_, S>) -> CoreResult<Document>
where
    S: RecordSource + ?Sized,
{
    let Value::Object(fields) = document else {
        return Ok(document.clone());
    };

    let mut output: Map<String, Value> = fields.clone();
    for binding in bindings {
        let key = fields.get(&binding.local_field).filter(|v| !v.is_null());
        let related = match (binding.direction, key) {
            (Direction::Direct, None) => Value::Null,
            (Direction::Reverse, None) => Value::Array(Vec::new()),
            (Direction::Direct, Some(Value::Array(keys))) => {
                let records = targets.get(&binding.target)?;
                Value::Array(
                    keys.iter()
                        .filter_map(|k| first_match(records, &binding.target_field, k))
                        .collect(),
                )
            }
            (Direction::Direct, Some(k)) => {
                let records = targets.get(&binding.target)?;
                first_match(records, &binding.target_field, k).unwrap_or(Value::Null)
            }
            (Direction::Reverse, Some(k)) => {
                let records = targets.get(&binding.target)?;
                Value::Array(
                    records
                        .iter()
                        .filter(|r| references(&r.data, &binding.target_field, k))
                        .map(|r| r.data.clone())
                        .collect(),
                )
            }
        };
        output.insert(binding.alias.clone(), related);
    }
    Ok(Value::Object(output))
}

fn first_match(records: &[Record], field: &str, key: &Value) -> Option<Document> {
    records
        .iter()
        .find(|r| r.data.get(field).is_some_and(|v| values_equal(v, key)))
        .map(|r| r.data.clone())
}

fn references(document: &Document, field: &str, key: &Value) -> bool {
    let Some(value) = document.get(field) else {
        return false;
    };
    if values_equal(value, key) {
        return true;
    }
    matches!(value, Value::Array(items) if items.iter().any(|item| values_equal(item, key)))
}
