//! Schema defaults.
//!
//! A [`Schema`] lists fields with a default value or a generator. Resolving
//! a partial document against a schema fills every field that is missing or
//! `null`, which is how documents are completed before they are saved.

use crate::error::{CoreError, CoreResult};
use crate::types::Document;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh default value on every call.
pub type Generator = Arc<dyn Fn() -> Value + Send + Sync>;

/// How a missing field is filled.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value, cloned into each document.
    Value(Value),
    /// A generator called once per document.
    Generator(Generator),
}

impl FieldDefault {
    fn produce(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Generator(generate) => generate(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// An ordered set of field defaults.
///
/// ```rust
/// use scoredb_core::Schema;
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .field("level", 1)
///     .generated("uuid", || json!("fixed"));
/// let doc = schema.apply(&json!({"name": "steve"})).unwrap();
/// assert_eq!(doc, json!({"name": "steve", "level": 1, "uuid": "fixed"}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldDefault)>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field with a fixed default.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.fields
            .push((name.into(), FieldDefault::Value(default.into())));
        self
    }

    /// Adds a field whose default is generated per document.
    #[must_use]
    pub fn generated<F>(mut self, name: impl Into<String>, generator: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.fields
            .push((name.into(), FieldDefault::Generator(Arc::new(generator))));
        self
    }

    /// Returns the field defaults in declaration order.
    pub fn fields(&self) -> &[(String, FieldDefault)] {
        &self.fields
    }

    /// Returns a copy of `partial` with missing or `null` fields filled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `partial` is not an object.
    pub fn apply(&self, partial: &Document) -> CoreResult<Document> {
        let Value::Object(fields) = partial else {
            return Err(CoreError::invalid_argument(
                "schema input must be an object",
            ));
        };

        let mut document = fields.clone();
        for (name, default) in &self.fields {
            let missing = document.get(name).map_or(true, Value::is_null);
            if missing {
                document.insert(name.clone(), default.produce());
            }
        }
        Ok(Value::Object(document))
    }
}

/// Named schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or replaces a schema.
    pub fn define(&self, name: impl Into<String>, schema: Schema) {
        self.schemas.write().insert(name.into(), schema);
    }

    /// Returns a schema by name.
    pub fn get(&self, name: &str) -> Option<Schema> {
        self.schemas.read().get(name).cloned()
    }

    /// Completes a partial document with a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaNotFound` for an unknown name, or `InvalidArgument` if
    /// `partial` is not an object.
    pub fn resolve(&self, name: &str, partial: &Document) -> CoreResult<Document> {
        let schema = self
            .get(name)
            .ok_or_else(|| CoreError::schema_not_found(name))?;
        schema.apply(partial)
    }

    /// Returns the number of defined schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns `true` if no schema is defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every schema.
    pub fn reset(&self) {
        self.schemas.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn fills_missing_and_null_fields() {
        let schema = Schema::new().field("a", 1).field("b", "x");
        let doc = schema.apply(&json!({"a": null, "c": true})).unwrap();
        assert_eq!(doc, json!({"a": 1, "b": "x", "c": true}));
    }

    #[test]
    fn keeps_present_values() {
        let schema = Schema::new().field("a", 1);
        let doc = schema.apply(&json!({"a": false})).unwrap();
        assert_eq!(doc, json!({"a": false}));
    }

    #[test]
    fn generators_run_per_document() {
        let counter = Arc::new(AtomicI64::new(0));
        let c = Arc::clone(&counter);
        let schema = Schema::new().generated("n", move || json!(c.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(schema.apply(&json!({})).unwrap()["n"], 0);
        assert_eq!(schema.apply(&json!({})).unwrap()["n"], 1);
        assert_eq!(schema.apply(&json!({"n": 9})).unwrap()["n"], 9);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn non_object_rejected() {
        let err = Schema::new().apply(&json!([1])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn registry_resolve_and_reset() {
        let registry = SchemaRegistry::new();
        registry.define("user", Schema::new().field("level", 1));

        let doc = registry.resolve("user", &json!({"name": "a"})).unwrap();
        assert_eq!(doc["level"], 1);

        let err = registry.resolve("guild", &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::SchemaNotFound { .. }));

        registry.reset();
        assert!(registry.is_empty());
    }
}
