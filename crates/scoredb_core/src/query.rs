//! Query and update descriptions.
//!
//! A [`Query`] selects records during a scan. Equality filters compare
//! top-level fields only; predicates see the whole parsed document; id
//! queries never need the document at all, which lets `exists` and `count`
//! skip parsing entirely.

use crate::error::{CoreError, CoreResult};
use crate::types::{Document, RecordId};
use serde_json::{Map, Value};
use std::fmt;

/// An equality filter: every listed field must equal the given value.
///
/// Matching is shallow. A document missing a listed field does not match,
/// and non-object documents match only the empty filter.
///
/// ```rust
/// use scoredb_core::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new().eq("role", "admin").eq("active", true);
/// assert!(filter.matches(&json!({"role": "admin", "active": true, "x": 1})));
/// assert!(!filter.matches(&json!({"role": "admin"})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// Creates an empty filter, which matches every document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field value.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Builds a filter from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not an object.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CoreError::invalid_argument(format!(
                "equality query must be an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Returns `true` if the filter has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the filter fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns `true` if the document satisfies every field.
    pub fn matches(&self, document: &Document) -> bool {
        if self.fields.is_empty() {
            return true;
        }
        let Some(object) = document.as_object() else {
            return false;
        };
        self.fields.iter().all(|(field, expected)| {
            object
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }
}

impl From<Map<String, Value>> for Filter {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// A predicate over a parsed document.
pub type Predicate<'a> = Box<dyn Fn(&Document) -> bool + 'a>;

/// Selects records during a scan.
pub enum Query<'a> {
    /// Match the record with this id. Evaluated without parsing content.
    Id(RecordId),
    /// Match records whose fields equal the filter's values.
    Equality(Filter),
    /// Match records for which the predicate returns `true`.
    Predicate(Predicate<'a>),
}

impl<'a> Query<'a> {
    /// Creates an id query.
    pub fn id(id: RecordId) -> Self {
        Self::Id(id)
    }

    /// Creates a single-field equality query.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equality(Filter::new().eq(field, value))
    }

    /// Creates an equality query from a filter.
    pub fn filter(filter: Filter) -> Self {
        Self::Equality(filter)
    }

    /// Creates a predicate query.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Document) -> bool + 'a,
    {
        Self::Predicate(Box::new(f))
    }

    /// Returns `true` if evaluating the query requires the parsed document.
    pub fn needs_document(&self) -> bool {
        !matches!(self, Self::Id(_))
    }

    /// Returns `true` if the id alone satisfies an id query.
    ///
    /// Only meaningful when [`needs_document`](Self::needs_document) is false.
    pub(crate) fn matches_id(&self, id: RecordId) -> bool {
        matches!(self, Self::Id(wanted) if *wanted == id)
    }

    /// Returns `true` if the record matches.
    pub fn matches(&self, id: RecordId, document: &Document) -> bool {
        match self {
            Self::Id(wanted) => *wanted == id,
            Self::Equality(filter) => filter.matches(document),
            Self::Predicate(predicate) => predicate(document),
        }
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::Equality(filter) => f.debug_tuple("Equality").field(filter).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<Filter> for Query<'_> {
    fn from(filter: Filter) -> Self {
        Self::Equality(filter)
    }
}

impl From<RecordId> for Query<'_> {
    fn from(id: RecordId) -> Self {
        Self::Id(id)
    }
}

/// A transform from an old document to its replacement.
pub type Transform<'a> = Box<dyn Fn(&Document) -> Document + 'a>;

/// How `update` rewrites each matching record.
pub enum Update<'a> {
    /// Shallow merge: fields of the patch overwrite the old document's
    /// fields, other fields are preserved. A non-object old document or
    /// patch is replaced by the patch.
    Merge(Document),
    /// Replace the document with the transform's result.
    Transform(Transform<'a>),
}

impl<'a> Update<'a> {
    /// Creates a merge update.
    pub fn merge(patch: impl Into<Document>) -> Self {
        Self::Merge(patch.into())
    }

    /// Creates a transform update.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&Document) -> Document + 'a,
    {
        Self::Transform(Box::new(f))
    }

    /// Computes the replacement for an old document.
    pub fn apply(&self, old: &Document) -> Document {
        match self {
            Self::Merge(patch) => match (old, patch) {
                (Value::Object(base), Value::Object(fields)) => {
                    let mut merged = base.clone();
                    for (key, value) in fields {
                        merged.insert(key.clone(), value.clone());
                    }
                    Value::Object(merged)
                }
                _ => patch.clone(),
            },
            Self::Transform(transform) => transform(old),
        }
    }
}

impl fmt::Debug for Update<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge(patch) => f.debug_tuple("Merge").field(patch).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// Strict value equality.
///
/// Structural, except that numbers compare by numeric value so `1` equals
/// `1.0`. Values of different JSON types are never equal.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.matches(&json!({"a": 1})));
        assert!(filter.matches(&json!(42)));
    }

    #[test]
    fn missing_field_is_mismatch() {
        let filter = Filter::new().eq("k", Value::Null);
        assert!(!filter.matches(&json!({"other": 1})));
        assert!(filter.matches(&json!({"k": null})));
    }

    #[test]
    fn comparison_is_strict_on_type() {
        let filter = Filter::new().eq("n", 1);
        assert!(filter.matches(&json!({"n": 1})));
        assert!(filter.matches(&json!({"n": 1.0})));
        assert!(!filter.matches(&json!({"n": "1"})));
        assert!(!filter.matches(&json!({"n": true})));
    }

    #[test]
    fn matching_is_shallow() {
        let filter = Filter::new().eq("name", "x");
        assert!(!filter.matches(&json!({"inner": {"name": "x"}})));
    }

    #[test]
    fn non_object_documents_do_not_match() {
        let filter = Filter::new().eq("a", 1);
        assert!(!filter.matches(&json!([1, 2])));
        assert!(!filter.matches(&json!("a")));
    }

    #[test]
    fn filter_from_value_requires_object() {
        assert!(Filter::from_value(json!({"a": 1})).is_ok());
        let err = Filter::from_value(json!([1])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn query_dispatch() {
        let doc = json!({"age": 30});
        assert!(Query::id(3).matches(3, &doc));
        assert!(!Query::id(3).matches(4, &doc));
        assert!(Query::eq("age", 30).matches(1, &doc));
        assert!(Query::predicate(|d| d["age"].as_i64() > Some(18)).matches(1, &doc));
        assert!(!Query::id(1).needs_document());
        assert!(Query::eq("age", 30).needs_document());
    }

    #[test]
    fn merge_preserves_untouched_fields() {
        let update = Update::merge(json!({"b": 20, "c": 3}));
        let result = update.apply(&json!({"a": 1, "b": 2}));
        assert_eq!(result, json!({"a": 1, "b": 20, "c": 3}));
    }

    #[test]
    fn merge_onto_non_object_replaces() {
        let update = Update::merge(json!({"a": 1}));
        assert_eq!(update.apply(&json!("old")), json!({"a": 1}));
    }

    #[test]
    fn transform_replaces() {
        let update = Update::transform(|old| json!({"wrapped": old.clone()}));
        assert_eq!(update.apply(&json!(1)), json!({"wrapped": 1}));
    }

    #[test]
    fn nested_numbers_compare_by_value() {
        assert!(values_equal(&json!([1, {"x": 2}]), &json!([1.0, {"x": 2.0}])));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn query_debug_hides_closures() {
        let q = Query::predicate(|_| true);
        assert_eq!(format!("{q:?}"), "Predicate(..)");
    }
}
