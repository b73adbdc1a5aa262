//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use proptest::prelude::*;
use scoredb_core::RecordId;
use serde_json::{Map, Value};

/// Strategy for generating valid collection names (1 to 16 characters).
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating JSON scalars.
///
/// Floats are multiples of 1/8 so that they survive a text round trip
/// exactly.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-4000..4000i32).prop_map(|n| Value::from(f64::from(n) / 8.0)),
        "[a-zA-Z0-9 ,\"\\\\]{0,12}".prop_map(Value::String),
    ]
}

/// Strategy for generating arbitrary JSON values, nested a few levels.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for generating object documents, the common record shape.
pub fn document_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", value_strategy(), 0..6)
        .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>()))
}

/// Strategy for generating a list of documents with pairwise distinct
/// content, so that no save collides with an earlier one.
pub fn distinct_documents_strategy(max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(document_strategy(), 0..max).prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, mut doc)| {
                if let Value::Object(map) = &mut doc {
                    map.insert("_seq".into(), Value::from(i));
                }
                doc
            })
            .collect()
    })
}

/// A single store operation.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Save a document
    Save {
        /// Document to save
        document: Value,
    },
    /// Replace a record
    Update {
        /// Record id
        id: RecordId,
        /// Replacement document
        document: Value,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: RecordId,
    },
    /// Get a record
    Get {
        /// Record id
        id: RecordId,
    },
}

/// Strategy for generating store operations over small ids.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        3 => document_strategy().prop_map(|document| StoreOperation::Save { document }),
        1 => (1..20i32, document_strategy())
            .prop_map(|(id, document)| StoreOperation::Update { id, document }),
        1 => (1..20i32).prop_map(|id| StoreOperation::Delete { id }),
        2 => (1..20i32).prop_map(|id| StoreOperation::Get { id }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
