//! # ScoreDB Core
//!
//! A document store layered over a scoreboard-style backend.
//!
//! This crate provides:
//! - The storage engine ([`DocumentStore`]): CRUD and queries over JSON
//!   documents kept as scoreboard entries
//! - A write-through RAM cache ([`CachedStore`])
//! - Relation bindings and hydration ([`RelationRegistry`])
//! - Named schemas with defaults ([`SchemaRegistry`])
//! - Typed collections ([`Collection`])
//! - The [`Database`] context that owns all of the above
//!
//! ```rust
//! use scoredb_core::{Database, Query};
//! use serde_json::json;
//!
//! let db = Database::open_in_memory();
//! let store = db.store();
//! let id = store.save("users", &json!({"name": "alice", "age": 30})).unwrap();
//! assert_eq!(id, 1);
//! assert!(store.exists("users", Some(&Query::eq("age", 30))).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod collection;
mod config;
mod database;
mod error;
pub mod format;
mod query;
mod relation;
mod schema;
mod stats;
mod store;
mod types;

pub use cache::CachedStore;
pub use collection::Collection;
pub use config::Config;
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use query::{Filter, Predicate, Query, Transform, Update};
pub use relation::{Binding, Direction, RecordSource, RelationRegistry};
pub use schema::{FieldDefault, Generator, Schema, SchemaRegistry};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::DocumentStore;
pub use types::{Document, Record, RecordId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
