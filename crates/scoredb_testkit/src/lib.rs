//! # ScoreDB Testkit
//!
//! Test utilities for ScoreDB.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - An instrumented backend that counts scans and writes
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//! - A fuzz harness for operation sequences
//!
//! ## Usage
//!
//! ```rust
//! use scoredb_testkit::prelude::*;
//! use serde_json::json;
//!
//! with_temp_db(|db| {
//!     let id = db.store().save("users", &json!({"name": "alice"})).unwrap();
//!     assert_eq!(id, 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod counting;
pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::counting::*;
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use counting::*;
pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use integration::*;
