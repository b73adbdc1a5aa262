//! # ScoreDB Storage
//!
//! Backing store trait and implementations for ScoreDB.
//!
//! This crate provides the lowest-level storage abstraction for ScoreDB: a
//! scoreboard. A scoreboard holds named **objectives**, and every objective
//! holds `(participant, score)` entries. Backends are **opaque string
//! stores** - they do not interpret participant strings.
//!
//! ## Design Principles
//!
//! - The participant string is the identity key of an entry; the score is an
//!   attribute attached to it
//! - Writing an existing participant only rewrites its score
//! - Backends enforce their own host limits (name and content length)
//! - Must be `Send + Sync` so a store can be shared across handles
//!
//! ## Available Backends
//!
//! - [`InMemoryScoreboard`] - For testing and ephemeral storage
//! - [`FileScoreboard`] - Persistent storage as a JSON snapshot file
//!
//! ## Example
//!
//! ```rust
//! use scoredb_storage::{InMemoryScoreboard, ScoreboardBackend};
//!
//! let board = InMemoryScoreboard::new();
//! let users = board.objective("users").unwrap();
//! board.set_score(&users, r#"{"name":"alice"}"#, 1).unwrap();
//! assert_eq!(board.entries(&users).unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod limits;
mod memory;

pub use backend::{Objective, Score, ScoreEntry, ScoreboardBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileScoreboard;
pub use limits::HostLimits;
pub use memory::InMemoryScoreboard;
