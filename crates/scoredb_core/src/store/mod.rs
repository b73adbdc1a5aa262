//! Storage engine.
//!
//! [`DocumentStore`] persists JSON documents as participant strings of a
//! scoreboard objective, with the record id stored as the score.

pub(crate) mod codec;
mod document_store;

pub use document_store::DocumentStore;
