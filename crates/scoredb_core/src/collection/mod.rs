//! Typed collection API.
//!
//! Provides `Collection<T>` for type-safe record storage with automatic
//! JSON encoding/decoding via serde.

mod typed;

pub use typed::Collection;
