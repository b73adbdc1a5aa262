//! Relation resolver.
//!
//! Bindings describe foreign-key-style links between collections. Populating
//! a document injects the linked documents under each binding's alias:
//!
//! - **Direct**: the source document holds the key (or an array of keys)
//!   that identifies records of the target collection.
//! - **Reverse**: target documents hold a field that points back at the
//!   source document, either as a scalar or as a member of an array.

mod binding;
mod resolver;

pub use binding::{Binding, Direction};
pub use resolver::{RecordSource, RelationRegistry};
