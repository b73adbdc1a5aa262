//! Binding rules between collections.

use crate::error::{CoreError, CoreResult};

/// Which side of a relation holds the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The source document's local field references the target field.
    Direct,
    /// Target documents reference the source document's local field.
    Reverse,
}

/// A relation rule from a source collection to a target collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Collection whose documents get populated.
    pub source: String,
    /// Field of the source document holding the key.
    pub local_field: String,
    /// Collection holding the related documents.
    pub target: String,
    /// Field of the target documents compared against the key.
    pub target_field: String,
    /// Field of the output document receiving the related document(s).
    pub alias: String,
    /// Which side holds the reference.
    pub direction: Direction,
}

impl Binding {
    /// Creates a direct binding: `source.local_field` references
    /// `target.target_field`.
    pub fn direct(
        source: impl Into<String>,
        local_field: impl Into<String>,
        target: impl Into<String>,
        target_field: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            local_field: local_field.into(),
            target: target.into(),
            target_field: target_field.into(),
            alias: alias.into(),
            direction: Direction::Direct,
        }
    }

    /// Creates a reverse binding: `target.target_field` references
    /// `source.local_field`.
    pub fn reverse(
        source: impl Into<String>,
        local_field: impl Into<String>,
        target: impl Into<String>,
        target_field: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            direction: Direction::Reverse,
            ..Self::direct(source, local_field, target, target_field, alias)
        }
    }

    /// Returns `true` for reverse bindings.
    pub fn is_reverse(&self) -> bool {
        self.direction == Direction::Reverse
    }

    /// Checks that no field of the binding is empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` naming the first empty field.
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("source", &self.source),
            ("local_field", &self.local_field),
            ("target", &self.target),
            ("target_field", &self.target_field),
            ("alias", &self.alias),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(CoreError::invalid_argument(format!(
                    "binding {name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
