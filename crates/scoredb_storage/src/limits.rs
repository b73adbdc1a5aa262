//! Host limits enforced by a scoreboard.

use crate::error::{StorageError, StorageResult};

/// Physical limits of the host scoreboard.
///
/// The reference host accepts objective names of up to 16 characters and
/// participant strings of up to 32 767 characters. Lengths are counted in
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostLimits {
    /// Maximum objective name length in characters.
    pub max_objective_name_len: usize,
    /// Maximum participant length in characters.
    pub max_participant_len: usize,
}

impl HostLimits {
    /// Limits of the reference host.
    pub const REFERENCE: Self = Self {
        max_objective_name_len: 16,
        max_participant_len: 32_767,
    };

    /// Creates limits with explicit bounds.
    #[must_use]
    pub const fn new(max_objective_name_len: usize, max_participant_len: usize) -> Self {
        Self {
            max_objective_name_len,
            max_participant_len,
        }
    }

    /// Checks an objective name against these limits.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] if the name is empty or too long.
    pub fn check_name(&self, name: &str) -> StorageResult<()> {
        if name.is_empty() {
            return Err(StorageError::invalid_name(name, "name is empty"));
        }
        let len = name.chars().count();
        if len > self.max_objective_name_len {
            return Err(StorageError::invalid_name(
                name,
                format!(
                    "{len} characters exceeds the limit of {}",
                    self.max_objective_name_len
                ),
            ));
        }
        Ok(())
    }

    /// Checks a participant string against these limits.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ContentTooLong`] if the participant is too long.
    pub fn check_participant(&self, participant: &str) -> StorageResult<()> {
        let len = participant.chars().count();
        if len > self.max_participant_len {
            return Err(StorageError::ContentTooLong {
                len,
                max: self.max_participant_len,
            });
        }
        Ok(())
    }
}

impl Default for HostLimits {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_limits() {
        let limits = HostLimits::default();
        assert_eq!(limits.max_objective_name_len, 16);
        assert_eq!(limits.max_participant_len, 32_767);
    }

    #[test]
    fn empty_name_rejected() {
        let result = HostLimits::REFERENCE.check_name("");
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[test]
    fn name_length_counts_characters() {
        let limits = HostLimits::REFERENCE;
        assert!(limits.check_name("abcdefghijklmnop").is_ok());
        assert!(limits.check_name("abcdefghijklmnopq").is_err());
        // 16 multi-byte characters still fit
        assert!(limits.check_name(&"é".repeat(16)).is_ok());
    }

    #[test]
    fn participant_bound() {
        let limits = HostLimits::new(16, 4);
        assert!(limits.check_participant("abcd").is_ok());
        assert!(matches!(
            limits.check_participant("abcde"),
            Err(StorageError::ContentTooLong { len: 5, max: 4 })
        ));
    }
}
