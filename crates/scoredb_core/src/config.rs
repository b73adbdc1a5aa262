//! Store configuration.

use scoredb_storage::HostLimits;

/// Configuration for a document store.
///
/// The bounds mirror the physical limits of the backing scoreboard and are
/// checked by the engine before any write reaches the backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum collection name length in characters.
    pub max_name_len: usize,

    /// Maximum serialized document length in characters.
    pub max_content_len: usize,

    /// Whether to log a warning when a write collapses onto content owned by
    /// another record.
    pub warn_on_collision: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_limits(HostLimits::REFERENCE)
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration whose bounds match a host's limits.
    #[must_use]
    pub const fn from_limits(limits: HostLimits) -> Self {
        Self {
            max_name_len: limits.max_objective_name_len,
            max_content_len: limits.max_participant_len,
            warn_on_collision: true,
        }
    }

    /// Sets the maximum collection name length.
    #[must_use]
    pub const fn max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// Sets the maximum serialized document length.
    #[must_use]
    pub const fn max_content_len(mut self, len: usize) -> Self {
        self.max_content_len = len;
        self
    }

    /// Sets whether content collisions are logged.
    #[must_use]
    pub const fn warn_on_collision(mut self, value: bool) -> Self {
        self.warn_on_collision = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.max_name_len, 16);
        assert_eq!(config.max_content_len, 32_767);
        assert!(config.warn_on_collision);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .max_name_len(8)
            .max_content_len(1024)
            .warn_on_collision(false);

        assert_eq!(config.max_name_len, 8);
        assert_eq!(config.max_content_len, 1024);
        assert!(!config.warn_on_collision);
    }

    #[test]
    fn from_custom_limits() {
        let config = Config::from_limits(HostLimits::new(32, 100));
        assert_eq!(config.max_name_len, 32);
        assert_eq!(config.max_content_len, 100);
    }
}
