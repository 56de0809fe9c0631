//! Configuration for the SQLite-backed key store.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Settings for [`SqliteStore`](crate::SqliteStore).
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: PathBuf,
    /// How long a storage call may wait on a locked database before it
    /// fails with `StorageUnavailable`, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

pub(crate) fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl SqliteConfig {
    /// Create a config for `path` with the default busy timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }

    /// Override the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// The busy timeout as a [`Duration`].
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let yaml = r#"
path: /var/lib/keys/pool.db
busy_timeout_ms: 250
"#;
        let config: SqliteConfig = serde_yaml::from_str(yaml).expect("parse config");
        assert_eq!(config.path, PathBuf::from("/var/lib/keys/pool.db"));
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_busy_timeout_defaults_when_missing() {
        let yaml = "path: pool.db\n";
        let config: SqliteConfig = serde_yaml::from_str(yaml).expect("parse config");
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SqliteConfig::new("pool.db").with_busy_timeout(Duration::from_secs(1));
        assert_eq!(config.busy_timeout_ms, 1_000);
    }
}
