//! Database connection configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::sqlite::database::connection::PoolOptions;

/// SQLite connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// File path, `file:` URL, or `:memory:`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database (milliseconds).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_url() -> String {
    "parimutuel.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl DatabaseConfig {
    /// Settings for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: ":memory:".to_string(),
            ..Self::default()
        }
    }

    /// Pool options derived from this config.
    #[must_use]
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_size: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}
