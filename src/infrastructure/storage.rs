//! Storage lifecycle.
//!
//! [`Storage`] owns the SQLite pool for the life of the process. It is
//! opened once at startup and handed to whatever needs a store.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::{
    create_pool, enable_wal, is_memory_url, run_migrations,
};
use crate::adapter::outbound::sqlite::SqliteStore;
use crate::error::Result;
use crate::infrastructure::config::database::DatabaseConfig;

/// An open, migrated database.
pub struct Storage {
    url: String,
    store: Arc<SqliteStore>,
}

impl Storage {
    /// Open the database, apply pragmas and run pending migrations.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or a migration fails.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let pool = create_pool(&config.url, config.pool_options())?;
        if !is_memory_url(&config.url) {
            enable_wal(&pool)?;
        }
        run_migrations(&pool)?;
        debug!(url = %config.url, "Storage opened");
        Ok(Self {
            url: config.url.clone(),
            store: Arc::new(SqliteStore::new(pool)),
        })
    }

    /// Shared handle to the store.
    #[must_use]
    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::clone(&self.store)
    }

    /// Database location this storage was opened with.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Release the pool. Connections close once outstanding store handles drop.
    pub fn close(self) {
        debug!(url = %self.url, "Storage closed");
    }
}
