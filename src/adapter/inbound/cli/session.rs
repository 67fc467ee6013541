//! One CLI invocation's view of the ledger.

use crate::adapter::outbound::sqlite::SqliteStore;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::storage::Storage;

/// Open storage plus the services wired onto it.
pub struct Session {
    storage: Storage,
    pub services: Services<SqliteStore>,
}

impl Session {
    /// Open and migrate the configured database.
    ///
    /// # Errors
    /// Returns an error if storage cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::open(&config.database)?;
        let services = Services::new(storage.store(), &config.ledger);
        Ok(Self { storage, services })
    }

    /// Database location, for display.
    #[must_use]
    pub fn database(&self) -> &str {
        self.storage.url()
    }

    /// Drop the services and close storage.
    pub fn close(self) {
        let Self { storage, services } = self;
        drop(services);
        storage.close();
    }
}
