//! Ledger behaviour configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::money::Tokens;

/// Balances and wagering limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Balance credited to every newly registered user.
    #[serde(default = "default_initial_tokens")]
    pub initial_tokens: Tokens,
    /// How long a wager waits for its user's lease (milliseconds, 0 = forever).
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_initial_tokens() -> Tokens {
    1000
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

impl LedgerConfig {
    /// The lease timeout, or `None` when disabled.
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_tokens: default_initial_tokens(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}
