//! Store construction shared by the scenario suites.

use std::sync::Arc;

use parimutuel::infrastructure::bootstrap::Services;
use parimutuel::infrastructure::config::ledger::LedgerConfig;
use parimutuel::port::outbound::store::{CatalogStore, LedgerStore};

/// Services over `store` with default ledger settings.
pub fn services<S>(store: S) -> Arc<Services<S>>
where
    S: LedgerStore + CatalogStore,
{
    Arc::new(Services::new(Arc::new(store), &LedgerConfig::default()))
}

/// Sum of every option's probability.
pub fn probability_sum(pool: &parimutuel::domain::pool::PoolSnapshot) -> rust_decimal::Decimal {
    pool.options.iter().map(|o| o.probability).sum()
}
