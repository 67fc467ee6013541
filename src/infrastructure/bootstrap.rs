//! Composition root for runtime wiring.

use std::sync::Arc;

use crate::application::catalog::CatalogService;
use crate::application::pool::PoolAggregator;
use crate::application::wagering::WagerCoordinator;
use crate::infrastructure::config::ledger::LedgerConfig;
use crate::port::outbound::store::{CatalogStore, LedgerStore};

/// The application services, all sharing one store.
pub struct Services<S> {
    pub store: Arc<S>,
    pub wagering: WagerCoordinator<S, S>,
    pub pools: PoolAggregator<S, S>,
    pub catalog: CatalogService<S, S>,
}

impl<S> Services<S>
where
    S: LedgerStore + CatalogStore,
{
    /// Wire every service onto `store` using the ledger settings.
    pub fn new(store: Arc<S>, ledger: &LedgerConfig) -> Self {
        let mut wagering = WagerCoordinator::new(Arc::clone(&store), Arc::clone(&store));
        if let Some(timeout) = ledger.lock_timeout() {
            wagering = wagering.with_lock_timeout(timeout);
        }
        Self {
            pools: PoolAggregator::new(Arc::clone(&store), Arc::clone(&store)),
            catalog: CatalogService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                ledger.initial_tokens,
            ),
            wagering,
            store,
        }
    }
}
