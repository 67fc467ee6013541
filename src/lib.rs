//! Parimutuel - token wagering ledger for prediction markets.
//!
//! Users hold token balances and stake them on questions. Every stake lands
//! in a per-question pool, and an option's probability is its share of that
//! pool. There is no market maker and no price curve.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Identifiers, questions, wagers, the wager validator and
//!   pool math. Pure and synchronous.
//! - **`port`** - Store contracts (`BalanceStore`, `StakeStore`,
//!   `LedgerStore`, `CatalogStore`) and the identity contract.
//! - **`application`** - `WagerCoordinator`, `PoolAggregator` and
//!   `CatalogService`.
//! - **`adapter`** - In-memory and SQLite stores, a bearer-token registry and
//!   the operator CLI.
//! - **`infrastructure`** - Configuration, logging, storage lifecycle and
//!   service wiring.
//!
//! # Features
//!
//! - `testkit` - Fixtures and a fault-injecting store for integration tests
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use parimutuel::adapter::outbound::memory::MemoryStore;
//! use parimutuel::infrastructure::bootstrap::Services;
//! use parimutuel::infrastructure::config::ledger::LedgerConfig;
//! use parimutuel::domain::question::{LocalizedText, NewQuestion, QuestionKind};
//! use parimutuel::domain::wager::WagerPayload;
//!
//! # tokio_test::block_on(async {
//! let services = Services::new(Arc::new(MemoryStore::new()), &LedgerConfig::default());
//! let alice = services.catalog.register("alice").await?;
//! let question = services
//!     .catalog
//!     .create_question(NewQuestion {
//!         kind: QuestionKind::YesNo,
//!         creator: alice.id,
//!         title: LocalizedText::en("Will it rain tomorrow?"),
//!         description: None,
//!         options: vec![],
//!     })
//!     .await?;
//!
//! let yes = question.options[0].id;
//! services
//!     .wagering
//!     .place_wager(alice.id, question.id, &WagerPayload::new(100).with_option(yes))
//!     .await?;
//!
//! let pool = services.pools.compute_option_stats(question.id).await?;
//! assert_eq!(pool.total_stake, 100);
//! # Ok::<(), parimutuel::error::Error>(())
//! # }).unwrap();
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
