//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the storage the core depends on: balances,
//! stakes, and the read-only question catalog.

pub mod store;
