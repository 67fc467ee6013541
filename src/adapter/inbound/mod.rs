//! Inbound adapters: the ways operators drive the ledger.

pub mod cli;
