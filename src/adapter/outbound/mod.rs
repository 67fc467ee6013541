//! Outbound adapters (driven side).

pub mod identity;
pub mod memory;
pub mod sqlite;
