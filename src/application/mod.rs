//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.
//!
//! - [`wagering`]: the write side, validated balance-to-wager transitions
//! - [`pool`]: the read side, per-option totals and probabilities
//! - [`catalog`]: question management and registration

pub mod catalog;
pub mod pool;
pub mod wagering;
