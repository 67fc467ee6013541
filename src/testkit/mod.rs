//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fixtures`] — Seed users and questions into any store.
//! - [`flaky`] — A store wrapper that fails commits on demand.

pub mod fixtures;
pub mod flaky;
