//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, storage lifecycle and service wiring.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`storage`] - Database open, migrate and close

pub mod bootstrap;
pub mod config;
pub mod storage;
