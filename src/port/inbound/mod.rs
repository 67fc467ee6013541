//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`identity`]: Resolving an inbound credential to the wagering party

pub mod identity;
