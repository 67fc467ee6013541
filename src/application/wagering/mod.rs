//! The write side: validated, atomic balance-to-wager transitions.

pub mod coordinator;
pub mod locks;

pub use coordinator::WagerCoordinator;
pub use locks::{UserLease, UserLocks};
