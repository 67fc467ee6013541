//! SQLite persistence adapter.
//!
//! - [`database`]: connection pool, migrations, schema and row types
//! - [`store`]: [`SqliteStore`], implementing every storage port

pub mod database;
pub mod store;

pub use store::SqliteStore;
