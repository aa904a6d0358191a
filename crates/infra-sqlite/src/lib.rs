// Mailroom Infrastructure - SQLite Adapter
// Implements: Repository ports, TransactionalRepository, schema provisioning

mod connection;
mod error;
mod migration;
mod queries;
mod repository;
mod rows;
mod transaction;

pub use connection::{open_pools, StorePools};
pub use error::{constraint_violation, map_sqlx_error, Constraint};
pub use migration::run_migrations;
pub use repository::SqliteStore;
pub use transaction::SqliteStoreTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for StoreError here)
