//! Database layer - connection handle, pool, quote repository, migrations
//!
//! # Design Principles
//!
//! - The repository sees the database only through `PoolConnector`
//! - One statement per operation, parameters always bound
//! - Migrations share the repository's pool

pub mod conn;
pub mod migrations;
pub mod pool;
pub mod quotes;

#[cfg(test)]
pub(crate) mod scripted;

pub use conn::{PoolConnector, SqlParam, SqlRow, SqlValue};
pub use migrations::{run_migrations, MigrationError, MigrationReport};
pub use pool::{create_pool, PgConnector};
pub use quotes::PgQuoteStore;
