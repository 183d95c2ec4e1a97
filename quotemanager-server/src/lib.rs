//! quotemanager-server: quote storage core and HTTP API
//!
//! The request layer talks to a [`QuoteStore`]. The production store,
//! [`db::PgQuoteStore`], turns each operation into one parameterized
//! statement over a [`db::PoolConnector`]. Schema migrations run once at
//! startup against the same pool, before the store is exposed.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;

pub use config::{ConfigError, DbConfig, HttpConfig, Settings};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use logging::Logger;
pub use models::{NewQuote, Quote, QuoteFilter, QuoteId};
pub use state::AppState;
pub use store::QuoteStore;
