//! Storage port
//!
//! The request layer depends on [`QuoteStore`] only. Every operation is a
//! future; dropping it (client disconnect, timeout, shutdown) abandons the
//! in-flight statement.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{NewQuote, Quote, QuoteFilter};

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert a quote. The store assigns its id.
    async fn add(&self, quote: &NewQuote) -> StoreResult<()>;

    /// All quotes, or those whose author equals `filter.author`.
    ///
    /// Order is unspecified. Never fails just because nothing matched.
    async fn list(&self, filter: &QuoteFilter) -> StoreResult<Vec<Quote>>;

    /// One quote picked at random; `NotFound` when the store is empty.
    async fn get_random(&self) -> StoreResult<Quote>;

    /// Remove the quote with id `id` (raw external text).
    ///
    /// `NotFound` when no row was removed.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
