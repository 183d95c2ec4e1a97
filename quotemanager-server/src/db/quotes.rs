//! Quote repository
//!
//! Each port operation is one parameterized statement and one round trip,
//! with no transaction. User values are always bound, never spliced into SQL.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::conn::{PoolConnector, SqlParam, SqlRow};
use crate::error::{StoreError, StoreResult};
use crate::logging::Logger;
use crate::models::{NewQuote, Quote, QuoteFilter, QuoteId};
use crate::store::QuoteStore;

const INSERT_QUOTE: &str = "INSERT INTO quotes (author, quote) VALUES ($1, $2)";
const SELECT_QUOTES: &str = "SELECT id, author, quote FROM quotes";
const AUTHOR_CLAUSE: &str = " WHERE author = $1";
const SELECT_RANDOM: &str = "SELECT id, author, quote FROM quotes ORDER BY RANDOM() LIMIT 1";
const DELETE_QUOTE: &str = "DELETE FROM quotes WHERE id = $1";

/// Quote storage backed by a [`PoolConnector`].
#[derive(Clone)]
pub struct PgQuoteStore {
    conn: Arc<dyn PoolConnector>,
    log: Logger,
}

fn decode_quote(row: &SqlRow) -> Result<Quote, sqlx::Error> {
    Ok(Quote {
        id: row.get_i64("id")?,
        author: row.get_text("author")?,
        text: row.get_text("quote")?,
    })
}

impl PgQuoteStore {
    pub fn new(conn: Arc<dyn PoolConnector>, log: Logger) -> Self {
        Self { conn, log }
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.log
            .scope(async {
                debug!("closing quote store");
                self.conn.close().await;
            })
            .await;
    }

    async fn insert(&self, quote: &NewQuote) -> StoreResult<()> {
        debug!("started adding quote");

        let params = [
            SqlParam::from(quote.author.as_str()),
            SqlParam::from(quote.text.as_str()),
        ];
        self.conn
            .execute(INSERT_QUOTE, &params)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to add quote");
                StoreError::Exec(err)
            })?;

        debug!("finished adding quote");
        Ok(())
    }

    async fn select(&self, filter: &QuoteFilter) -> StoreResult<Vec<Quote>> {
        debug!("started listing quotes");

        let mut sql = String::from(SELECT_QUOTES);
        let mut params = Vec::new();
        if let Some(author) = filter.author() {
            sql.push_str(AUTHOR_CLAUSE);
            params.push(SqlParam::from(author));
        }

        debug!(query = %sql, args = ?params, "executing query");

        let rows = self.conn.query(&sql, &params).await.map_err(|err| {
            error!(error = %err, "failed to fetch quotes");
            StoreError::Query(err)
        })?;

        let quotes = rows
            .iter()
            .map(decode_quote)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                error!(error = %err, "failed to decode quote row");
                StoreError::Query(err)
            })?;

        debug!(count = quotes.len(), "finished listing quotes");
        Ok(quotes)
    }

    async fn select_random(&self) -> StoreResult<Quote> {
        debug!(query = SELECT_RANDOM, "executing query");

        let row = self
            .conn
            .query_one(SELECT_RANDOM, &[])
            .await
            .map_err(|err| {
                error!(error = %err, "failed to fetch random quote");
                StoreError::Query(err)
            })?;

        let Some(row) = row else {
            warn!("no quotes in store");
            return Err(StoreError::NotFound);
        };

        let quote = decode_quote(&row).map_err(|err| {
            error!(error = %err, "failed to decode random quote");
            StoreError::Query(err)
        })?;

        debug!(quote_id = quote.id, "finished getting random quote");
        Ok(quote)
    }

    async fn delete_by_id(&self, raw_id: &str) -> StoreResult<()> {
        debug!(id = raw_id, "started deleting quote");

        // No stored row can carry a non-integer id, so skip the round trip.
        let id: QuoteId = match raw_id.parse() {
            Ok(id) => id,
            Err(err) => {
                warn!(id = raw_id, reason = %err, "rejected quote id");
                return Err(StoreError::NotFound);
            }
        };

        let affected = self
            .conn
            .execute(DELETE_QUOTE, &[SqlParam::Int(id.get())])
            .await
            .map_err(|err| {
                error!(error = %err, "failed to delete quote");
                StoreError::Exec(err)
            })?;

        if affected == 0 {
            warn!(id = %id, "no quote with the given id");
            return Err(StoreError::NotFound);
        }

        debug!(id = %id, "finished deleting quote");
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn add(&self, quote: &NewQuote) -> StoreResult<()> {
        self.log.scope(self.insert(quote)).await
    }

    async fn list(&self, filter: &QuoteFilter) -> StoreResult<Vec<Quote>> {
        self.log.scope(self.select(filter)).await
    }

    async fn get_random(&self) -> StoreResult<Quote> {
        self.log.scope(self.select_random()).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.log.scope(self.delete_by_id(id)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.log
            .scope(async {
                self.conn.ping().await.map_err(|err| {
                    warn!(error = %err, "store ping failed");
                    StoreError::Other(err)
                })
            })
            .await
    }
}
