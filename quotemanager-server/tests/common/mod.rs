//! In-memory stores for route tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use quotemanager_server::{
    ErrorKind, NewQuote, Quote, QuoteFilter, QuoteId, QuoteStore, StoreError, StoreResult,
};

/// Vec-backed store with the same not-found rules as the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_with: Option<ErrorKind>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    picks: usize,
    quotes: Vec<Quote>,
}

fn failure(kind: ErrorKind) -> StoreError {
    let cause = || sqlx::Error::Protocol("connection reset by peer at 10.0.0.3".into());
    match kind {
        ErrorKind::NotFound => StoreError::NotFound,
        ErrorKind::ExecFailure => StoreError::Exec(cause()),
        ErrorKind::QueryFailure => StoreError::Query(cause()),
        ErrorKind::Opaque => StoreError::Other(cause()),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with `kind`.
    pub fn failing(kind: ErrorKind) -> Self {
        Self {
            fail_with: Some(kind),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().quotes.len()
    }

    fn check(&self) -> StoreResult<()> {
        match self.fail_with {
            Some(kind) => Err(failure(kind)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn add(&self, quote: &NewQuote) -> StoreResult<()> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.quotes.push(Quote {
            id,
            author: quote.author.clone(),
            text: quote.text.clone(),
        });
        Ok(())
    }

    async fn list(&self, filter: &QuoteFilter) -> StoreResult<Vec<Quote>> {
        self.check()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .quotes
            .iter()
            .filter(|q| filter.author().map_or(true, |a| q.author == a))
            .cloned()
            .collect())
    }

    async fn get_random(&self) -> StoreResult<Quote> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        if inner.quotes.is_empty() {
            return Err(StoreError::NotFound);
        }
        inner.picks += 1;
        let idx = inner.picks % inner.quotes.len();
        Ok(inner.quotes[idx].clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.check()?;
        let id: QuoteId = id.parse().map_err(|_| StoreError::NotFound)?;
        let mut inner = self.inner.lock().unwrap();
        let before = inner.quotes.len();
        inner.quotes.retain(|q| q.id != id.get());
        if inner.quotes.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}

/// Store whose operations never complete.
pub struct HangingStore;

#[async_trait]
impl QuoteStore for HangingStore {
    async fn add(&self, _quote: &NewQuote) -> StoreResult<()> {
        std::future::pending().await
    }

    async fn list(&self, _filter: &QuoteFilter) -> StoreResult<Vec<Quote>> {
        std::future::pending().await
    }

    async fn get_random(&self) -> StoreResult<Quote> {
        std::future::pending().await
    }

    async fn delete(&self, _id: &str) -> StoreResult<()> {
        std::future::pending().await
    }

    async fn ping(&self) -> StoreResult<()> {
        std::future::pending().await
    }
}
