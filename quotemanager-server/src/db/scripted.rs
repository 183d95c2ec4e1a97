//! Scripted [`PoolConnector`] for adapter tests
//!
//! Expectations are consumed in order. Each call must match the next
//! expectation's method, SQL text (whitespace-normalized) and parameters.
//! `assert_done` fails the test if anything scripted was never called.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::conn::{PoolConnector, SqlParam, SqlRow};

enum Reply {
    Execute(Result<u64, sqlx::Error>),
    Query(Result<Vec<SqlRow>, sqlx::Error>),
    QueryOne(Result<Option<SqlRow>, sqlx::Error>),
    /// Never resolves; exercises cancellation.
    Hang,
}

struct Expectation {
    method: &'static str,
    sql: String,
    params: Vec<SqlParam>,
    reply: Reply,
}

#[derive(Default)]
pub(crate) struct ScriptedConnector {
    expected: Mutex<VecDeque<Expectation>>,
    pings: Mutex<VecDeque<Result<(), sqlx::Error>>>,
    closed: Mutex<bool>,
    abandoned: AtomicUsize,
}

/// Counts a hung call as abandoned once its future is dropped.
struct AbandonGuard<'a>(&'a AtomicUsize);

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn hang<T>(abandoned: &AtomicUsize) -> T {
    let _guard = AbandonGuard(abandoned);
    std::future::pending().await
}

fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ScriptedConnector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: &'static str, sql: &str, params: Vec<SqlParam>, reply: Reply) {
        self.expected.lock().unwrap().push_back(Expectation {
            method,
            sql: normalize(sql),
            params,
            reply,
        });
    }

    pub(crate) fn expect_execute(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
        reply: Result<u64, sqlx::Error>,
    ) -> &Self {
        self.push("execute", sql, params, Reply::Execute(reply));
        self
    }

    pub(crate) fn expect_query(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
        reply: Result<Vec<SqlRow>, sqlx::Error>,
    ) -> &Self {
        self.push("query", sql, params, Reply::Query(reply));
        self
    }

    pub(crate) fn expect_query_one(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
        reply: Result<Option<SqlRow>, sqlx::Error>,
    ) -> &Self {
        self.push("query_one", sql, params, Reply::QueryOne(reply));
        self
    }

    pub(crate) fn expect_hang(
        &self,
        method: &'static str,
        sql: &str,
        params: Vec<SqlParam>,
    ) -> &Self {
        self.push(method, sql, params, Reply::Hang);
        self
    }

    pub(crate) fn expect_ping(&self, reply: Result<(), sqlx::Error>) -> &Self {
        self.pings.lock().unwrap().push_back(reply);
        self
    }

    /// Number of hung calls whose futures were dropped.
    pub(crate) fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }

    pub(crate) fn assert_done(&self) {
        let expected = self.expected.lock().unwrap();
        let pending: Vec<_> = expected
            .iter()
            .map(|e| format!("{} `{}`", e.method, e.sql))
            .collect();
        assert!(pending.is_empty(), "unmet expectations: {pending:?}");
        assert!(
            self.pings.lock().unwrap().is_empty(),
            "unmet ping expectations"
        );
    }

    fn next(&self, method: &'static str, sql: &str, params: &[SqlParam]) -> Reply {
        let expectation = self
            .expected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {method} `{}`", normalize(sql)));

        assert_eq!(expectation.method, method, "call order mismatch");
        assert_eq!(expectation.sql, normalize(sql), "sql mismatch");
        assert_eq!(expectation.params, params, "params mismatch");
        expectation.reply
    }
}

#[async_trait]
impl PoolConnector for ScriptedConnector {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, sqlx::Error> {
        match self.next("execute", sql, params) {
            Reply::Execute(reply) => reply,
            Reply::Hang => hang(&self.abandoned).await,
            _ => unreachable!("method checked in next()"),
        }
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<SqlRow>, sqlx::Error> {
        match self.next("query", sql, params) {
            Reply::Query(reply) => reply,
            Reply::Hang => hang(&self.abandoned).await,
            _ => unreachable!("method checked in next()"),
        }
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<SqlRow>, sqlx::Error> {
        match self.next("query_one", sql, params) {
            Reply::QueryOne(reply) => reply,
            Reply::Hang => hang(&self.abandoned).await,
            _ => unreachable!("method checked in next()"),
        }
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.pings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected ping"))
    }

    async fn close(&self) {
        *self.closed.lock().unwrap() = true;
    }
}
