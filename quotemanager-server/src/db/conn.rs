//! Connection-handle capability
//!
//! The storage adapter talks to the database only through [`PoolConnector`].
//! Parameters and rows cross this seam as plain values, so a test can stand
//! in for the pool without a live server.

use async_trait::async_trait;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// A decoded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

/// One result row: column names paired with decoded values, in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlRow {
    columns: Vec<(String, SqlValue)>,
}

impl SqlRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn value(&self, name: &str) -> Result<&SqlValue, sqlx::Error> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, v)| v)
            .ok_or_else(|| sqlx::Error::ColumnNotFound(name.to_owned()))
    }

    /// Non-null integer column.
    pub fn get_i64(&self, name: &str) -> Result<i64, sqlx::Error> {
        match self.value(name)? {
            SqlValue::Int(v) => Ok(*v),
            other => Err(mismatch(name, "integer", other)),
        }
    }

    /// Non-null text column.
    pub fn get_text(&self, name: &str) -> Result<String, sqlx::Error> {
        match self.value(name)? {
            SqlValue::Text(v) => Ok(v.clone()),
            other => Err(mismatch(name, "text", other)),
        }
    }
}

fn mismatch(name: &str, expected: &str, found: &SqlValue) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: format!("{name:?}"),
        source: format!("expected {expected}, found {found:?}").into(),
    }
}

/// Narrow database handle used by the storage adapter.
///
/// Every method is one round trip. Dropping a returned future abandons the
/// statement.
#[async_trait]
pub trait PoolConnector: Send + Sync {
    /// Run a statement, returning the number of affected rows.
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, sqlx::Error>;

    /// Run a query and decode every row.
    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<SqlRow>, sqlx::Error>;

    /// Run a query expected to yield at most one row.
    async fn query_one(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<SqlRow>, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Release all connections. Later calls fail.
    async fn close(&self);
}
