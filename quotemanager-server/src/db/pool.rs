//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. [`PgConnector`] is the
//! production [`PoolConnector`] over that pool.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Column, Connection, PgPool, Row, TypeInfo};

use super::conn::{PoolConnector, SqlParam, SqlRow, SqlValue};

/// Default maximum connections for the pool.
/// Kept low for a single small service.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn create_pool(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(options, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with a custom connection cap.
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// [`PoolConnector`] backed by a shared [`PgPool`].
#[derive(Debug, Clone)]
pub struct PgConnector {
    pool: PgPool,
}

impl PgConnector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, shared with the migration runner.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(sqlx::query(sql), |query, param| match param {
        SqlParam::Int(v) => query.bind(*v),
        SqlParam::Text(v) => query.bind(v.as_str()),
    })
}

/// Decode a driver row into plain values. Unsupported column types fail the row.
fn decode_row(row: &PgRow) -> Result<SqlRow, sqlx::Error> {
    let mut out = SqlRow::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let value = match column.type_info().name() {
            "INT2" => row
                .try_get::<Option<i16>, _>(idx)?
                .map(|v| SqlValue::Int(v.into())),
            "INT4" => row
                .try_get::<Option<i32>, _>(idx)?
                .map(|v| SqlValue::Int(v.into())),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(SqlValue::Int),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(idx)?.map(SqlValue::Text)
            }
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: format!("{:?}", column.name()),
                    source: format!("unsupported column type {other}").into(),
                })
            }
        };

        out.push(column.name(), value.unwrap_or(SqlValue::Null));
    }

    Ok(out)
}

#[async_trait]
impl PoolConnector for PgConnector {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, sqlx::Error> {
        let result = bind_params(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<SqlRow>, sqlx::Error> {
        let rows = bind_params(sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<SqlRow>, sqlx::Error> {
        let row = bind_params(sql, params).fetch_optional(&self.pool).await?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
