//! Schema migrations
//!
//! Scripts under `migrations/` are embedded at compile time and applied
//! forward-only, in version order. Applied versions are tracked by sqlx in
//! `_sqlx_migrations`, so a rerun with nothing new is a no-op.
//!
//! The runner borrows one connection from the shared pool for the whole run
//! and hands it back before returning, whether or not the run succeeded.

use std::collections::HashSet;

use sqlx::migrate::{Migrate, MigrateError, Migrator};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, error, info};

use crate::logging::Logger;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to acquire migration connection: {0}")]
    Acquire(#[source] sqlx::Error),

    #[error("failed to read applied migrations: {0}")]
    Bookkeeping(#[source] MigrateError),

    #[error("migration failed: {0}")]
    Apply(#[source] MigrateError),
}

/// Outcome of a migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied by this run, ascending. Empty when already up to date.
    pub applied: Vec<i64>,
    /// Number of scripts embedded in the binary
    pub known: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// One embedded script and whether the database has it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

fn forward_versions() -> impl Iterator<Item = (i64, &'static str)> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| (m.version, m.description.as_ref()))
}

async fn applied_versions(conn: &mut PgConnection) -> Result<HashSet<i64>, MigrationError> {
    conn.ensure_migrations_table()
        .await
        .map_err(MigrationError::Bookkeeping)?;

    let applied = conn
        .list_applied_migrations()
        .await
        .map_err(MigrationError::Bookkeeping)?;

    Ok(applied.into_iter().map(|m| m.version).collect())
}

async fn apply(conn: &mut PgConnection) -> Result<MigrationReport, MigrationError> {
    let before = applied_versions(conn).await?;
    debug!(already_applied = before.len(), "migration state loaded");

    MIGRATOR.run(&mut *conn).await.map_err(MigrationError::Apply)?;

    let applied: Vec<i64> = forward_versions()
        .map(|(version, _)| version)
        .filter(|version| !before.contains(version))
        .collect();

    Ok(MigrationReport {
        applied,
        known: forward_versions().count(),
    })
}

/// Apply every pending migration on `pool`.
pub async fn run_migrations(
    pool: &PgPool,
    log: &Logger,
) -> Result<MigrationReport, MigrationError> {
    log.scope(async {
        debug!("running migrations");

        let mut conn = pool.acquire().await.map_err(|err| {
            error!(error = %err, "failed to acquire migration connection");
            MigrationError::Acquire(err)
        })?;

        let outcome = apply(&mut conn).await;
        // Back to the pool on every path.
        drop(conn);

        match &outcome {
            Ok(report) if report.is_noop() => debug!("migration did not change anything"),
            Ok(report) => info!(versions = ?report.applied, "migrations applied"),
            Err(err) => error!(error = %err, "migration failed"),
        }

        outcome
    })
    .await
}

/// List embedded migrations alongside their applied state.
///
/// Creates the bookkeeping table if it does not exist yet.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, MigrationError> {
    let mut conn = pool.acquire().await.map_err(MigrationError::Acquire)?;
    let applied = applied_versions(&mut conn).await?;

    Ok(forward_versions()
        .map(|(version, description)| MigrationStatus {
            version,
            description: description.to_owned(),
            applied: applied.contains(&version),
        })
        .collect())
}
