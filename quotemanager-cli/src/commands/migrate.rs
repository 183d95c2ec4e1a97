//! Migration command
//!
//! Applies pending schema migrations and exits. With `--dry-run`, lists the
//! embedded migrations and whether each is applied, without changing the
//! schema beyond creating the bookkeeping table.

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::PgPool;

use quotemanager_server::db::migrations::{self, MigrationStatus};
use quotemanager_server::db::{create_pool, run_migrations};
use quotemanager_server::{Logger, Settings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Show migration status without applying anything
    #[arg(long, alias = "status")]
    pub dry_run: bool,
}

pub async fn run_migrate(args: MigrateArgs, settings: Settings, log: Logger) -> Result<()> {
    let pool = create_pool(settings.db.connect_options())
        .await
        .context("failed to create database pool")?;

    let result = if args.dry_run {
        print_status(&pool).await
    } else {
        apply(&pool, &log).await
    };

    pool.close().await;
    result
}

async fn apply(pool: &PgPool, log: &Logger) -> Result<()> {
    let report = run_migrations(pool, log)
        .await
        .context("failed to run migrations")?;

    if report.is_noop() {
        println!("schema is up to date ({} migrations known)", report.known);
    } else {
        println!("applied {} migration(s): {:?}", report.applied.len(), report.applied);
    }
    Ok(())
}

async fn print_status(pool: &PgPool) -> Result<()> {
    let entries = migrations::status(pool)
        .await
        .context("failed to read migration status")?;

    for entry in &entries {
        println!("{}", status_line(entry));
    }
    let pending = entries.iter().filter(|e| !e.applied).count();
    println!("{pending} pending");
    Ok(())
}

fn status_line(entry: &MigrationStatus) -> String {
    let mark = if entry.applied { "applied" } else { "pending" };
    format!("{:>4}  {:<8} {}", entry.version, mark, entry.description)
}
