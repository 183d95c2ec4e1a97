//! HTTP server command
//!
//! Connects to Postgres, applies pending migrations, then serves the quotes
//! API until Ctrl+C or SIGTERM. The listener is never bound if migration
//! fails.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use quotemanager_server::db::{
    create_pool, run_migrations, PgConnector, PgQuoteStore, PoolConnector,
};
use quotemanager_server::http::run_server;
use quotemanager_server::{AppState, Logger, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides HTTP_SERVER_ADDRESS)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, settings: Settings, log: Logger) -> Result<()> {
    let Settings { mut http, db, .. } = settings;
    if let Some(bind) = args.bind {
        http.bind_addr = bind;
    }

    tracing::info!(
        host = %db.host,
        port = db.port,
        database = %db.name,
        "connecting to database"
    );
    let pool = create_pool(db.connect_options())
        .await
        .context("failed to create database pool")?;

    let connector = Arc::new(PgConnector::new(pool.clone()));
    connector.ping().await.context("database is not reachable")?;

    let report = run_migrations(&pool, &log)
        .await
        .context("failed to run migrations")?;
    tracing::info!(
        applied = report.applied.len(),
        known = report.known,
        "schema is up to date"
    );

    let store = Arc::new(PgQuoteStore::new(connector, log.clone()));
    let state = AppState::new(store.clone(), log);

    // Blocks until shutdown; the pool is closed either way.
    let served = run_server(state, http).await.context("server error");
    store.close().await;

    served
}
