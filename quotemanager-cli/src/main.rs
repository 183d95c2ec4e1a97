//! quotemanager - quotes HTTP service
//!
//! Loads `.env`, reads settings from the environment, then either applies
//! schema migrations or migrates and serves the HTTP API.

mod commands;
mod tracing_setup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotemanager_server::Settings;

use commands::{MigrateArgs, ServeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "quotemanager",
    author,
    version,
    about = "Store, list and serve quotes over HTTP, backed by Postgres"
)]
struct Cli {
    /// Environment file loaded before reading settings
    #[arg(
        long,
        short = 'c',
        global = true,
        default_value = ".env",
        env = "QUOTEMANAGER_CONFIG"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending migrations, then serve the HTTP API
    Serve(ServeArgs),
    /// Apply pending migrations and exit
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Existing environment variables win over the file.
    let env_file = dotenvy::from_path(&cli.config);
    let settings = Settings::from_env().context("invalid configuration")?;
    let log = tracing_setup::build_logger(&settings.log_level)?;

    let scoped = log.clone();
    log.scope(async move {
        if let Err(err) = env_file {
            tracing::warn!(
                path = %cli.config.display(),
                error = %err,
                "config file not loaded, using process environment"
            );
        }

        match cli.command {
            Commands::Serve(args) => commands::run_serve(args, settings, scoped).await,
            Commands::Migrate(args) => commands::run_migrate(args, settings, scoped).await,
        }
    })
    .await
}
