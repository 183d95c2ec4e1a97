//! Axum server setup
//!
//! Server skeleton with:
//! - Per-request logger scope (the injected `Logger`, not a global)
//! - Tracing middleware
//! - Request deadline
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::HttpConfig;
use crate::logging::Logger;
use crate::state::AppState;

/// Run every request under the application's logger.
async fn scope_logger(State(log): State<Logger>, req: Request, next: Next) -> Response {
    log.scope(next.run(req)).await
}

/// Build the application router with all routes.
///
/// Requests running past `request_timeout` are dropped, which cancels any
/// in-flight store call, and answered with 408.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let log = state.logger().clone();

    Router::new()
        .merge(routes::health::router())
        .merge(routes::quotes::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(log, scope_logger))
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(state: AppState, config: HttpConfig) -> Result<(), ServerError> {
    let log = state.logger().clone();
    let app = build_router(state, config.request_timeout);

    log.scope(async move {
        let listener = TcpListener::bind(config.bind_addr).await?;
        tracing::info!(address = %config.bind_addr, "server is listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server shutdown complete");
        Ok::<(), ServerError>(())
    })
    .await
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
