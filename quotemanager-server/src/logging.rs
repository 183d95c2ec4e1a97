//! Injected logging handle
//!
//! Components receive a [`Logger`] in their constructor instead of relying on
//! a process-wide default subscriber. Work is scoped to the logger's
//! dispatcher with [`Logger::scope`], so every `tracing` event emitted inside
//! an operation lands in the subscriber that was handed in.

use std::future::Future;

use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::Dispatch;

#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Wrap any subscriber.
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: tracing::Subscriber + Send + Sync + 'static,
    {
        Self::new(Dispatch::new(subscriber))
    }

    /// Drop every event (tests).
    pub fn discard() -> Self {
        Self::new(Dispatch::none())
    }

    /// Run `fut` with this logger's subscriber as the default.
    pub fn scope<F: Future>(&self, fut: F) -> WithDispatch<F> {
        fut.with_subscriber(self.dispatch.clone())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
