//! Application state shared across handlers

use std::sync::Arc;

use crate::logging::Logger;
use crate::store::QuoteStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn QuoteStore>,
    log: Logger,
}

impl AppState {
    pub fn new(store: Arc<dyn QuoteStore>, log: Logger) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, log }),
        }
    }

    pub fn store(&self) -> &dyn QuoteStore {
        self.inner.store.as_ref()
    }

    pub fn logger(&self) -> &Logger {
        &self.inner.log
    }
}
