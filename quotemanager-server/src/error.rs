//! Storage error taxonomy
//!
//! Every store fault is reported as one of a closed set of kinds. Callers
//! branch on [`StoreError::kind`], never on message text.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by a [`crate::store::QuoteStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Nothing matched: empty table on random pick, or zero rows deleted
    #[error("no quote was found")]
    NotFound,

    /// An insert or delete statement failed
    #[error("db exec error: {0}")]
    Exec(#[source] sqlx::Error),

    /// A select failed or a row did not decode
    #[error("db query error: {0}")]
    Query(#[source] sqlx::Error),

    /// Anything else the store reported
    #[error("store error: {0}")]
    Other(#[from] sqlx::Error),
}

/// Identity of a [`StoreError`], comparable with `==`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ExecFailure,
    QueryFailure,
    Opaque,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Exec(_) => ErrorKind::ExecFailure,
            Self::Query(_) => ErrorKind::QueryFailure,
            Self::Other(_) => ErrorKind::Opaque,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
