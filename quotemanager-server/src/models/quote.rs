//! Quote record, insert payload, list filter and id parsing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A persisted quote. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
}

/// A quote that has not been stored yet.
///
/// Author and text are stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
}

impl NewQuote {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

/// List filter. An absent or empty author means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub author: Option<String>,
}

impl QuoteFilter {
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
        }
    }

    /// The author to match on, if the filter is active.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }
}

/// A quote identifier parsed from external text.
///
/// Only positive integers are accepted; the store never assigns anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteId(i64);

impl QuoteId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for QuoteId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }

        // Plain decimal digits only: no sign, no padding zeros.
        let canonical = s.bytes().all(|b| b.is_ascii_digit()) && !s.starts_with('0');
        match s.parse::<i64>() {
            Ok(id) if canonical && id > 0 => Ok(Self(id)),
            _ => Err(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a positive integer",
            }),
        }
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
