//! Domain models
//!
//! `Quote` is what the store hands back; `NewQuote` is what callers hand in.
//! Identifiers arriving as text are parsed into `QuoteId` at the boundary.

pub mod quote;
pub mod validation;

pub use quote::{NewQuote, Quote, QuoteFilter, QuoteId};
pub use validation::ValidationError;
