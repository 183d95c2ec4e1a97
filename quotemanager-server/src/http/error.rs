//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ErrorKind, StoreError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound {
        resource: &'static str,
        id: Option<String>,
    },

    /// Store failure (500, logged)
    Store(StoreError),
}

impl ApiError {
    /// Map a store error, naming the id the caller asked for on `NotFound`.
    pub fn from_store_with_id(err: StoreError, resource: &'static str, id: &str) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound {
                resource,
                id: Some(id.to_owned()),
            },
            _ => Self::Store(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { resource, id } => {
                let message = match id {
                    Some(id) => format!("{} '{}' not found", resource, id),
                    None => format!("no {} found", resource),
                };
                (
                    StatusCode::NOT_FOUND,
                    json!({
                        "error": "not_found",
                        "message": message
                    }),
                )
            }
            Self::Store(e) => {
                // Log the actual error, return generic message
                tracing::error!(kind = ?e.kind(), error = %e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Self::NotFound {
                resource: "quote",
                id: None,
            },
            _ => Self::Store(e),
        }
    }
}
