//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::{QuoteFilter, ValidationError};

/// JSON body whose every rejection (bad syntax, missing field, wrong content
/// type) is reported as a 400 validation error.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(reason = %rejection.body_text(), "rejected request body");
            ApiError::Validation(ValidationError::MalformedBody {
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}

/// List filter from the query string. A repeated `author` keeps its first
/// value; unknown keys are ignored.
pub struct FilterQuery(pub QuoteFilter);

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| {
                tracing::warn!(reason = %rejection.body_text(), "rejected query string");
                ApiError::Validation(ValidationError::MalformedQuery {
                    reason: rejection.body_text(),
                })
            })?;

        let author = pairs
            .into_iter()
            .find(|(key, _)| key == "author")
            .map(|(_, value)| value);

        Ok(Self(QuoteFilter { author }))
    }
}
