//! Quote endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::error::ApiError;
use crate::http::extractors::{FilterQuery, JsonBody};
use crate::models::{NewQuote, Quote};
use crate::state::AppState;

/// Create quote request
#[derive(Deserialize)]
pub struct CreateQuoteRequest {
    pub author: String,
    pub quote: String,
}

/// Plain confirmation body
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /quotes - store a new quote
async fn add_quote(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    info!("started adding quote");

    state
        .store()
        .add(&NewQuote::new(req.author, req.quote))
        .await?;

    info!("finished adding quote");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("quote was added successfully")),
    ))
}

/// GET /quotes?author= - list quotes, optionally by author
async fn list_quotes(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> Result<Json<Vec<Quote>>, ApiError> {
    info!(author = filter.author(), "started listing quotes");

    let quotes = state.store().list(&filter).await?;

    info!(count = quotes.len(), "finished listing quotes");
    Ok(Json(quotes))
}

/// GET /quotes/random - one quote at random
async fn random_quote(State(state): State<AppState>) -> Result<Json<Quote>, ApiError> {
    info!("started getting random quote");

    let quote = state.store().get_random().await?;

    info!(quote_id = quote.id, "finished getting random quote");
    Ok(Json(quote))
}

/// DELETE /quotes/{id} - remove a quote
async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    remove_quote(&state, &id).await
}

/// DELETE /quotes/random - the static segment shadows `{id}`; never a stored id
async fn delete_random_segment(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    remove_quote(&state, "random").await
}

async fn remove_quote(state: &AppState, id: &str) -> Result<Json<MessageResponse>, ApiError> {
    info!(id = %id, "started deleting quote");

    state
        .store()
        .delete(id)
        .await
        .map_err(|err| ApiError::from_store_with_id(err, "quote", id))?;

    info!(id = %id, "finished deleting quote");
    Ok(Json(MessageResponse::new(format!(
        "quote with id {} was deleted successfully",
        id
    ))))
}

/// Quote routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes).post(add_quote))
        .route(
            "/quotes/random",
            get(random_quote).delete(delete_random_segment),
        )
        .route("/quotes/{id}", delete(delete_quote))
}
