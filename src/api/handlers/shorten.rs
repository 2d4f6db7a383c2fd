//! Handler for the shorten endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use validator::Validate;

use crate::api::dto::urls::ShortenUrlRequest;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::short_url;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com" }
/// ```
///
/// # Response
///
/// `200 OK` with the fully-qualified short URL as `text/plain`:
///
/// ```text
/// http://localhost:3000/api/v1/urls/Xk3b9QwE2fZa
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with message `Invalid URL.` if the URL is malformed,
/// and 400 with the deserializer's message if the body is not the JSON above.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenUrlRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let origin = state.origin(&headers)?;
    let record = state.url_service.shorten(&payload.original_url).await?;

    Ok(short_url(&origin, &record.short_url))
}
