//! Handlers for alias update and soft delete.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::urls::AliasRequest;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::strip_short_url_prefix;

/// Sets the alias and visit quota of a live record.
///
/// # Endpoint
///
/// `PUT /api/v1/urls/{id}` where `id` is a short code, an alias, or a
/// percent-encoded full short URL of this service's origin.
///
/// # Request Body
///
/// ```json
/// { "alias": "promo", "rateLimit": 100 }
/// ```
///
/// Omitting `rateLimit` removes the quota; `0` also means unlimited.
///
/// # Errors
///
/// - 400 if the body is not JSON of this shape
/// - 400 if the alias is malformed or held by another live record
/// - 400 if the quota is negative
/// - 404 if no live record matches `id`
pub async fn update_url_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<AliasRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let origin = state.origin(&headers).ok();

    state
        .url_service
        .update_alias(
            strip_short_url_prefix(&id, origin.as_deref()),
            payload.alias,
            payload.rate_limit,
        )
        .await?;

    Ok(StatusCode::OK)
}

/// Soft-deletes a record.
///
/// # Endpoint
///
/// `DELETE /api/v1/urls/{id}`
///
/// The record stays in the list endpoint with `deleted: true`.
///
/// # Errors
///
/// Returns 404 if no live record matches `id`.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let origin = state.origin(&headers).ok();

    state
        .url_service
        .delete(strip_short_url_prefix(&id, origin.as_deref()))
        .await?;

    Ok(StatusCode::OK)
}
