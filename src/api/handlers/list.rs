//! Handler for the list-with-stats endpoint.

use axum::{Json, extract::State, http::HeaderMap};

use crate::api::dto::stats::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every URL record, deleted ones included, with per-IP visit summaries.
///
/// # Endpoint
///
/// `GET /api/v1/urls`
///
/// No pagination or filtering is applied.
///
/// # Response
///
/// ```json
/// [
///   {
///     "originalUrl": "https://example.com",
///     "shortUrl": "http://localhost:3000/api/v1/urls/abc123",
///     "alias": null,
///     "accessCount": 2,
///     "deleted": false,
///     "rateLimit": null,
///     "createdAt": "2024-03-01T12:00:00Z",
///     "stats": {
///       "10.0.0.1": {
///         "count": 2,
///         "result": [
///           { "agent": "curl/8.0", "referer": null, "accessedAt": "2024-03-01T12:01:00Z" },
///           { "agent": "curl/8.0", "referer": null, "accessedAt": "2024-03-01T12:02:00Z" }
///         ]
///       }
///     }
///   }
/// ]
/// ```
pub async fn list_urls_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UrlStatsResponse>>, AppError> {
    let origin = state.origin(&headers)?;
    let listed = state.stats_service.list_with_stats().await?;

    Ok(Json(
        listed
            .into_iter()
            .map(|stats| UrlStatsResponse::from_stats(stats, &origin))
            .collect(),
    ))
}
