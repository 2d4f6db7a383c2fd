//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::domain::entities::VisitorInfo;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::client_ip;

/// Static page shown for unknown or deleted identifiers.
pub const NOT_FOUND_PAGE: &str = "/404.html";

/// Static page shown when a URL's visit quota is used up.
pub const RATE_LIMIT_PAGE: &str = "/RateLimit.html";

/// Redirects a short code or alias to its original URL.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{id}`
///
/// # Responses
///
/// Browsers never see raw domain errors here:
///
/// - **Success**: `302 Found` to the original URL
/// - **Not found / deleted**: `302 Found` to `{origin}/404.html`
/// - **Quota used up**: `302 Found` to `{origin}/RateLimit.html`
/// - **Anything else**: JSON error with its own status
///
/// A cached mapping is served without counting the visit.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let visitor = VisitorInfo::new(
        client_ip(&headers, addr, state.behind_proxy),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.url_service.redirect(&id, visitor).await {
        Ok(url) => found(&url),
        Err(AppError::NotFound { .. } | AppError::Gone { .. }) => {
            found(&error_page(&state, &headers, NOT_FOUND_PAGE))
        }
        Err(AppError::Forbidden { .. }) => found(&error_page(&state, &headers, RATE_LIMIT_PAGE)),
        Err(e) => e.into_response(),
    }
}

/// Builds an absolute link to a static page, or a root-relative one when the
/// origin cannot be determined.
fn error_page(state: &AppState, headers: &HeaderMap, page: &str) -> String {
    let origin = state.origin(headers).unwrap_or_default();
    format!("{origin}{page}")
}

/// `302 Found` with the given `Location`.
fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::internal(
            "Stored URL is not a valid Location header",
            serde_json::json!({}),
        )
        .into_response(),
    }
}
