//! API route configuration.

use crate::api::handlers::{
    delete_url_handler, list_urls_handler, redirect_handler, shorten_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// URL routes, nested under [`crate::utils::request_origin::URLS_PATH`].
///
/// # Endpoints
///
/// - `GET    /`       - List all records with per-IP visit stats
/// - `POST   /`       - Shorten a URL
/// - `GET    /{id}`   - Redirect by short code or alias
/// - `PUT    /{id}`   - Set alias and visit quota
/// - `DELETE /{id}`   - Soft-delete
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_urls_handler).post(shorten_handler))
        .route(
            "/{id}",
            get(redirect_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
}
