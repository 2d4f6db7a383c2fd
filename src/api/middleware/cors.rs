//! Cross-origin resource sharing.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header.
///
/// The API is unauthenticated, so there are no credentials to protect.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
