//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/api/v1/urls/*` - URL API and redirects
//! - `GET /health`    - Health check: database and cache
//! - everything else  - Static files from the public directory
//!   (including `404.html` and `RateLimit.html`)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive cross-origin access
//! - **Throttling** - Per-IP token bucket on the URL API
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, ThrottleSettings};
use crate::api::middleware::{cors, tracing};
use crate::api::routes::url_routes;
use crate::config::Config;
use crate::state::AppState;
use crate::utils::request_origin::URLS_PATH;
use axum::Router;
use axum::routing::get;
use std::path::PathBuf;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Router options that are not part of the shared state.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// `None` disables throttling.
    pub throttle: Option<ThrottleSettings>,
    pub public_dir: PathBuf,
}

impl RouterOptions {
    pub fn from_config(config: &Config) -> Self {
        let throttle = (config.throttle_per_second > 0).then_some(ThrottleSettings {
            per_second: config.throttle_per_second,
            burst: config.throttle_burst,
        });

        Self {
            throttle,
            public_dir: PathBuf::from(&config.public_dir),
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            throttle: Some(ThrottleSettings::default()),
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Builds the router with all routes and middleware, without path normalization.
///
/// Throttling keys on the peer address unless `state.behind_proxy` is set, in
/// which case forwarding headers are used.
pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let mut api_router = url_routes();

    if let Some(settings) = options.throttle {
        api_router = if state.behind_proxy {
            api_router.layer(rate_limit::proxy_layer(settings))
        } else {
            api_router.layer(rate_limit::layer(settings))
        };
    }

    Router::new()
        .nest(URLS_PATH, api_router)
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(&options.public_dir))
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, options))
}
