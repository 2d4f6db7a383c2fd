//! Shared application state injected into every handler.

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::application::services::{StatsService, UrlService};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::Database;
use crate::utils::request_origin::request_origin;

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub stats_service: Arc<StatsService>,
    pub cache: Arc<dyn CacheService>,
    pub database: Database,
    /// Origin used for short URLs and error-page redirects; derived from the
    /// `Host` header when unset.
    pub public_base_url: Option<String>,
    /// Trust `X-Forwarded-*` headers for client IP and scheme.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services on top of `database` and `cache`.
    pub fn new(
        database: Database,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: u64,
        public_base_url: Option<String>,
        behind_proxy: bool,
    ) -> Self {
        let (url_repository, visit_repository) = database.repositories();

        let url_service = Arc::new(UrlService::new(
            url_repository.clone(),
            visit_repository.clone(),
            cache.clone(),
            cache_ttl_seconds,
        ));
        let stats_service = Arc::new(StatsService::new(url_repository, visit_repository));

        Self {
            url_service,
            stats_service,
            cache,
            database,
            public_base_url,
            behind_proxy,
        }
    }

    /// Resolves the public origin for a request.
    pub fn origin(&self, headers: &HeaderMap) -> Result<String, AppError> {
        request_origin(headers, self.public_base_url.as_deref(), self.behind_proxy)
    }
}
