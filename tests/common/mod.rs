#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use shorturl::api::middleware::rate_limit::ThrottleSettings;
use shorturl::domain::entities::{NewUrlRecord, UrlRecord};
use shorturl::infrastructure::cache::{CacheService, MokaCache, NullCache};
use shorturl::infrastructure::persistence::{Database, PoolSettings};
use shorturl::routes::{RouterOptions, build_router};
use shorturl::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

/// Opens a migrated in-memory SQLite database.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_database() -> Database {
    let settings = PoolSettings {
        max_connections: 1,
        ..PoolSettings::default()
    };

    let database = Database::connect("sqlite::memory:", &settings)
        .await
        .expect("Failed to open in-memory database");
    database.migrate().await.expect("Failed to migrate");
    database
}

/// State with the in-process cache enabled.
pub async fn create_test_state() -> AppState {
    create_state_with_cache(Arc::new(MokaCache::new(1_000, 600))).await
}

/// State with caching disabled, so every redirect hits storage.
pub async fn create_uncached_state() -> AppState {
    create_state_with_cache(Arc::new(NullCache::new())).await
}

pub async fn create_state_with_cache(cache: Arc<dyn CacheService>) -> AppState {
    let database = create_test_database().await;
    AppState::new(database, cache, 600, Some(BASE_URL.to_string()), false)
}

pub fn router_options(throttle: Option<ThrottleSettings>) -> RouterOptions {
    RouterOptions {
        throttle,
        public_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
    }
}

/// Test server over the full router without throttling.
pub fn create_test_server(state: AppState) -> TestServer {
    let app = build_router(state, &router_options(None)).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// Inserts a record with a fixed short code.
pub async fn insert_url(state: &AppState, short_url: &str, original_url: &str) -> UrlRecord {
    let (urls, _) = state.database.repositories();
    urls.create(NewUrlRecord {
        original_url: original_url.to_string(),
        short_url: short_url.to_string(),
    })
    .await
    .unwrap()
}

/// Returns the short code from a fully-qualified short URL.
pub fn code_of(short_url: &str) -> &str {
    short_url.rsplit('/').next().unwrap()
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "10.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
