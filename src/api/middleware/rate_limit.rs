//! Per-client request throttling using the token bucket algorithm.
//!
//! This is transport-level protection and is independent of the per-URL visit
//! quota enforced by the redirect path.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleSettings {
    /// Tokens replenished per second.
    pub per_second: u64,
    /// Bucket size.
    pub burst: u32,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst: 10,
        }
    }
}

impl ThrottleSettings {
    /// Milliseconds between two replenished tokens.
    fn replenish_interval_ms(&self) -> u64 {
        (1000 / self.per_second.max(1)).max(1)
    }
}

/// Creates a limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires the
/// router to be served with `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/v1/urls", post(shorten_handler))
///     .layer(rate_limit::layer(ThrottleSettings::default()));
/// ```
pub fn layer(
    settings: ThrottleSettings,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(settings.replenish_interval_ms())
            .burst_size(settings.burst.max(1))
            .finish()
            .expect("period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a limiter keyed by the client IP reported by a reverse proxy.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded`, falling back to the
/// peer address. Use only behind a trusted proxy.
pub fn proxy_layer(
    settings: ThrottleSettings,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(settings.replenish_interval_ms())
            .burst_size(settings.burst.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
