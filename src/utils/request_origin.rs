//! Public origin and client address resolution from HTTP request headers.

use std::net::SocketAddr;

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;

/// Path under which short URLs are served.
pub const URLS_PATH: &str = "/api/v1/urls";

/// Resolves the externally visible origin (`scheme://host[:port]`) of a request.
///
/// A configured `public_base_url` always wins. Otherwise the origin is built from
/// the `Host` header, with the scheme taken from `X-Forwarded-Proto` when the
/// service runs behind a trusted proxy and `http` otherwise.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no base URL is configured and the `Host`
/// header is missing or not valid UTF-8.
pub fn request_origin(
    headers: &HeaderMap,
    public_base_url: Option<&str>,
    behind_proxy: bool,
) -> Result<String, AppError> {
    if let Some(base) = public_base_url {
        return Ok(base.trim_end_matches('/').to_string());
    }

    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?;

    let scheme = if behind_proxy {
        headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| *v == "http" || *v == "https")
            .unwrap_or("http")
    } else {
        "http"
    };

    Ok(format!("{scheme}://{host}"))
}

/// Returns the visitor IP for analytics.
///
/// Forwarding headers are only trusted when `behind_proxy` is set; the first
/// `X-Forwarded-For` entry is preferred over `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Builds the fully-qualified short URL for a code or alias.
pub fn short_url(origin: &str, token: &str) -> String {
    format!("{origin}{URLS_PATH}/{token}")
}

/// Strips a fully-qualified short URL of this service down to its identifier.
///
/// `{origin}/api/v1/urls/abc` becomes `abc`. Anything else, including short URLs
/// of another origin, is returned unchanged. The origin match ignores ASCII case.
pub fn strip_short_url_prefix<'a>(identifier: &'a str, origin: Option<&str>) -> &'a str {
    let Some(origin) = origin else {
        return identifier;
    };

    identifier
        .get(..origin.len())
        .filter(|head| head.eq_ignore_ascii_case(origin))
        .and_then(|_| identifier[origin.len()..].strip_prefix(URLS_PATH))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|id| !id.is_empty())
        .unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "192.0.2.10:51000".parse().unwrap()
    }

    fn headers_with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    #[test]
    fn test_origin_from_host_with_port() {
        let headers = headers_with_host("localhost:3000");
        let origin = request_origin(&headers, None, false).unwrap();
        assert_eq!(origin, "http://localhost:3000");
    }

    #[test]
    fn test_origin_prefers_configured_base() {
        let headers = headers_with_host("internal:3000");
        let origin = request_origin(&headers, Some("https://sho.rt/"), false).unwrap();
        assert_eq!(origin, "https://sho.rt");
    }

    #[test]
    fn test_origin_forwarded_proto_only_behind_proxy() {
        let mut headers = headers_with_host("sho.rt");
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));

        assert_eq!(
            request_origin(&headers, None, true).unwrap(),
            "https://sho.rt"
        );
        assert_eq!(
            request_origin(&headers, None, false).unwrap(),
            "http://sho.rt"
        );
    }

    #[test]
    fn test_origin_missing_host() {
        let headers = HeaderMap::new();
        assert!(request_origin(&headers, None, false).is_err());
    }

    #[test]
    fn test_origin_ipv6_host() {
        let headers = headers_with_host("[::1]:8080");
        assert_eq!(
            request_origin(&headers, None, false).unwrap(),
            "http://[::1]:8080"
        );
    }

    #[test]
    fn test_client_ip_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_ip(&headers, peer(), false), "192.0.2.10");
    }

    #[test]
    fn test_client_ip_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers, peer(), true), "198.51.100.2");
        assert_eq!(client_ip(&HeaderMap::new(), peer(), true), "192.0.2.10");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("http://localhost:3000", "abc123"),
            "http://localhost:3000/api/v1/urls/abc123"
        );
    }

    #[test]
    fn test_strip_short_url_prefix() {
        let origin = Some("http://localhost:3000");

        assert_eq!(
            strip_short_url_prefix("http://localhost:3000/api/v1/urls/abc123", origin),
            "abc123"
        );
        assert_eq!(
            strip_short_url_prefix("HTTP://LocalHost:3000/api/v1/urls/abc123", origin),
            "abc123"
        );
        assert_eq!(strip_short_url_prefix("abc123", origin), "abc123");
        assert_eq!(strip_short_url_prefix("my-alias", origin), "my-alias");
    }

    #[test]
    fn test_strip_short_url_prefix_keeps_foreign_origin() {
        let foreign = "https://other.example/api/v1/urls/abc123";

        assert_eq!(
            strip_short_url_prefix(foreign, Some("http://localhost:3000")),
            foreign
        );
        assert_eq!(
            strip_short_url_prefix("http://localhost:3000/api/v1/urls/abc123", None),
            "http://localhost:3000/api/v1/urls/abc123"
        );
        let empty = "http://localhost:3000/api/v1/urls/";
        assert_eq!(
            strip_short_url_prefix(empty, Some("http://localhost:3000")),
            empty
        );
    }
}
