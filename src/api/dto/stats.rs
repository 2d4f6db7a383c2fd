//! DTOs for the list-with-stats endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::stats::{IpStats, UrlStats, VisitDetail};
use crate::utils::request_origin::short_url;

/// One URL record with its per-IP visit summary.
///
/// ```json
/// {
///   "originalUrl": "https://example.com",
///   "shortUrl": "http://localhost:3000/api/v1/urls/abc123",
///   "alias": null,
///   "accessCount": 2,
///   "deleted": false,
///   "rateLimit": null,
///   "stats": { "10.0.0.1": { "count": 2, "result": [ ... ] } }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub original_url: String,
    pub short_url: String,
    pub alias: Option<String>,
    pub access_count: i64,
    pub deleted: bool,
    pub rate_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub stats: BTreeMap<String, IpStatsResponse>,
}

#[derive(Debug, Serialize)]
pub struct IpStatsResponse {
    pub count: i64,
    pub result: Vec<VisitDetailResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDetailResponse {
    pub agent: Option<String>,
    pub referer: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl UrlStatsResponse {
    /// Converts a domain summary, qualifying the short code and alias with `origin`.
    pub fn from_stats(stats: UrlStats, origin: &str) -> Self {
        let UrlStats { url, stats } = stats;

        Self {
            short_url: short_url(origin, &url.short_url),
            alias: url.alias.as_deref().map(|alias| short_url(origin, alias)),
            original_url: url.original_url,
            access_count: url.access_count,
            deleted: url.deleted,
            rate_limit: url.rate_limit,
            created_at: url.created_at,
            stats: stats
                .into_iter()
                .map(|(ip, group)| (ip, IpStatsResponse::from(group)))
                .collect(),
        }
    }
}

impl From<IpStats> for IpStatsResponse {
    fn from(stats: IpStats) -> Self {
        Self {
            count: stats.count,
            result: stats.result.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<VisitDetail> for VisitDetailResponse {
    fn from(detail: VisitDetail) -> Self {
        Self {
            agent: detail.agent,
            referer: detail.referer,
            accessed_at: detail.accessed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlRecord;

    #[test]
    fn test_serializes_camel_case_with_qualified_tokens() {
        let now = Utc::now();
        let mut stats = BTreeMap::new();
        stats.insert(
            "10.0.0.1".to_string(),
            IpStats {
                count: 1,
                result: vec![VisitDetail {
                    agent: Some("curl/8.0".to_string()),
                    referer: None,
                    accessed_at: now,
                }],
            },
        );

        let record = UrlRecord::new(
            1,
            "https://example.com".to_string(),
            "abc123".to_string(),
            Some("promo".to_string()),
            1,
            false,
            None,
            now,
        );

        let dto = UrlStatsResponse::from_stats(UrlStats { url: record, stats }, "http://sho.rt");
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["shortUrl"], "http://sho.rt/api/v1/urls/abc123");
        assert_eq!(json["alias"], "http://sho.rt/api/v1/urls/promo");
        assert_eq!(json["accessCount"], 1);
        assert!(json["rateLimit"].is_null());
        assert_eq!(json["stats"]["10.0.0.1"]["count"], 1);
        assert_eq!(json["stats"]["10.0.0.1"]["result"][0]["agent"], "curl/8.0");
        assert!(json["stats"]["10.0.0.1"]["result"][0]["accessedAt"].is_string());
    }
}
