//! Visit entity: one append-only access-log entry per successful redirect.

use chrono::{DateTime, Utc};

/// A recorded redirect with client metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: i64,
    pub url_id: i64,
    pub ip: String,
    pub agent: Option<String>,
    pub referer: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(
        id: i64,
        url_id: i64,
        ip: String,
        agent: Option<String>,
        referer: Option<String>,
        accessed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url_id,
            ip,
            agent,
            referer,
            accessed_at,
        }
    }
}

/// Input data for appending a visit.
///
/// `accessed_at` is stamped by the caller so the timestamp reflects the moment the
/// redirect was granted rather than when the write lands.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub url_id: i64,
    pub ip: String,
    pub agent: Option<String>,
    pub referer: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

/// Client metadata captured from the redirect request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorInfo {
    pub ip: String,
    pub agent: Option<String>,
    pub referer: Option<String>,
}

impl VisitorInfo {
    pub fn new(ip: impl Into<String>, agent: Option<&str>, referer: Option<&str>) -> Self {
        Self {
            ip: ip.into(),
            agent: agent.map(str::to_string),
            referer: referer.map(str::to_string),
        }
    }

    /// Builds the log entry for a granted redirect on `url_id`.
    pub fn into_new_visit(self, url_id: i64, accessed_at: DateTime<Utc>) -> NewVisit {
        NewVisit {
            url_id,
            ip: self.ip,
            agent: self.agent,
            referer: self.referer,
            accessed_at,
        }
    }
}
