//! Row types shared by the PostgreSQL and SQLite repositories.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::entities::{UrlRecord, Visit};

#[derive(Debug, FromRow)]
pub(crate) struct UrlRow {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub alias: Option<String>,
    pub access_count: i64,
    pub deleted: bool,
    pub rate_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(
            r.id,
            r.original_url,
            r.short_url,
            r.alias,
            r.access_count,
            r.deleted,
            r.rate_limit,
            r.created_at,
        )
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct VisitRow {
    pub id: i64,
    pub url_id: i64,
    pub ip: String,
    pub agent: Option<String>,
    pub referer: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(r: VisitRow) -> Self {
        Visit::new(r.id, r.url_id, r.ip, r.agent, r.referer, r.accessed_at)
    }
}
