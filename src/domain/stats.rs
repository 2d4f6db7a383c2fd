//! Per-URL, per-IP visit summaries derived from the visit log.
//!
//! The summary is never stored. [`group_visits`] folds the raw log into
//! `(url_id, ip)` groups and [`UrlStats::join`] attaches each URL record to its
//! groups, keeping records that were never visited.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::entities::{UrlRecord, Visit};

/// Details of a single visit inside an IP group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDetail {
    pub agent: Option<String>,
    pub referer: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

/// Visits from one IP address to one URL, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpStats {
    pub count: i64,
    pub result: Vec<VisitDetail>,
}

/// Visit summaries for one URL keyed by visitor IP.
pub type StatGroup = BTreeMap<String, IpStats>;

/// A URL record joined with its visit summaries.
#[derive(Debug, Clone)]
pub struct UrlStats {
    pub url: UrlRecord,
    pub stats: StatGroup,
}

impl UrlStats {
    /// Joins every record (deleted ones included) with its visit groups.
    ///
    /// Records without visits get an empty mapping; groups whose `url_id` matches
    /// no record are dropped.
    pub fn join(urls: Vec<UrlRecord>, mut groups: HashMap<i64, StatGroup>) -> Vec<UrlStats> {
        urls.into_iter()
            .map(|url| {
                let stats = groups.remove(&url.id).unwrap_or_default();
                UrlStats { url, stats }
            })
            .collect()
    }
}

/// Groups visits by `(url_id, ip)`.
///
/// The input is expected in write order; each group's `result` keeps that order and
/// `count` always equals `result.len()`.
pub fn group_visits<I>(visits: I) -> HashMap<i64, StatGroup>
where
    I: IntoIterator<Item = Visit>,
{
    let mut groups: HashMap<i64, StatGroup> = HashMap::new();

    for visit in visits {
        let entry = groups
            .entry(visit.url_id)
            .or_default()
            .entry(visit.ip)
            .or_default();

        entry.count += 1;
        entry.result.push(VisitDetail {
            agent: visit.agent,
            referer: visit.referer,
            accessed_at: visit.accessed_at,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn visit(id: i64, url_id: i64, ip: &str, agent: &str, at: DateTime<Utc>) -> Visit {
        Visit::new(id, url_id, ip.to_string(), Some(agent.to_string()), None, at)
    }

    fn url(id: i64, code: &str, deleted: bool) -> UrlRecord {
        UrlRecord::new(
            id,
            format!("https://example.com/{code}"),
            code.to_string(),
            None,
            0,
            deleted,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_group_two_ips_same_url() {
        let t0 = Utc::now();
        let visits = vec![
            visit(1, 1, "10.0.0.1", "Firefox", t0),
            visit(2, 1, "10.0.0.2", "Chrome", t0 + Duration::seconds(1)),
            visit(3, 1, "10.0.0.1", "Safari", t0 + Duration::seconds(2)),
        ];

        let groups = group_visits(visits);
        let stats = &groups[&1];

        assert_eq!(stats.len(), 2);
        assert_eq!(stats["10.0.0.1"].count, 2);
        assert_eq!(stats["10.0.0.2"].count, 1);

        let agents: Vec<_> = stats["10.0.0.1"]
            .result
            .iter()
            .map(|d| d.agent.as_deref().unwrap())
            .collect();
        assert_eq!(agents, vec!["Firefox", "Safari"]);
        assert_eq!(stats["10.0.0.1"].result[1].accessed_at, t0 + Duration::seconds(2));
    }

    #[test]
    fn test_group_separates_urls() {
        let t0 = Utc::now();
        let groups = group_visits(vec![
            visit(1, 1, "10.0.0.1", "A", t0),
            visit(2, 2, "10.0.0.1", "B", t0),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&1]["10.0.0.1"].count, 1);
        assert_eq!(groups[&2]["10.0.0.1"].count, 1);
    }

    #[test]
    fn test_join_keeps_unvisited_and_deleted_records() {
        let t0 = Utc::now();
        let groups = group_visits(vec![visit(1, 2, "1.1.1.1", "A", t0)]);

        let joined = UrlStats::join(vec![url(1, "aaa", false), url(2, "bbb", true)], groups);

        assert_eq!(joined.len(), 2);
        assert!(joined[0].stats.is_empty());
        assert!(joined[1].url.deleted);
        assert_eq!(joined[1].stats["1.1.1.1"].count, 1);
    }

    #[test]
    fn test_join_drops_orphan_groups() {
        let groups = group_visits(vec![visit(1, 99, "1.1.1.1", "A", Utc::now())]);
        let joined = UrlStats::join(vec![url(1, "aaa", false)], groups);

        assert_eq!(joined.len(), 1);
        assert!(joined[0].stats.is_empty());
    }
}
