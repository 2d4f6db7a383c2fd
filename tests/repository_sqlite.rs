mod common;

use chrono::Utc;
use shorturl::domain::entities::{AccessOutcome, NewUrlRecord, NewVisit, UrlPatch};
use shorturl::error::AppError;
use shorturl::infrastructure::persistence::{Database, PoolSettings};
use shorturl::utils::code_generator::generate_code;
use std::path::PathBuf;

fn new_url(code: &str) -> NewUrlRecord {
    NewUrlRecord {
        original_url: format!("https://example.com/{code}"),
        short_url: code.to_string(),
    }
}

fn patch(alias: &str, rate_limit: Option<i64>) -> UrlPatch {
    UrlPatch {
        alias: alias.to_string(),
        rate_limit,
    }
}

/// On-disk database file removed together with its WAL files on drop.
struct TempDatabaseFile(PathBuf);

impl TempDatabaseFile {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("shorturl-test-{}.db", generate_code())))
    }

    fn url(&self) -> String {
        format!("sqlite://{}", self.0.display())
    }
}

impl Drop for TempDatabaseFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[tokio::test]
async fn test_create_and_find() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();

    assert_eq!(created.short_url, "abc123");
    assert_eq!(created.access_count, 0);
    assert!(!created.deleted);
    assert!(created.alias.is_none());
    assert!(created.rate_limit.is_none());

    let found = urls.find_by_short_url("abc123").await.unwrap().unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_duplicate_short_code_conflicts() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    urls.create(new_url("abc123")).await.unwrap();
    let result = urls.create(new_url("abc123")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn test_find_by_identifier_matches_alias() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.update(created.id, patch("promo", None)).await.unwrap();

    let found = urls.find_by_identifier("promo").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(urls.find_by_identifier("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_identifier_prefers_live_record() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let old = urls.create(new_url("aaaaaa")).await.unwrap();
    urls.update(old.id, patch("promo", None)).await.unwrap();
    assert!(urls.soft_delete(old.id).await.unwrap());

    let new = urls.create(new_url("bbbbbb")).await.unwrap();
    urls.update(new.id, patch("promo", None)).await.unwrap();

    let found = urls.find_by_identifier("promo").await.unwrap().unwrap();
    assert_eq!(found.id, new.id);

    let holders = urls.find_live_holders("promo").await.unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].id, new.id);
}

#[tokio::test]
async fn test_deleted_record_still_found_by_identifier() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.soft_delete(created.id).await.unwrap();

    let found = urls.find_by_identifier("abc123").await.unwrap().unwrap();
    assert!(found.deleted);
    assert!(urls.find_live_by_identifier("abc123").await.unwrap().is_none());
}

#[tokio::test]
async fn test_alias_index_rejects_second_live_holder() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let first = urls.create(new_url("aaaaaa")).await.unwrap();
    let second = urls.create(new_url("bbbbbb")).await.unwrap();

    urls.update(first.id, patch("promo", None)).await.unwrap();
    let result = urls.update(second.id, patch("promo", None)).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn test_update_missing_or_deleted() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let result = urls.update(42, patch("promo", None)).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.soft_delete(created.id).await.unwrap();

    let result = urls.update(created.id, patch("promo", None)).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn test_soft_delete_twice() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();

    assert!(urls.soft_delete(created.id).await.unwrap());
    assert!(!urls.soft_delete(created.id).await.unwrap());
    assert!(!urls.soft_delete(9999).await.unwrap());
}

#[tokio::test]
async fn test_record_access_respects_limit() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.update(created.id, patch("promo", Some(2))).await.unwrap();

    for expected in 1..=2 {
        match urls.try_record_access(created.id).await.unwrap() {
            AccessOutcome::Granted(url) => assert_eq!(url.access_count, expected),
            other => panic!("expected access, got {other:?}"),
        }
    }

    assert_eq!(
        urls.try_record_access(created.id).await.unwrap(),
        AccessOutcome::LimitReached
    );

    let stored = urls.find_by_short_url("abc123").await.unwrap().unwrap();
    assert_eq!(stored.access_count, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_stops_at_limit() {
    let file = TempDatabaseFile::new();
    let settings = PoolSettings {
        max_connections: 8,
        ..PoolSettings::default()
    };
    let database = Database::connect(&file.url(), &settings).await.unwrap();
    database.migrate().await.unwrap();
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.update(created.id, patch("promo", Some(5))).await.unwrap();

    let id = created.id;
    let tasks: Vec<_> = (0..40)
        .map(|_| {
            let urls = urls.clone();
            tokio::spawn(async move { urls.try_record_access(id).await })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        match task.await.unwrap().unwrap() {
            AccessOutcome::Granted(url) => {
                assert!(url.access_count <= 5);
                granted += 1;
            }
            AccessOutcome::LimitReached => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(granted, 5);
    let stored = urls.find_by_short_url("abc123").await.unwrap().unwrap();
    assert_eq!(stored.access_count, 5);
}

#[tokio::test]
async fn test_record_access_zero_limit_is_unlimited() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.update(created.id, patch("promo", Some(0))).await.unwrap();

    for _ in 0..3 {
        assert!(matches!(
            urls.try_record_access(created.id).await.unwrap(),
            AccessOutcome::Granted(_)
        ));
    }
}

#[tokio::test]
async fn test_record_access_deleted_and_missing() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let created = urls.create(new_url("abc123")).await.unwrap();
    urls.soft_delete(created.id).await.unwrap();

    assert_eq!(
        urls.try_record_access(created.id).await.unwrap(),
        AccessOutcome::Deleted
    );
    assert_eq!(
        urls.try_record_access(9999).await.unwrap(),
        AccessOutcome::Missing
    );
}

#[tokio::test]
async fn test_list_and_count() {
    let database = common::create_test_database().await;
    let (urls, _) = database.repositories();

    let first = urls.create(new_url("aaaaaa")).await.unwrap();
    urls.create(new_url("bbbbbb")).await.unwrap();
    urls.soft_delete(first.id).await.unwrap();

    let listed = urls.list_all().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].short_url, "aaaaaa");
    assert!(listed[0].deleted);
    assert_eq!(urls.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_visits_kept_in_write_order() {
    let database = common::create_test_database().await;
    let (urls, visits) = database.repositories();

    let first = urls.create(new_url("aaaaaa")).await.unwrap();
    let second = urls.create(new_url("bbbbbb")).await.unwrap();

    for (url_id, ip) in [(first.id, "1.1.1.1"), (second.id, "2.2.2.2"), (first.id, "3.3.3.3")] {
        visits
            .record_visit(NewVisit {
                url_id,
                ip: ip.to_string(),
                agent: Some("agent".to_string()),
                referer: None,
                accessed_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let all = visits.list_all().await.unwrap();
    let ips: Vec<_> = all.iter().map(|v| v.ip.as_str()).collect();
    assert_eq!(ips, vec!["1.1.1.1", "2.2.2.2", "3.3.3.3"]);

    let for_first = visits.list_for_url(first.id).await.unwrap();
    assert_eq!(for_first.len(), 2);
    assert!(for_first.iter().all(|v| v.url_id == first.id));
    assert_eq!(for_first[0].agent.as_deref(), Some("agent"));
    assert!(for_first[0].referer.is_none());

    assert_eq!(visits.count().await.unwrap(), 3);
}
