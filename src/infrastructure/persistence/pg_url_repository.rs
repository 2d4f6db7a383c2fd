//! PostgreSQL implementation of the URL record repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::UrlRow;
use crate::domain::entities::{AccessOutcome, NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// PostgreSQL repository for URL records.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (original_url, short_url, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            "#,
        )
        .bind(&new_url.original_url)
        .bind(&new_url.short_url)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            WHERE short_url = $1
            "#,
        )
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            WHERE short_url = $1 OR alias = $1
            ORDER BY deleted ASC, id DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_live_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            WHERE (short_url = $1 OR alias = $1) AND deleted = FALSE
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_live_holders(&self, token: &str) -> Result<Vec<UrlRecord>, AppError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            WHERE (short_url = $1 OR alias = $1) AND deleted = FALSE
            ORDER BY id
            "#,
        )
        .bind(token)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: UrlPatch) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            UPDATE urls
            SET alias = $2, rate_limit = $3
            WHERE id = $1 AND deleted = FALSE
            RETURNING id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            "#,
        )
        .bind(id)
        .bind(&patch.alias)
        .bind(patch.rate_limit)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE urls SET deleted = TRUE WHERE id = $1 AND deleted = FALSE")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn try_record_access(&self, id: i64) -> Result<AccessOutcome, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            UPDATE urls
            SET access_count = access_count + 1
            WHERE id = $1
              AND deleted = FALSE
              AND (rate_limit IS NULL OR rate_limit = 0 OR access_count < rate_limit)
            RETURNING id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = row {
            return Ok(AccessOutcome::Granted(row.into()));
        }

        Ok(match self.find_by_id(id).await? {
            None => AccessOutcome::Missing,
            Some(url) if url.deleted => AccessOutcome::Deleted,
            Some(_) => AccessOutcome::LimitReached,
        })
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_url, alias, access_count, deleted, rate_limit, created_at
            FROM urls
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
