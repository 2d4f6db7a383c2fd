//! SQLite implementation of the visit-log repository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::rows::VisitRow;
use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

/// SQLite repository for the append-only visit log.
pub struct SqliteVisitRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for SqliteVisitRepository {
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visits (url_id, ip, agent, referer, accessed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, url_id, ip, agent, referer, accessed_at
            "#,
        )
        .bind(new_visit.url_id)
        .bind(&new_visit.ip)
        .bind(&new_visit.agent)
        .bind(&new_visit.referer)
        .bind(new_visit.accessed_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Visit>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, url_id, ip, agent, referer, accessed_at
            FROM visits
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_url(&self, url_id: i64) -> Result<Vec<Visit>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, url_id, ip, agent, referer, accessed_at
            FROM visits
            WHERE url_id = ?1
            ORDER BY id
            "#,
        )
        .bind(url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
