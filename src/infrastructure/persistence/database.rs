//! Connection pool setup and backend selection.
//!
//! The backend is chosen from the `DATABASE_URL` scheme: `postgres://` or
//! `postgresql://` selects PostgreSQL, `sqlite:` selects SQLite.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use super::{PgUrlRepository, PgVisitRepository, SqliteUrlRepository, SqliteVisitRepository};
use crate::config::Config;
use crate::domain::repositories::{UrlRepository, VisitRepository};

/// How long a SQLite writer waits for the write lock held by another connection.
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Supported storage engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Infers the backend from a connection string.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Pool settings extracted from [`Config`].
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_connections: config.db_max_connections,
            connect_timeout: Duration::from_secs(config.db_connect_timeout),
            idle_timeout: Duration::from_secs(config.db_idle_timeout),
            max_lifetime: Duration::from_secs(config.db_max_lifetime),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// A connection pool for one of the supported backends.
#[derive(Clone, Debug)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    /// Opens a pool for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheme is unsupported or the connection fails.
    pub async fn connect(url: &str, settings: &PoolSettings) -> Result<Self> {
        match DatabaseBackend::from_url(url) {
            Some(DatabaseBackend::Postgres) => {
                let pool = PgPoolOptions::new()
                    .max_connections(settings.max_connections)
                    .acquire_timeout(settings.connect_timeout)
                    .idle_timeout(settings.idle_timeout)
                    .max_lifetime(settings.max_lifetime)
                    .connect(url)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                Ok(Self::Postgres(pool))
            }
            Some(DatabaseBackend::Sqlite) => {
                let options = SqliteConnectOptions::from_str(url)
                    .context("Invalid SQLite connection string")?
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .busy_timeout(SQLITE_BUSY_TIMEOUT);
                let pool = SqlitePoolOptions::new()
                    .max_connections(settings.max_connections)
                    .acquire_timeout(settings.connect_timeout)
                    .connect_with(options)
                    .await
                    .context("Failed to open SQLite database")?;
                Ok(Self::Sqlite(pool))
            }
            None => anyhow::bail!("Unsupported DATABASE_URL scheme"),
        }
    }

    /// Opens a pool, retrying with exponential backoff.
    ///
    /// Useful when the database container starts alongside the service.
    pub async fn connect_with_retry(
        url: &str,
        settings: &PoolSettings,
        retries: usize,
    ) -> Result<Self> {
        let strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(retries);

        Retry::start(strategy, || async {
            Self::connect(url, settings).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        })
        .await
    }

    /// Applies the embedded migrations for this backend.
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Postgres(pool) => sqlx::migrate!("./migrations/postgres")
                .run(pool)
                .await
                .context("Failed to run PostgreSQL migrations")?,
            Self::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite")
                .run(pool)
                .await
                .context("Failed to run SQLite migrations")?,
        }
        Ok(())
    }

    /// Builds the repositories backed by this pool.
    pub fn repositories(&self) -> (Arc<dyn UrlRepository>, Arc<dyn VisitRepository>) {
        match self {
            Self::Postgres(pool) => {
                let pool = Arc::new(pool.clone());
                (
                    Arc::new(PgUrlRepository::new(pool.clone())),
                    Arc::new(PgVisitRepository::new(pool)),
                )
            }
            Self::Sqlite(pool) => {
                let pool = Arc::new(pool.clone());
                (
                    Arc::new(SqliteUrlRepository::new(pool.clone())),
                    Arc::new(SqliteVisitRepository::new(pool)),
                )
            }
        }
    }

    /// Runs a trivial query to verify connectivity.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        match self {
            Self::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Self::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Postgres(_) => DatabaseBackend::Postgres,
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
        }
    }
}
