//! CLI administration tool for shorturl.
//!
//! Inspects and manages URL records directly against the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all records with counters
//! cargo run --bin admin -- urls list
//!
//! # Per-IP visit summary for one record
//! cargo run --bin admin -- urls stats promo
//!
//! # Soft-delete a record
//! cargo run --bin admin -- urls delete abc123 --yes
//!
//! # Set alias and quota
//! cargo run --bin admin -- urls alias abc123 promo --rate-limit 100
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL or SQLite connection string
//! - `REDIS_URL` (optional): shared cache to evict on delete / alias changes

use shorturl::application::services::{StatsService, UrlService};
use shorturl::config::{CacheBackend, Config, mask_connection_string};
use shorturl::domain::stats::UrlStats;
use shorturl::infrastructure::cache::{CacheService, NullCache, RedisCache};
use shorturl::infrastructure::persistence::{Database, PoolSettings};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage URL records
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// URL record subcommands.
#[derive(Subcommand)]
enum UrlsAction {
    /// List all records, deleted ones included
    List,

    /// Show per-IP visit statistics for a record
    Stats {
        /// Short code or alias
        id: String,
    },

    /// Soft-delete a record
    Delete {
        /// Short code or alias
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Set the alias and visit quota of a record
    Alias {
        /// Short code or current alias
        id: String,

        /// New alias
        alias: String,

        /// Maximum number of redirects; omit to remove the quota
        #[arg(short, long)]
        rate_limit: Option<i64>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show totals
    Check,

    /// Apply pending migrations
    Migrate,
}

/// Services the commands run against.
struct Admin {
    database: Database,
    urls: UrlService,
    stats: StatsService,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let admin = connect(&config).await?;

    match cli.command {
        Commands::Urls { action } => handle_urls_action(action, &admin).await?,
        Commands::Db { action } => handle_db_action(action, &admin, &config).await?,
    }

    Ok(())
}

/// Opens the database and wires the services.
///
/// Only a Redis cache is shared with running servers, so in-process cache
/// settings are ignored here.
async fn connect(config: &Config) -> Result<Admin> {
    let database =
        Database::connect(&config.database_url, &PoolSettings::from_config(config)).await?;

    let cache: Arc<dyn CacheService> = match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(url)) => match RedisCache::connect(url, config.cache_ttl_seconds).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!("{} {}", "⚠️  Redis unavailable, cache not evicted:".yellow(), e);
                Arc::new(NullCache::new())
            }
        },
        _ => Arc::new(NullCache::new()),
    };

    let (url_repository, visit_repository) = database.repositories();

    Ok(Admin {
        urls: UrlService::new(
            url_repository.clone(),
            visit_repository.clone(),
            cache,
            config.cache_ttl_seconds,
        ),
        stats: StatsService::new(url_repository, visit_repository),
        database,
    })
}

/// Dispatches URL record commands.
async fn handle_urls_action(action: UrlsAction, admin: &Admin) -> Result<()> {
    match action {
        UrlsAction::List => list_urls(admin).await,
        UrlsAction::Stats { id } => show_stats(admin, &id).await,
        UrlsAction::Delete { id, yes } => delete_url(admin, &id, yes).await,
        UrlsAction::Alias {
            id,
            alias,
            rate_limit,
        } => set_alias(admin, &id, alias, rate_limit).await,
    }
}

/// Lists all records.
///
/// # Output Format
///
/// ```text
/// 📋 URL records
///
///   Code          Alias            Visits   Limit   Status   Original URL
///   ──────────────────────────────────────────────────────────────────────
///   Xk3b9QwE2fZa  promo            12       100     LIVE     https://example.com
///   pQ81mZxc0aLr  -                3        -       DELETED  https://example.org
/// ```
async fn list_urls(admin: &Admin) -> Result<()> {
    println!("{}", "📋 URL records".bright_blue().bold());
    println!();

    let listed = admin.stats.list_with_stats().await?;

    if listed.is_empty() {
        println!("{}", "  No records found".yellow());
        return Ok(());
    }

    println!(
        "  {:<13} {:<16} {:<8} {:<7} {:<8} {}",
        "Code".bright_white().bold(),
        "Alias".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Limit".bright_white().bold(),
        "Status".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for UrlStats { url, .. } in &listed {
        let status = if url.deleted {
            "DELETED".red()
        } else if url.is_rate_limited() {
            "LIMITED".yellow()
        } else {
            "LIVE".green()
        };

        let limit = url
            .effective_rate_limit()
            .map_or_else(|| "-".to_string(), |l| l.to_string());

        println!(
            "  {:<13} {:<16} {:<8} {:<7} {:<8} {}",
            url.short_url.cyan(),
            url.alias.as_deref().unwrap_or("-"),
            url.access_count,
            limit,
            status,
            url.original_url.bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        listed.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints the per-IP visit summary of one record.
async fn show_stats(admin: &Admin, id: &str) -> Result<()> {
    let UrlStats { url, stats } = admin.stats.stats_for(id).await?;

    println!("{}", "📊 Visit statistics".bright_blue().bold());
    println!();
    println!("  Code:     {}", url.short_url.cyan());
    println!("  Alias:    {}", url.alias.as_deref().unwrap_or("-"));
    println!("  Target:   {}", url.original_url);
    println!(
        "  Visits:   {}",
        url.access_count.to_string().bright_green().bold()
    );
    if url.deleted {
        println!("  Status:   {}", "DELETED".red());
    }
    println!();

    if stats.is_empty() {
        println!("{}", "  No visits recorded".yellow());
        return Ok(());
    }

    for (ip, group) in &stats {
        println!(
            "  {} ({} visits)",
            ip.bright_white().bold(),
            group.count.to_string().bright_green()
        );

        for visit in &group.result {
            println!(
                "    {}  {}  {}",
                visit
                    .accessed_at
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .bright_black(),
                visit.agent.as_deref().unwrap_or("-"),
                visit.referer.as_deref().unwrap_or("-").bright_black()
            );
        }
    }
    println!();

    Ok(())
}

/// Soft-deletes a record after confirmation.
async fn delete_url(admin: &Admin, id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete URL".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Soft-delete '{}'?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    admin.urls.delete(id).await?;

    println!("{}", "✅ URL deleted".green().bold());
    println!();

    Ok(())
}

/// Sets alias and quota.
async fn set_alias(
    admin: &Admin,
    id: &str,
    alias: String,
    rate_limit: Option<i64>,
) -> Result<()> {
    let updated = admin.urls.update_alias(id, alias, rate_limit).await?;

    println!("{}", "✅ URL updated".green().bold());
    println!("  Code:  {}", updated.short_url.cyan());
    println!("  Alias: {}", updated.alias.as_deref().unwrap_or("-"));
    println!(
        "  Limit: {}",
        updated
            .effective_rate_limit()
            .map_or_else(|| "unlimited".to_string(), |l| l.to_string())
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, admin: &Admin, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            println!(
                "  {} ({})",
                mask_connection_string(&config.database_url).bright_black(),
                admin.database.backend().as_str()
            );

            admin.database.ping().await?;
            println!("{}", "✅ Database connection OK".green().bold());

            let totals = admin.stats.totals().await?;
            println!();
            println!(
                "  URLs:   {}",
                totals.urls.to_string().bright_green().bold()
            );
            println!(
                "  Visits: {}",
                totals.visits.to_string().bright_green().bold()
            );
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());

            admin.database.migrate().await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
