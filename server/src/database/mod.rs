//! Database layer for the monitoring service.
//!
//! SQLite persistence for:
//! - Monitors (the only shared mutable resource)
//! - Pings (append-only liveness events)
//! - Alert logs (append-only delivery audit)
//!
//! The module is organized into submodules:
//! - `records` - All record types (entities)
//! - `monitors` - Monitor reads, writes, and the alert check-and-set
//! - `pings` - Ping inserts and counts
//! - `alert_logs` - Alert audit trail

mod alert_logs;
mod monitors;
mod pings;
mod records;

pub use records::*;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Opening database at {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create database directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;
        info!("Database initialized");
        Ok(database)
    }

    /// In-memory database for tests. Single connection so the schema
    /// survives across acquires.
    pub async fn new_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let monitors_table_sql = r#"
            CREATE TABLE IF NOT EXISTS monitors (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                interval_seconds INTEGER NOT NULL,
                grace_seconds INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'new',
                last_ping_at DATETIME,
                next_expected_at DATETIME,
                last_alert_at DATETIME,
                alert_email BOOLEAN NOT NULL DEFAULT 1,
                webhook_url TEXT,
                is_paused BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(monitors_table_sql).execute(&self.pool).await {
            error!("Failed to create monitors table: {}", e);
            return Err(e.into());
        }

        let monitors_slug_idx =
            "CREATE INDEX IF NOT EXISTS idx_monitors_slug ON monitors(slug)";
        sqlx::query(monitors_slug_idx).execute(&self.pool).await?;

        let monitors_user_idx =
            "CREATE INDEX IF NOT EXISTS idx_monitors_user ON monitors(user_id, created_at DESC)";
        sqlx::query(monitors_user_idx).execute(&self.pool).await?;

        let monitors_sweep_idx =
            "CREATE INDEX IF NOT EXISTS idx_monitors_sweep ON monitors(is_paused, status)";
        sqlx::query(monitors_sweep_idx).execute(&self.pool).await?;

        let pings_table_sql = r#"
            CREATE TABLE IF NOT EXISTS pings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                monitor_id TEXT NOT NULL REFERENCES monitors(id),
                received_at DATETIME NOT NULL,
                source_ip TEXT,
                user_agent TEXT
            )
        "#;
        if let Err(e) = sqlx::query(pings_table_sql).execute(&self.pool).await {
            error!("Failed to create pings table: {}", e);
            return Err(e.into());
        }

        let pings_idx =
            "CREATE INDEX IF NOT EXISTS idx_pings_monitor ON pings(monitor_id, received_at DESC)";
        sqlx::query(pings_idx).execute(&self.pool).await?;

        let alert_logs_table_sql = r#"
            CREATE TABLE IF NOT EXISTS alert_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                monitor_id TEXT NOT NULL REFERENCES monitors(id),
                channel TEXT NOT NULL,
                message TEXT NOT NULL,
                success BOOLEAN NOT NULL,
                error TEXT,
                sent_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(alert_logs_table_sql).execute(&self.pool).await {
            error!("Failed to create alert_logs table: {}", e);
            return Err(e.into());
        }

        let alert_logs_idx = "CREATE INDEX IF NOT EXISTS idx_alert_logs_monitor ON alert_logs(monitor_id, sent_at DESC)";
        sqlx::query(alert_logs_idx).execute(&self.pool).await?;

        Ok(())
    }
}
