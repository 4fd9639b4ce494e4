//! # Storage
//!
//! SQLite connection pool and schema bootstrap. The repositories in the
//! Application layer borrow the pool from here.

use crate::domain::config::StorageConfig;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS leveling (
        user_id TEXT PRIMARY KEY,
        power_level INTEGER NOT NULL DEFAULT 1,
        points INTEGER NOT NULL DEFAULT 0,
        pushup INTEGER NOT NULL DEFAULT 0,
        pullup INTEGER NOT NULL DEFAULT 0,
        run INTEGER NOT NULL DEFAULT 0,
        situp INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS time_management (
        user_id TEXT PRIMARY KEY,
        power_level INTEGER NOT NULL DEFAULT 1,
        points INTEGER NOT NULL DEFAULT 0,
        total_minutes INTEGER NOT NULL DEFAULT 0,
        daily_goal_on DATE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS goals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        deadline DATE NOT NULL,
        priority TEXT NOT NULL,
        progress INTEGER NOT NULL DEFAULT 0,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        UNIQUE (user_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS timers (
        user_id TEXT NOT NULL,
        task_name TEXT NOT NULL,
        start_time DATETIME NOT NULL,
        duration INTEGER,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (user_id, task_name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schedules (
        user_id TEXT NOT NULL,
        schedule_date DATE NOT NULL,
        task_name TEXT NOT NULL,
        task_time TIME NOT NULL,
        is_weekly BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (user_id, schedule_date, task_name)
    )
    "#,
];

/// Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        tracing::info!("Opening database {}", config.database_url);

        if let Some(path) = config.database_url.strip_prefix("sqlite:")
            && !path.starts_with(':')
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("Invalid database url")?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.initialize_tables().await?;
        Ok(db)
    }

    /// Single-connection in-memory database; the connection is never recycled
    /// so the data lives as long as the pool.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let db = Self { pool };
        db.initialize_tables().await.expect("schema");
        db
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn initialize_tables(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to create schema")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = Database::in_memory().await;
        db.initialize_tables().await.unwrap();

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
        for table in ["goals", "leveling", "schedules", "time_management", "timers"] {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_connect_creates_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bot.db");
        let config = StorageConfig {
            database_url: format!("sqlite:{}", path.display()),
            max_connections: 2,
        };

        let db = Database::connect(&config).await.unwrap();
        sqlx::query("INSERT INTO leveling (user_id) VALUES ('@a:hs')")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(path.exists());
    }
}
