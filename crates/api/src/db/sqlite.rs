use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{path::Path, time::Duration};

/// Tables the dataset must provide; checked once at startup.
pub const REQUIRED_TABLES: &[&str] = &["measurement", "station"];

/// Handle to the pre-populated observation dataset.
///
/// The file is opened read-only and never created; each query borrows a
/// pooled connection for its own duration only.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-16000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open dataset at {}", path.display()))?;

        let db = Self::from_pool(pool);
        db.health_check().await?;
        info!("SQLite dataset opened read-only at: {}", path.display());

        Ok(db)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check connectivity and that both dataset tables are present.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        for table in REQUIRED_TABLES {
            let found: Option<String> = sqlx::query_scalar(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(*table)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to inspect schema for table {table}"))?;

            if found.is_none() {
                return Err(anyhow::anyhow!("Dataset is missing table: {}", table));
            }
        }

        Ok(())
    }
}
