use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use crate::config::StorageConfig;
use crate::domain::models::location::Location;

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: SqlitePool,
    operation_timeout: Duration,
}

impl DbConnection {
    /// Open (creating if needed) the database described by `config`
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let url = config.database_url.as_str();

        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.operation_timeout())
            .connect(url)
            .await
            .with_context(|| format!("Failed to connect to database {}", url))?;

        Self::from_pool(pool, config.operation_timeout()).await
    }

    /// Private in-memory database, used by tests and throwaway runs.
    ///
    /// A single connection that is never recycled, because every SQLite
    /// `:memory:` connection is a separate database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        Self::from_pool(pool, StorageConfig::default().operation_timeout()).await
    }

    async fn from_pool(pool: SqlitePool, operation_timeout: Duration) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool, operation_timeout })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run one storage operation under the configured timeout.
    ///
    /// Running out of time is reported like any other storage failure; the
    /// request fails immediately instead of retrying.
    pub async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.with_context(|| format!("Storage operation failed: {}", operation)),
            Err(_) => Err(anyhow::anyhow!(
                "Storage operation timed out after {:?}: {}",
                self.operation_timeout,
                operation
            )),
        }
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ambulance_bookings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                emergency TEXT NOT NULL,
                lat REAL,
                lng REAL,
                destination TEXT NOT NULL DEFAULT '',
                details TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                assigned INTEGER NOT NULL DEFAULT 0,
                driver_name TEXT,
                driver_ambulance_id TEXT,
                driver_lat REAL,
                driver_lng REAL,
                driver_accepted_at TEXT
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create ambulance_bookings table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_ambulance_bookings_assigned
            ON ambulance_bookings(assigned, created_at);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sos_alerts (
                id TEXT PRIMARY KEY,
                lat REAL,
                lng REAL,
                created_at TEXT NOT NULL,
                alert_type TEXT NOT NULL DEFAULT 'SOS',
                status TEXT NOT NULL,
                broadcast_to_hospitals INTEGER NOT NULL DEFAULT 1,
                broadcast_to_ambulances INTEGER NOT NULL DEFAULT 1
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create sos_alerts table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_sos_alerts_status_created_at
            ON sos_alerts(status, created_at);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blood_requests (
                id TEXT PRIMARY KEY,
                blood_group TEXT NOT NULL,
                units_required INTEGER NOT NULL,
                urgency TEXT NOT NULL,
                hospital_name TEXT NOT NULL,
                hospital_address TEXT NOT NULL,
                contact_number TEXT NOT NULL,
                additional_notes TEXT NOT NULL DEFAULT '',
                lat REAL,
                lng REAL,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL,
                emails_sent INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create blood_requests table")?;

        Ok(())
    }
}

/// Both coordinates present, or no location at all
pub(crate) fn location_from_columns(lat: Option<f64>, lng: Option<f64>) -> Option<Location> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
        _ => None,
    }
}
