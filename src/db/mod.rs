use crate::config::DatabaseConfig;
use crate::error::Error;
use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub mod migrations;
pub mod models;
pub mod repositories;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the connection pool for the detection and alert tables, applies the
/// embedded schema, and answers liveness probes for the health endpoint.
pub struct DatabaseService {
    pub pool: Arc<PgPool>,
}

impl DatabaseService {
    /// Connect to the database named in the configuration, applying the
    /// schema first when `auto_migrate` is set.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to PostgreSQL database");

        let service = Self::from_pool(Arc::new(pool));

        if config.auto_migrate {
            service.run_migrations().await?;
        }

        Ok(service)
    }

    /// Wrap an existing pool (used by tests and tooling that manage their
    /// own connection)
    pub fn from_pool(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to run migrations: {}", e)))?;

        info!("Database schema is up to date");

        Ok(())
    }

    /// Liveness probe: true when the database answers a trivial query.
    /// Failures are logged and reported as `false`, not as errors, so the
    /// health endpoint can degrade instead of erroring.
    pub async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&*self.pool).await {
            Ok(_) => true,
            Err(e) => {
                error!("Database health check failed: {}", e);
                false
            }
        }
    }
}
