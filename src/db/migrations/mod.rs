use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Embedded migrations, applied in order. The schema is finalized up front;
/// new files are appended, existing ones are never edited.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_create_detections",
        include_str!("sql/0001_create_detections.sql"),
    ),
    (
        "0002_create_alerts",
        include_str!("sql/0002_create_alerts.sql"),
    ),
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql).await?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}
