use crate::db::models::{Alert, AlertRow, AlertStatus};
use crate::error::Error;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const ALERT_COLUMNS: &str = "id, detection_id, status, alert_type, severity, source, notes, \
     lat, lng, zone_label, created_by, notification_sent, notification_timestamp, \
     message, created_at, updated_at";

/// Alerts repository for handling alert records
#[derive(Clone)]
pub struct AlertsRepository {
    pool: Arc<PgPool>,
}

impl AlertsRepository {
    /// Create a new alerts repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Insert a new alert inside the caller's transaction.
    ///
    /// The trigger flow spans one transaction across the initial insert and
    /// the post-dispatch status update, so a crash in between leaves no
    /// partial alert behind.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        alert: &Alert,
    ) -> Result<Alert> {
        info!(
            "Creating alert {} for detection {}",
            alert.id, alert.detection_id
        );

        let row = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            INSERT INTO alerts (
                id, detection_id, status, alert_type, severity, source, notes,
                lat, lng, zone_label, created_by, notification_sent,
                notification_timestamp, message, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(alert.id)
        .bind(&alert.detection_id)
        .bind(alert.status.as_str())
        .bind(alert.alert_type.as_str())
        .bind(alert.severity.as_str())
        .bind(&alert.source)
        .bind(&alert.notes)
        .bind(alert.lat)
        .bind(alert.lng)
        .bind(&alert.zone_label)
        .bind(&alert.created_by)
        .bind(alert.notification_sent)
        .bind(alert.notification_timestamp)
        .bind(&alert.message)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to create alert: {}", e)))?;

        row.into_alert()
    }

    /// Record the notification outcome on a freshly created alert, inside
    /// the same transaction as the insert.
    pub async fn finalize_dispatch(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: AlertStatus,
        notification_sent: bool,
        notification_timestamp: Option<DateTime<Utc>>,
    ) -> Result<Alert> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            UPDATE alerts
            SET status = $2,
                notification_sent = $3,
                notification_timestamp = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(notification_sent)
        .bind(notification_timestamp)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to record notification outcome: {}", e)))?;

        row.into_alert()
    }

    /// Get alert by its canonical ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Alert>> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get alert by ID: {}", e)))?;

        row.map(AlertRow::into_alert).transpose()
    }

    /// List alerts newest-first, optionally filtered by status
    pub async fn list(
        &self,
        limit: i64,
        skip: i64,
        status: Option<AlertStatus>,
    ) -> Result<Vec<Alert>> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM alerts
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            OFFSET $2
            LIMIT $3
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .bind(skip)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list alerts: {}", e)))?;

        rows.into_iter().map(AlertRow::into_alert).collect()
    }

    /// Count alerts matching the status filter, before pagination
    pub async fn count(&self, status: Option<AlertStatus>) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM alerts WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to count alerts: {}", e)))?;

        Ok(total)
    }

    /// Set an alert's status, refreshing `updated_at`. Returns `None` when
    /// no alert has the given ID.
    pub async fn update_status(&self, id: Uuid, status: AlertStatus) -> Result<Option<Alert>> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            UPDATE alerts
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update alert status: {}", e)))?;

        row.map(AlertRow::into_alert).transpose()
    }
}
