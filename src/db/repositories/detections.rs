use crate::db::models::Detection;
use crate::error::Error;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Detections repository for handling detection records
#[derive(Clone)]
pub struct DetectionsRepository {
    pool: Arc<PgPool>,
}

impl DetectionsRepository {
    /// Create a new detections repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new detection
    pub async fn create(&self, detection: &Detection) -> Result<Detection> {
        info!(
            "Recording detection {} ({})",
            detection.id, detection.class_name
        );

        let result = sqlx::query_as::<_, Detection>(
            r#"
            INSERT INTO detections (
                id, timestamp, class_name, confidence, image_path, gps_lat, gps_lng
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, timestamp, class_name, confidence, image_path, gps_lat, gps_lng
            "#,
        )
        .bind(&detection.id)
        .bind(detection.timestamp)
        .bind(&detection.class_name)
        .bind(detection.confidence)
        .bind(&detection.image_path)
        .bind(detection.gps_lat)
        .bind(detection.gps_lng)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                Error::AlreadyExists(format!("Detection already exists: {}", detection.id))
            }
            _ => Error::Database(format!("Failed to create detection: {}", e)),
        })?;

        Ok(result)
    }

    /// Get detection by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, timestamp, class_name, confidence, image_path, gps_lat, gps_lng
            FROM detections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get detection by ID: {}", e)))?;

        Ok(result)
    }

    /// Check whether a detection exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM detections WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to check detection existence: {}", e)))?;

        Ok(found.is_some())
    }

    /// List detections, newest first, optionally filtered by class label
    pub async fn list(&self, limit: i64, class_name: Option<&str>) -> Result<Vec<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, timestamp, class_name, confidence, image_path, gps_lat, gps_lng
            FROM detections
            WHERE ($1::text IS NULL OR class_name = $1)
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(class_name)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list detections: {}", e)))?;

        Ok(result)
    }

    /// Count detections, optionally filtered by class label
    pub async fn count(&self, class_name: Option<&str>) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM detections WHERE ($1::text IS NULL OR class_name = $1)",
        )
        .bind(class_name)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to count detections: {}", e)))?;

        Ok(total)
    }

    /// Delete a detection; dependent alerts are removed by cascade
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM detections WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete detection: {}", e)))?;

        Ok(result.rows_affected())
    }
}
