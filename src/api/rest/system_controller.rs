use crate::api::rest::{ApiResult, AppState};
use crate::db::models::Detection;
use crate::db::repositories::DetectionsRepository;
use crate::error::Error;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// GET /
pub async fn root() -> Json<Value> {
    Json(serde_json::json!({"message": "Welcome to the TrailGuard API"}))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.database.health_check().await {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /api/health
pub async fn health_alias() -> Json<Value> {
    Json(serde_json::json!({"status": "healthy"}))
}

#[derive(Debug, Serialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    pub filename: Option<String>,
    pub coordinates: Coordinates,
    pub detections: Vec<Detection>,
}

/// POST /upload/
///
/// Accepts a camera-trap image plus optional GPS form fields, runs the
/// configured object detector and records one detection row per candidate.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut image: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut gps_lat: Option<f64> = None;
    let mut gps_lng: Option<f64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read file field: {}", e)))?;
                image = Some(bytes.to_vec());
            }
            Some("gps_lat") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read gps_lat: {}", e)))?;
                gps_lat = Some(
                    text.parse()
                        .map_err(|_| Error::Validation(format!("Invalid gps_lat: {}", text)))?,
                );
            }
            Some("gps_lng") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read gps_lng: {}", e)))?;
                gps_lng = Some(
                    text.parse()
                        .map_err(|_| Error::Validation(format!("Invalid gps_lng: {}", text)))?,
                );
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| Error::Validation("Missing file field".to_string()))?;

    let candidates = state
        .detector
        .detect(&image)
        .await
        .map_err(|e| Error::Detection(format!("Detector failed: {}", e)))?;

    info!(
        "Processed upload {:?} ({} bytes, {} candidates)",
        filename,
        image.len(),
        candidates.len()
    );

    let repo = DetectionsRepository::new(Arc::clone(&state.database.pool));
    let image_path = filename.clone().unwrap_or_else(|| "upload".to_string());

    let mut detections = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let detection = repo
            .create(&Detection {
                id: format!("det_{}", Uuid::new_v4().simple()),
                timestamp: Utc::now(),
                class_name: candidate.class_name,
                confidence: candidate.confidence,
                image_path: image_path.clone(),
                gps_lat,
                gps_lng,
            })
            .await?;
        detections.push(detection);
    }

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        message: "File uploaded successfully".to_string(),
        filename,
        coordinates: Coordinates {
            lat: gps_lat,
            lng: gps_lng,
        },
        detections,
    }))
}

/// POST /notifications/test
pub async fn test_notification(Json(payload): Json<Value>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": payload.get("message").cloned().unwrap_or(Value::Null),
    }))
}
