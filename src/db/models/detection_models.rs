use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detection model: one automated camera-trap sighting.
///
/// Rows are created by the ingestion path and immutable afterwards.
/// Dependent alerts are removed by cascade when a detection is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Detection {
    /// External detection identifier (e.g. "det_123"), assigned on ingest
    pub id: String,
    /// Capture time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Detected class label (e.g. "rhino")
    pub class_name: String,
    /// Model confidence, semantically in [0, 1]
    pub confidence: f64,
    /// Path or URI of the stored image
    pub image_path: String,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
}
