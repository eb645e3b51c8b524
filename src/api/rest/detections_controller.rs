use crate::api::rest::{ApiResult, AppState};
use crate::db::models::Detection;
use crate::db::repositories::DetectionsRepository;
use crate::error::Error;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing detections
#[derive(Debug, Deserialize)]
pub struct ListDetectionsParams {
    pub limit: Option<i64>,
    pub class_name: Option<String>,
}

/// List response envelope
#[derive(Debug, Serialize)]
pub struct DetectionListResponse {
    pub detections: Vec<Detection>,
    pub total: i64,
}

/// GET /detections/
pub async fn list_detections(
    State(state): State<AppState>,
    Query(params): Query<ListDetectionsParams>,
) -> ApiResult<Json<DetectionListResponse>> {
    let limit = params.limit.unwrap_or(20);
    if !(1..=100).contains(&limit) {
        return Err(Error::Validation("limit must be between 1 and 100".to_string()).into());
    }

    let repo = DetectionsRepository::new(Arc::clone(&state.database.pool));
    let class_name = params.class_name.as_deref();
    let detections = repo.list(limit, class_name).await?;
    let total = repo.count(class_name).await?;

    Ok(Json(DetectionListResponse { detections, total }))
}
