use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::Serialize;

/// One candidate sighting produced by the detection model
#[derive(Debug, Clone, Serialize)]
pub struct DetectionCandidate {
    pub class_name: String,
    pub confidence: f64,
    /// Bounding box as [x_min, y_min, x_max, y_max] in pixels
    pub bbox: [f64; 4],
}

/// Object detection model seam (image bytes in, candidates out).
/// The inference backend is a black box to the rest of the service.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect(&self, image: &[u8]) -> Result<Vec<DetectionCandidate>>;
}

/// Placeholder detector used until a model backend is wired in.
/// Always returns no candidates.
pub struct DisabledDetector;

#[async_trait]
impl ObjectDetector for DisabledDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<DetectionCandidate>> {
        debug!("Detector disabled; ignoring {} byte image", image.len());
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_detector_returns_no_candidates() {
        let detector = DisabledDetector;
        let candidates = detector.detect(&[0u8; 16]).await.unwrap();
        assert!(candidates.is_empty());
    }
}
