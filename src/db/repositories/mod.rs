pub mod alerts;
pub mod detections;

pub use alerts::AlertsRepository;
pub use detections::DetectionsRepository;
