pub mod alert_models;
pub mod detection_models;

pub use alert_models::{Alert, AlertRow, AlertSeverity, AlertStatus, AlertType};
pub use detection_models::Detection;
