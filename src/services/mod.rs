pub mod alerts;
pub mod detector;
pub mod notifications;

#[cfg(test)]
mod tests;

pub use alerts::AlertService;
pub use detector::{DetectionCandidate, DisabledDetector, ObjectDetector};
pub use notifications::{NotificationChannel, NotificationService};
