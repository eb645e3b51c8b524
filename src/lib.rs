pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod security;
pub mod services;

// Re-export main components for easier use
pub use db::models::{Alert, AlertSeverity, AlertStatus, AlertType, Detection};
pub use error::Error;
pub use services::{AlertService, NotificationService};
