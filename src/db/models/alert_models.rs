use crate::error::Error;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical alert status, used end-to-end: one lifecycle, one vocabulary.
/// Stored as its lowercase name; the mapping is total in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Created,
    Sent,
    Acknowledged,
    InProgress,
    Resolved,
    Failed,
    Expired,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Created => "created",
            AlertStatus::Sent => "sent",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::InProgress => "in_progress",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Failed => "failed",
            AlertStatus::Expired => "expired",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = Error;

    // Case-insensitive: operators send names like "ACKNOWLEDGED"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created" => Ok(AlertStatus::Created),
            "sent" => Ok(AlertStatus::Sent),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            "in_progress" => Ok(AlertStatus::InProgress),
            "resolved" => Ok(AlertStatus::Resolved),
            "failed" => Ok(AlertStatus::Failed),
            "expired" => Ok(AlertStatus::Expired),
            other => Err(Error::Validation(format!("Unknown alert status: {}", other))),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an operator-facing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    PoacherSuspected,
    VehicleSuspected,
    RhinoSighting,
    Other,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::PoacherSuspected => "poacher_suspected",
            AlertType::VehicleSuspected => "vehicle_suspected",
            AlertType::RhinoSighting => "rhino_sighting",
            AlertType::Other => "other",
        }
    }

    /// Human-readable form for rendered messages ("Poacher Suspected")
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for AlertType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poacher_suspected" => Ok(AlertType::PoacherSuspected),
            "vehicle_suspected" => Ok(AlertType::VehicleSuspected),
            "rhino_sighting" => Ok(AlertType::RhinoSighting),
            "other" => Ok(AlertType::Other),
            other => Err(Error::Validation(format!("Unknown alert type: {}", other))),
        }
    }
}

/// Alert severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(Error::Validation(format!("Unknown severity: {}", other))),
        }
    }
}

/// Alert model
///
/// `id` is the single caller-facing handle, generated independently of the
/// detection it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub detection_id: String,
    pub status: AlertStatus,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub source: String,
    pub notes: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zone_label: Option<String>,
    pub created_by: Option<String>,
    pub notification_sent: bool,
    pub notification_timestamp: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row shape for alerts, with enums flattened to their stored text
/// form. Conversion to `Alert` is fallible only if a row was written outside
/// this crate.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    pub id: Uuid,
    pub detection_id: String,
    pub status: String,
    pub alert_type: String,
    pub severity: String,
    pub source: String,
    pub notes: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zone_label: Option<String>,
    pub created_by: Option<String>,
    pub notification_sent: bool,
    pub notification_timestamp: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertRow {
    pub fn into_alert(self) -> Result<Alert> {
        let status = AlertStatus::from_str(&self.status)
            .map_err(|_| Error::Database(format!("Corrupt alert status: {}", self.status)))?;
        let alert_type = AlertType::from_str(&self.alert_type)
            .map_err(|_| Error::Database(format!("Corrupt alert type: {}", self.alert_type)))?;
        let severity = AlertSeverity::from_str(&self.severity)
            .map_err(|_| Error::Database(format!("Corrupt severity: {}", self.severity)))?;

        Ok(Alert {
            id: self.id,
            detection_id: self.detection_id,
            status,
            alert_type,
            severity,
            source: self.source,
            notes: self.notes,
            lat: self.lat,
            lng: self.lng,
            zone_label: self.zone_label,
            created_by: self.created_by,
            notification_sent: self.notification_sent,
            notification_timestamp: self.notification_timestamp,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_stored_form() {
        let all = [
            AlertStatus::Created,
            AlertStatus::Sent,
            AlertStatus::Acknowledged,
            AlertStatus::InProgress,
            AlertStatus::Resolved,
            AlertStatus::Failed,
            AlertStatus::Expired,
        ];
        for status in all {
            assert_eq!(AlertStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(
            AlertStatus::from_str("ACKNOWLEDGED").unwrap(),
            AlertStatus::Acknowledged
        );
        assert_eq!(
            AlertStatus::from_str("In_Progress").unwrap(),
            AlertStatus::InProgress
        );
    }

    #[test]
    fn unknown_status_is_rejected_not_stored() {
        assert!(AlertStatus::from_str("escalated").is_err());
    }

    #[test]
    fn type_label_titlecases_words() {
        assert_eq!(AlertType::PoacherSuspected.label(), "Poacher Suspected");
        assert_eq!(AlertType::Other.label(), "Other");
    }

    #[test]
    fn enums_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&AlertStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&AlertType::PoacherSuspected).unwrap(),
            "\"poacher_suspected\""
        );
        assert_eq!(
            serde_json::to_string(&AlertSeverity::Critical).unwrap(),
            "\"critical\""
        );
    }
}
