use crate::db::models::{Alert, AlertSeverity, AlertStatus, AlertType};
use crate::db::repositories::{AlertsRepository, DetectionsRepository};
use crate::error::Error;
use crate::services::notifications::NotificationService;
use anyhow::Result;
use chrono::Utc;
use log::info;
use serde::Deserialize;
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Alert location payload
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "zoneLabel")]
    pub zone_label: String,
}

/// Trigger request body. Enum membership of `type` and `severity` is
/// enforced by deserialization.
#[derive(Debug, Deserialize)]
pub struct TriggerAlertRequest {
    pub detection_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub source: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub location: Location,
    #[serde(rename = "createdBy")]
    pub created_by: String,
}

/// Alert lifecycle service: builds alert records, persists them, dispatches
/// notifications and reconciles status with the dispatch outcome.
pub struct AlertService {
    pool: Arc<PgPool>,
    alerts: AlertsRepository,
    detections: DetectionsRepository,
    notifier: Arc<NotificationService>,
}

impl AlertService {
    pub fn new(pool: Arc<PgPool>, notifier: Arc<NotificationService>) -> Self {
        Self {
            alerts: AlertsRepository::new(Arc::clone(&pool)),
            detections: DetectionsRepository::new(Arc::clone(&pool)),
            pool,
            notifier,
        }
    }

    /// Trigger a new alert.
    ///
    /// The insert and the post-dispatch status update share one transaction,
    /// bounded by the dispatcher's timeout, so the committed alert always
    /// reflects the notification outcome. Dispatch failure does not fail the
    /// operation; it is reported through the alert's status.
    pub async fn trigger(&self, request: TriggerAlertRequest) -> Result<Alert> {
        if !self.detections.exists(&request.detection_id).await? {
            return Err(Error::NotFound(format!(
                "Detection {} not found",
                request.detection_id
            ))
            .into());
        }

        let now = Utc::now();
        let message = render_message(
            request.severity,
            request.alert_type,
            request.location.lat,
            request.location.lng,
            &request.location.zone_label,
            request.notes.as_deref(),
        );

        let alert = Alert {
            id: Uuid::new_v4(),
            detection_id: request.detection_id,
            status: AlertStatus::Created,
            alert_type: request.alert_type,
            severity: request.severity,
            source: request.source,
            notes: request.notes,
            lat: Some(request.location.lat),
            lng: Some(request.location.lng),
            zone_label: Some(request.location.zone_label),
            created_by: Some(request.created_by.clone()),
            notification_sent: false,
            notification_timestamp: None,
            message: Some(message.clone()),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        let alert = self.alerts.create(&mut tx, &alert).await?;

        let sent = self
            .notifier
            .send_alert(&alert, Some(&request.created_by), Some(&message))
            .await;

        let status = if sent {
            AlertStatus::Sent
        } else {
            AlertStatus::Failed
        };
        let notified_at = if sent { Some(Utc::now()) } else { None };

        let alert = self
            .alerts
            .finalize_dispatch(&mut tx, alert.id, status, sent, notified_at)
            .await?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit alert: {}", e)))?;

        info!(
            "Alert {} triggered for detection {} (status: {})",
            alert.id, alert.detection_id, alert.status
        );

        Ok(alert)
    }

    /// List alerts newest-first with the total matching count.
    ///
    /// A status filter that names no known status matches nothing and yields
    /// an empty page rather than an error.
    pub async fn list(
        &self,
        limit: i64,
        skip: i64,
        status_filter: Option<&str>,
    ) -> Result<(Vec<Alert>, i64)> {
        if !(1..=100).contains(&limit) {
            return Err(Error::Validation("limit must be between 1 and 100".to_string()).into());
        }
        if skip < 0 {
            return Err(Error::Validation("skip must not be negative".to_string()).into());
        }

        let status = match status_filter {
            Some(raw) => match AlertStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(_) => return Ok((Vec::new(), 0)),
            },
            None => None,
        };

        let total = self.alerts.count(status).await?;
        let items = self.alerts.list(limit, skip, status).await?;

        Ok((items, total))
    }

    /// Update an alert's status by its canonical ID. Status assignment is
    /// idempotent; only `updated_at` moves on repeat calls.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Alert> {
        let status = AlertStatus::from_str(status)?;

        let alert = self
            .alerts
            .update_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Alert with ID {} not found", id)))?;

        info!("Alert {} status set to {}", alert.id, alert.status);

        Ok(alert)
    }

    /// Fetch a single alert by its canonical ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Alert>> {
        self.alerts.get_by_id(id).await
    }
}

/// Render the operator-facing message for a triggered alert:
/// `[{SEVERITY}] {Type} at ({lat}, {lng}) - {zone}`, with the notes
/// appended as `" | {notes}"` when present.
pub fn render_message(
    severity: AlertSeverity,
    alert_type: AlertType,
    lat: f64,
    lng: f64,
    zone_label: &str,
    notes: Option<&str>,
) -> String {
    let mut message = format!(
        "[{}] {} at ({}, {}) - {}",
        severity.as_str().to_uppercase(),
        alert_type.label(),
        lat,
        lng,
        zone_label
    );
    if let Some(notes) = notes {
        message.push_str(" | ");
        message.push_str(notes);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_follows_the_template() {
        let message = render_message(
            AlertSeverity::Critical,
            AlertType::PoacherSuspected,
            -23.8859,
            31.5205,
            "North Sector",
            None,
        );
        assert_eq!(
            message,
            "[CRITICAL] Poacher Suspected at (-23.8859, 31.5205) - North Sector"
        );
    }

    #[test]
    fn notes_are_appended_with_a_separator() {
        let message = render_message(
            AlertSeverity::High,
            AlertType::VehicleSuspected,
            -1.5,
            2.25,
            "East Gate",
            Some("2 individuals on foot"),
        );
        assert_eq!(
            message,
            "[HIGH] Vehicle Suspected at (-1.5, 2.25) - East Gate | 2 individuals on foot"
        );
    }

    #[test]
    fn trigger_request_parses_the_documented_body() {
        let request: TriggerAlertRequest = serde_json::from_value(serde_json::json!({
            "detection_id": "det_123",
            "type": "poacher_suspected",
            "severity": "critical",
            "source": "camera_trap",
            "notes": "2 individuals on foot",
            "location": {"lat": -23.8859, "lng": 31.5205, "zoneLabel": "North Sector"},
            "createdBy": "Operator 1"
        }))
        .unwrap();

        assert_eq!(request.detection_id, "det_123");
        assert_eq!(request.alert_type, AlertType::PoacherSuspected);
        assert_eq!(request.severity, AlertSeverity::Critical);
        assert_eq!(request.location.zone_label, "North Sector");
        assert_eq!(request.created_by, "Operator 1");
    }

    #[test]
    fn trigger_request_rejects_unknown_enum_members() {
        let result = serde_json::from_value::<TriggerAlertRequest>(serde_json::json!({
            "detection_id": "det_123",
            "type": "asteroid_strike",
            "severity": "critical",
            "source": "camera_trap",
            "location": {"lat": 0.0, "lng": 0.0, "zoneLabel": "Zone"},
            "createdBy": "Operator 1"
        }));
        assert!(result.is_err());
    }
}
