use crate::config::NotificationConfig;
use crate::db::models::Alert;
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Delivery seam for alert notifications. Implementations may talk to an
/// SMS gateway, an SMTP server, or anything else out-of-band.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, recipient: &str, message: &str) -> Result<()>;
}

/// Default channel: logs the notification and reports success.
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        info!("[notification] recipient={} msg={}", recipient, message);
        Ok(())
    }
}

/// SMS channel. The gateway call itself is an extension point; until it is
/// wired up the channel logs the payload it would submit.
pub struct SmsChannel {
    api_key: String,
}

impl SmsChannel {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!("SMS channel has no API key configured");
        }
        if !looks_like_phone(recipient) {
            anyhow::bail!("Recipient {} is not a phone number", recipient);
        }

        // TODO: submit to the SMS gateway once an account is provisioned
        info!("[sms] to={} msg={}", recipient, message);
        Ok(())
    }
}

/// Email channel. Renders the mail; TLS SMTP delivery is an extension point,
/// until then the rendered message is logged.
pub struct EmailChannel {
    smtp_host: String,
    smtp_port: u16,
    from: String,
}

impl EmailChannel {
    pub fn new(smtp_host: String, smtp_port: u16, from: String) -> Self {
        Self {
            smtp_host,
            smtp_port,
            from,
        }
    }

    fn render(&self, recipient: &str, message: &str) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: TrailGuard Alert\r\n\r\n{}",
            self.from, recipient, message
        )
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        if !looks_like_email(recipient) {
            anyhow::bail!("Recipient {} is not an email address", recipient);
        }

        // TODO: deliver via STARTTLS SMTP against smtp_host:smtp_port
        info!(
            "[email] via {}:{} mail={:?}",
            self.smtp_host,
            self.smtp_port,
            self.render(recipient, message)
        );
        Ok(())
    }
}

fn looks_like_phone(recipient: &str) -> bool {
    let digits = recipient.replace(['+', '-', ' '], "");
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn looks_like_email(recipient: &str) -> bool {
    match recipient.split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Notification dispatcher. Constructed once at startup and injected into
/// the alert lifecycle service.
pub struct NotificationService {
    channel: Arc<dyn NotificationChannel>,
    default_recipient: String,
    dispatch_timeout: Duration,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("default_recipient", &self.default_recipient)
            .field("dispatch_timeout", &self.dispatch_timeout)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(channel: Arc<dyn NotificationChannel>, config: &NotificationConfig) -> Self {
        Self {
            channel,
            default_recipient: config.default_recipient.clone(),
            dispatch_timeout: Duration::from_secs(config.dispatch_timeout_secs),
        }
    }

    /// Build the dispatcher with the channel named in the configuration.
    ///
    /// An unknown channel name is a startup error rather than a silent
    /// fallback, so a typo in the config cannot leave alerts unrouted.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, Error> {
        let channel: Arc<dyn NotificationChannel> = match config.channel.as_str() {
            "sms" if !config.sms_api_key.is_empty() => {
                Arc::new(SmsChannel::new(config.sms_api_key.clone()))
            }
            "sms" => {
                warn!("SMS channel requested without an API key; using log channel");
                Arc::new(LogChannel)
            }
            "email" => Arc::new(EmailChannel::new(
                config.smtp_host.clone(),
                config.smtp_port,
                config.email_from.clone(),
            )),
            "log" => Arc::new(LogChannel),
            other => {
                return Err(Error::Notification(format!(
                    "Unknown notification channel: {}",
                    other
                )))
            }
        };

        Ok(Self::new(channel, config))
    }

    /// Dispatch a notification for an alert.
    ///
    /// Never returns an error: every internal failure, including a dispatch
    /// attempt that outlives the configured timeout, is logged and reported
    /// as `false`.
    pub async fn send_alert(
        &self,
        alert: &Alert,
        recipient: Option<&str>,
        message: Option<&str>,
    ) -> bool {
        let recipient = match recipient.filter(|r| !r.is_empty()) {
            Some(r) => r,
            None => self.default_recipient.as_str(),
        };
        let fallback;
        let message = match message.filter(|m| !m.is_empty()) {
            Some(m) => m,
            None => {
                fallback = format!("Alert {} triggered.", alert.id);
                fallback.as_str()
            }
        };

        match timeout(self.dispatch_timeout, self.channel.send(recipient, message)).await {
            Ok(Ok(())) => {
                info!(
                    "Notification for alert {} sent via {} channel",
                    alert.id,
                    self.channel.name()
                );
                true
            }
            Ok(Err(e)) => {
                error!("Failed to send notification for alert {}: {}", alert.id, e);
                false
            }
            Err(_) => {
                error!(
                    "Notification for alert {} timed out after {:?}",
                    alert.id, self.dispatch_timeout
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AlertSeverity, AlertStatus, AlertType};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_alert() -> Alert {
        let now = Utc::now();
        Alert {
            id: Uuid::new_v4(),
            detection_id: "det_test".to_string(),
            status: AlertStatus::Created,
            alert_type: AlertType::RhinoSighting,
            severity: AlertSeverity::Low,
            source: "camera_trap".to_string(),
            notes: None,
            lat: Some(-23.88),
            lng: Some(31.52),
            zone_label: Some("North Sector".to_string()),
            created_by: Some("Operator 1".to_string()),
            notification_sent: false,
            notification_timestamp: None,
            message: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(channel: Arc<dyn NotificationChannel>, timeout_secs: u64) -> NotificationService {
        let config = NotificationConfig {
            dispatch_timeout_secs: timeout_secs,
            ..NotificationConfig::default()
        };
        NotificationService::new(channel, &config)
    }

    struct FailingChannel;

    #[async_trait]
    impl NotificationChannel for FailingChannel {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn send(&self, _recipient: &str, _message: &str) -> Result<()> {
            anyhow::bail!("gateway unreachable")
        }
    }

    struct StallingChannel;

    #[async_trait]
    impl NotificationChannel for StallingChannel {
        fn name(&self) -> &'static str {
            "stalling"
        }

        async fn send(&self, _recipient: &str, _message: &str) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn log_channel_reports_success() {
        let service = service(Arc::new(LogChannel), 5);
        let sent = service.send_alert(&sample_alert(), Some("Operator 1"), Some("msg")).await;
        assert!(sent);
    }

    #[tokio::test]
    async fn channel_failure_becomes_false_not_error() {
        let service = service(Arc::new(FailingChannel), 5);
        let sent = service.send_alert(&sample_alert(), None, None).await;
        assert!(!sent);
    }

    #[tokio::test]
    async fn dispatch_timeout_counts_as_failure() {
        let service = service(Arc::new(StallingChannel), 1);
        let sent = service.send_alert(&sample_alert(), None, None).await;
        assert!(!sent);
    }

    #[tokio::test]
    async fn sms_channel_rejects_non_phone_recipients() {
        let channel = SmsChannel::new("key-123".to_string());
        assert!(channel.send("+2771-234-5678", "msg").await.is_ok());
        assert!(channel.send("ranger@example.org", "msg").await.is_err());
    }

    #[tokio::test]
    async fn email_channel_rejects_non_email_recipients() {
        let channel = EmailChannel::new("localhost".to_string(), 587, "from@example.org".to_string());
        assert!(channel.send("ranger@example.org", "msg").await.is_ok());
        assert!(channel.send("+27712345678", "msg").await.is_err());
    }

    #[test]
    fn unknown_channel_name_is_rejected_at_construction() {
        let config = NotificationConfig {
            channel: "pigeon".to_string(),
            ..NotificationConfig::default()
        };
        let err = NotificationService::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Notification(_)));
    }

    #[tokio::test]
    async fn sms_without_api_key_falls_back_to_log_channel() {
        let config = NotificationConfig {
            channel: "sms".to_string(),
            sms_api_key: String::new(),
            ..NotificationConfig::default()
        };
        let service = NotificationService::from_config(&config).unwrap();
        let sent = service.send_alert(&sample_alert(), None, None).await;
        assert!(sent);
    }

    #[test]
    fn recipient_shape_helpers() {
        assert!(looks_like_phone("+1234567890"));
        assert!(!looks_like_phone("ranger@example.org"));
        assert!(looks_like_email("ranger@example.org"));
        assert!(!looks_like_email("not-an-address"));
        assert!(!looks_like_email("user@nodot"));
    }
}
