//! Outgoing email
//!
//! [`Mailer`] is the seam between order handling and the mail transport.
//! [`SmtpMailer`] talks to a real SMTP relay, [`LogMailer`] only logs and is
//! used when no relay is configured.

mod outbox;
mod smtp;

pub use outbox::{spawn_retry_loop, Outbox};
pub use smtp::{SmtpConfig, SmtpMailer};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (connection, authentication, timeout)
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

// =============================================================================
// Messages
// =============================================================================

/// A fully rendered message with a plain-text and an HTML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message, returning its Message-ID
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError>;
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        let message_id = format!("<{}@localhost>", Uuid::new_v4());
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            %message_id,
            "SMTP not configured, email logged instead of sent"
        );
        tracing::debug!("Email body:\n{}", email.text);
        Ok(message_id)
    }
}

// =============================================================================
// Delivery report
// =============================================================================

/// Outcome of sending one notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    /// Sending failed; the message waits in the outbox for another attempt
    Queued { error: String },
    /// Sending stopped before its outcome was known; nothing was queued
    Unconfirmed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub business: DeliveryStatus,
    pub customer: DeliveryStatus,
}

impl DeliveryReport {
    pub fn all_sent(&self) -> bool {
        matches!(self.business, DeliveryStatus::Sent { .. })
            && matches!(self.customer, DeliveryStatus::Sent { .. })
    }

    /// Same outcome for both notifications
    pub fn uniform(status: DeliveryStatus) -> Self {
        Self {
            business: status.clone(),
            customer: status,
        }
    }

    /// One line per notification that did not go out
    pub fn warnings(&self) -> Vec<String> {
        [
            ("Business notification", &self.business),
            ("Confirmation email", &self.customer),
        ]
        .into_iter()
        .filter_map(|(label, status)| match status {
            DeliveryStatus::Sent { .. } => None,
            DeliveryStatus::Queued { error } => Some(format!(
                "{} could not be sent and will be retried: {}",
                label, error
            )),
            DeliveryStatus::Unconfirmed { error } => Some(format!(
                "{} may not have been sent: {}",
                label, error
            )),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_returns_message_id() {
        let email = OutgoingEmail {
            to: "jan@example.com".to_string(),
            reply_to: None,
            subject: "Hello".to_string(),
            text: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        let id = LogMailer.send(&email).await.unwrap();
        assert!(id.starts_with('<') && id.ends_with("@localhost>"));
    }

    #[test]
    fn test_mail_error_display() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");

        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn test_report_warnings() {
        let sent = DeliveryStatus::Sent {
            message_id: "<1@test>".to_string(),
        };
        let report = DeliveryReport {
            business: sent.clone(),
            customer: sent,
        };
        assert!(report.all_sent());
        assert!(report.warnings().is_empty());

        let report = DeliveryReport {
            business: DeliveryStatus::Queued {
                error: "timeout".to_string(),
            },
            customer: DeliveryStatus::Queued {
                error: "timeout".to_string(),
            },
        };
        assert!(!report.all_sent());
        assert_eq!(report.warnings().len(), 2);
        assert!(report.warnings()[0].starts_with("Business notification could not be sent"));

        let report = DeliveryReport::uniform(DeliveryStatus::Unconfirmed {
            error: "delivery was interrupted".to_string(),
        });
        assert!(!report.all_sent());
        assert_eq!(
            report.warnings(),
            vec![
                "Business notification may not have been sent: delivery was interrupted".to_string(),
                "Confirmation email may not have been sent: delivery was interrupted".to_string(),
            ]
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(DeliveryStatus::Sent {
            message_id: "<1@test>".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "sent");
        assert_eq!(json["messageId"], "<1@test>");
    }
}
