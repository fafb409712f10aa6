//! SMTP delivery via `lettre`

use super::{MailError, Mailer, OutgoingEmail};
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS from the first byte; otherwise STARTTLS is required
    pub implicit_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// RFC 5322 "From" address
    pub from_address: String,
    /// Display name shown next to the From address
    pub from_name: Option<String>,
    pub timeout: Duration,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Right-hand side of generated Message-IDs
    domain: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };
        let mut builder = builder.port(config.port).timeout(Some(config.timeout));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let address: lettre::Address = config.from_address.parse()?;
        let domain = address.domain().to_string();
        let from = Mailbox::new(config.from_name.clone(), address);

        tracing::info!(
            host = %config.host,
            port = config.port,
            implicit_tls = config.implicit_tls,
            "SMTP transport configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
            domain,
        })
    }

    fn build_message(&self, email: &OutgoingEmail, message_id: &str) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .message_id(Some(message_id.to_string()));

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.domain);
        let message = self.build_message(email, &message_id)?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, %message_id, "Email sent");
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 465,
            implicit_tls: true,
            username: Some("info@kozijncomfort.nl".to_string()),
            password: Some("secret".to_string()),
            from_address: "info@kozijncomfort.nl".to_string(),
            from_name: Some("Kozijn Comfort".to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "jan@example.com".to_string(),
            reply_to: Some("orders@kozijncomfort.nl".to_string()),
            subject: "Confirmation".to_string(),
            text: "Dear Jan,".to_string(),
            html: "<p>Dear Jan,</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_message_has_both_bodies_and_headers() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer.build_message(&email(), "<abc@kozijncomfort.nl>").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Message-ID: <abc@kozijncomfort.nl>"));
        assert!(raw.contains("Reply-To: orders@kozijncomfort.nl"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_an_address_error() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let mut bad = email();
        bad.to = "not-an-email".to_string();
        assert!(matches!(
            mailer.build_message(&bad, "<x@y>"),
            Err(MailError::Address(_))
        ));
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let mut cfg = config();
        cfg.from_address = "nope".to_string();
        assert!(matches!(SmtpMailer::new(&cfg), Err(MailError::Address(_))));
    }
}
