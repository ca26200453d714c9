//! SMTP delivery service.
//!
//! The SMTP relay is an external collaborator; everything behind the
//! [`Mailer`] trait stays replaceable in tests.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SmtpConfig;

/// An outgoing message, addressed and ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub message_id: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<SentMail, MailerError>;
}

/// Mailer backed by an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_fallback: Option<String>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let credentials = Credentials::new(config.user.clone(), config.password.clone());

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder.credentials(credentials).port(config.port).build();

        Ok(Self {
            transport,
            from_fallback: config.from_email.clone(),
        })
    }

    /// Probe the relay once at startup. Failures are logged, not fatal; the
    /// first send will surface them again.
    pub async fn verify_connection(&self) {
        match self.transport.test_connection().await {
            Ok(true) => tracing::info!("SMTP connection established"),
            Ok(false) => tracing::warn!("SMTP relay refused the connection probe"),
            Err(e) => tracing::error!("SMTP connection failed: {}", e),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<SentMail, MailerError> {
        let message_id = format!("<{}@retrobus-mail>", Uuid::new_v4());
        let message = build_message(&mail, self.from_fallback.as_deref(), &message_id)?;

        self.transport.send(message).await?;
        tracing::info!("Email sent: {}", message_id);

        Ok(SentMail { message_id })
    }
}

fn build_message(
    mail: &OutgoingMail,
    from_fallback: Option<&str>,
    message_id: &str,
) -> Result<Message, MailerError> {
    let from = if mail.from.is_empty() {
        from_fallback.unwrap_or_default()
    } else {
        mail.from.as_str()
    };

    let mut builder = Message::builder()
        .message_id(Some(message_id.to_string()))
        .from(from.parse::<Mailbox>()?)
        .to(mail.to.parse::<Mailbox>()?)
        .subject(mail.subject.as_str());

    if let Some(cc) = &mail.cc {
        builder = builder.cc(cc.parse::<Mailbox>()?);
    }
    if let Some(bcc) = &mail.bcc {
        builder = builder.bcc(bcc.parse::<Mailbox>()?);
    }

    let message = builder
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())?;

    Ok(message)
}
