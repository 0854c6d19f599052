//! Confirmation email delivery
//!
//! Sends the plain-text registration confirmation over an SMTP relay with
//! STARTTLS and LOGIN credentials. Delivery failures are logged and
//! swallowed; the dispatcher never learns about them.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub const CONFIRMATION_SUBJECT: &str = "Course Registration Confirmation";

/// Confirmation sender. No error signal reaches the caller.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(&self, to: &str, courses: &[String]);
}

/// SMTP relay settings plus the fixed sender identity
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

/// Mailer backed by an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, lettre::transport::smtp::Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.relay)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: config.sender.clone(),
        })
    }

    fn body(courses: &[String]) -> String {
        format!(
            "Thank you for registering to the following courses: {}. We look forward to seeing you soon.",
            courses.join(", ")
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(&self, to: &str, courses: &[String]) {
        let from: Mailbox = match self.sender.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(sender = %self.sender, error = %e, "Invalid sender address");
                return;
            }
        };
        let to_addr: Mailbox = match to.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(to, error = %e, "Invalid recipient address");
                return;
            }
        };

        let message = match Message::builder()
            .from(from)
            .to(to_addr)
            .subject(CONFIRMATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(courses))
        {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(to, error = %e, "Failed to build confirmation email");
                return;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => tracing::info!(to, "Confirmation email sent"),
            Err(e) => tracing::error!(to, error = %e, "Failed to send confirmation email"),
        }
    }
}

/// Stand-in used when no mail password is configured
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_confirmation(&self, to: &str, courses: &[String]) {
        tracing::warn!(
            to,
            courses = courses.len(),
            "Mail password not configured; dropping confirmation email"
        );
    }
}
