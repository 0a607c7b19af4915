/// Outbound mail capability
///
/// The password-reset flow needs to send exactly one kind of message: a
/// link containing a reset token. Delivery is an external collaborator
/// behind the [`Mailer`] trait so the rest of the application never
/// depends on a transport. Two implementations exist:
///
/// - [`SmtpMailer`]: real delivery via lettre's async SMTP transport
/// - [`LogMailer`]: logs the message instead of sending it; the default
///   when no SMTP host is configured, and what tests inject
///
/// Callers dispatch mail off the response path (`tokio::spawn`) and
/// treat delivery failure as non-fatal.

use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport, Message,
    Tokio1Executor,
};
use tracing::{debug, info};

/// Error type for mail dispatch
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Recipient or sender address failed to parse
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be assembled
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP transport failure
    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A capability for sending one email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// SMTP transport settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address for all outbound mail
    pub from: String,
}

/// Delivers mail over SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Builds an SMTP mailer from transport settings
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host cannot be resolved into a
    /// transport configuration.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Logs outbound mail instead of delivering it
///
/// Stands in for a transport in development and in tests.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!(to, subject, "mail transport not configured, logging instead");
        debug!(body, "mail body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let mailer = LogMailer;
        mailer
            .send("a@x.com", "Password reset", "link goes here")
            .await
            .expect("log mailer should always succeed");
    }

    #[test]
    fn test_smtp_mailer_builds_without_credentials() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            use_tls: false,
            username: None,
            password: None,
            from: "noreply@example.com".to_string(),
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }
}
