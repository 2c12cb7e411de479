//! # Mailer
//!
//! Outbound transactional email for the platform, built on
//! [lettre](https://lettre.rs)'s async SMTP transport.
//!
//! The [`Mailer`] trait is the seam consumed by feature slices; production
//! code wires in [`SmtpMailer`], tests substitute a stub. Delivery here is a
//! single attempt; callers own any queueing or timeout policy.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cpark_mailer::{Email, Mailer, SmtpMailer};
//!
//! # async fn example() -> Result<(), cpark_mailer::MailerError> {
//! let mailer = SmtpMailer::builder()
//!     .host("smtp.example.com")
//!     .credentials("user", "pass")
//!     .sender("CampusPark <no-reply@campus-park.app>")
//!     .build()?;
//!
//! mailer
//!     .send(Email {
//!         to: "jane@example.com".to_owned(),
//!         subject: "Hello".to_owned(),
//!         html: "<p>Hi!</p>".to_owned(),
//!     })
//!     .await
//! # }
//! ```

mod error;

pub use error::MailerError;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::future::Future;
use tracing::{debug, instrument};

const DEFAULT_SMTP_PORT: u16 = 587;

/// A transactional email ready for delivery.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// The notification-sender seam.
///
/// Implementations deliver a single message once; they do not retry.
pub trait Mailer {
    /// Deliver the email.
    fn send(&self, email: Email) -> impl Future<Output = Result<(), MailerError>> + Send;
}

/// Production [`Mailer`] backed by an async SMTP relay (STARTTLS).
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").field("sender", &self.sender).finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Returns a new [`SmtpMailerBuilder`].
    #[must_use]
    pub fn builder() -> SmtpMailerBuilder {
        SmtpMailerBuilder::default()
    }
}

impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<(), MailerError> {
        let recipient = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailerError::Address { message: format!("{}: {e}", email.to).into() })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)?;

        self.transport.send(message).await?;
        debug!("Email accepted by relay");
        Ok(())
    }
}

/// A fluent builder for configuring the SMTP transport.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct SmtpMailerBuilder {
    host: Option<String>,
    port: Option<u16>,
    credentials: Option<(String, String)>,
    sender: Option<String>,
}

impl SmtpMailerBuilder {
    /// Sets the SMTP relay host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the relay port (defaults to 587/STARTTLS).
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the relay credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the `From` mailbox, e.g. `CampusPark <no-reply@campus-park.app>`.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Consumes the builder and assembles the transport.
    ///
    /// # Errors
    /// Returns [`MailerError::Configuration`] if the host or sender is
    /// missing/unparseable, or [`MailerError::Transport`] if the relay
    /// parameters are rejected.
    pub fn build(self) -> Result<SmtpMailer, MailerError> {
        let host = self
            .host
            .ok_or(MailerError::Configuration { message: "SMTP host is required".into() })?;
        let sender = self
            .sender
            .ok_or(MailerError::Configuration { message: "Sender mailbox is required".into() })?
            .parse::<Mailbox>()
            .map_err(|e| MailerError::Configuration {
                message: format!("Invalid sender mailbox: {e}").into(),
            })?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
            .port(self.port.unwrap_or(DEFAULT_SMTP_PORT));

        if let Some((username, password)) = self.credentials {
            transport = transport.credentials(Credentials::new(username, password));
        }

        Ok(SmtpMailer { transport: transport.build(), sender })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_host_and_sender() {
        let err = SmtpMailer::builder().sender("a@b.c").build().unwrap_err();
        assert!(matches!(err, MailerError::Configuration { .. }));

        let err = SmtpMailer::builder().host("smtp.example.com").build().unwrap_err();
        assert!(matches!(err, MailerError::Configuration { .. }));
    }

    #[test]
    fn build_rejects_malformed_sender() {
        let err = SmtpMailer::builder()
            .host("smtp.example.com")
            .sender("not a mailbox")
            .build()
            .unwrap_err();
        assert!(matches!(err, MailerError::Configuration { .. }));
    }

    #[tokio::test]
    async fn build_accepts_full_configuration() {
        let mailer = SmtpMailer::builder()
            .host("smtp.example.com")
            .port(2525)
            .credentials("user", "pass")
            .sender("CampusPark <no-reply@campus-park.app>")
            .build();
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn send_rejects_malformed_recipient() {
        let mailer = SmtpMailer::builder()
            .host("smtp.example.com")
            .sender("no-reply@campus-park.app")
            .build()
            .unwrap();

        let err = mailer
            .send(Email {
                to: "definitely not an address".to_owned(),
                subject: "s".to_owned(),
                html: "<p>h</p>".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MailerError::Address { .. }));
    }
}
