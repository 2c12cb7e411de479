use std::borrow::Cow;

/// Errors raised while configuring or using the SMTP transport.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Invalid transport configuration (relay host, sender mailbox).
    #[error("Mailer configuration error: {message}")]
    Configuration { message: Cow<'static, str> },

    /// The recipient address could not be parsed.
    #[error("Invalid recipient address: {message}")]
    Address { message: Cow<'static, str> },

    /// The message itself could not be assembled.
    #[error("Message build error: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP transport rejected or failed the delivery.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
