use std::borrow::Cow;

/// A specialized [`AccountsError`] enum of this crate.
///
/// The first three variants are detected before any mutation and carry
/// caller-facing messages; `Infrastructure` detail never reaches the wire.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    /// Missing or malformed registration input.
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    /// The admin secret code did not match the configured value.
    #[error("{message}")]
    Authorization { message: Cow<'static, str> },

    /// The normalized email is already registered.
    #[error("{message}")]
    Conflict { message: Cow<'static, str> },

    /// Store or dependency failure; logged server-side, reported generically.
    #[error("Registration infrastructure failure: {message}")]
    Infrastructure { message: Cow<'static, str> },
}

impl AccountsError {
    pub(crate) fn infrastructure(err: impl std::fmt::Display) -> Self {
        Self::Infrastructure { message: err.to_string().into() }
    }
}
