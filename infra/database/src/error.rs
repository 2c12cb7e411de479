use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Validation errors.
    #[error("Validation error: {message}")]
    Validation { message: Cow<'static, str> },

    /// Occurs when connectivity or health checks fail.
    #[error("Database connection failed: {message}")]
    Connection { message: Cow<'static, str> },

    /// Occurs when authentication fails.
    #[error("Authentication failed: {message}")]
    Auth { message: Cow<'static, str> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// Migration failures or invariant violations.
    #[error("Migration error: {message}")]
    Migration { message: Cow<'static, str> },
}

/// Returns `true` when the engine error reports a unique-index violation.
///
/// The store's UNIQUE index is the authoritative duplicate signal: callers
/// racing past the friendly pre-check classify the insert failure with this
/// and report a conflict instead of an internal error.
#[must_use]
pub fn is_index_conflict(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already contains")
}
