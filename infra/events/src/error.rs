use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    /// Occurs when an internal dynamic cast fails.
    /// This usually indicates an invariant violation in the type registry.
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: Cow<'static, str> },

    /// Channel exists but with a different kind (broadcast/mpsc).
    #[error("Channel kind mismatch: {message}")]
    ChannelKindMismatch { message: Cow<'static, str> },

    /// A bounded channel is full and cannot accept more messages.
    #[error("Channel full: {message}")]
    ChannelFull { message: Cow<'static, str> },

    /// The single receiver of a queue channel was already handed out.
    #[error("Queue receiver already taken: {message}")]
    ReceiverTaken { message: Cow<'static, str> },

    /// Capacity must be greater than zero for bounded channels.
    #[error("Invalid capacity: {message}")]
    InvalidCapacity { message: Cow<'static, str> },
}
