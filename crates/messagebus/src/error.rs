//! Message bus error types.

use domain::DomainError;
use storage::StorageError;
use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification sink failed to deliver the text.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Errors a command or event handler can produce.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Notification error.
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

/// Errors surfaced by the message bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// No handler is registered for the command type.
    #[error("No handler registered for command '{0}'")]
    HandlerNotFound(&'static str),

    /// The message type is registered neither as a command nor as an event.
    #[error("Unhandled message type '{0}'")]
    UnhandledMessageType(&'static str),

    /// A registered handler's message or output type disagreed with the
    /// dispatched message.
    #[error("Type mismatch dispatching '{0}'")]
    TypeMismatch(&'static str),

    /// Handler error.
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}
