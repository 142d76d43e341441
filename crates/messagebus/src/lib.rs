//! Command and event dispatch for the keyword notification service.
//!
//! The bus routes each command to its single handler and fans the domain
//! events queued by committed transactions out to notification handlers,
//! draining a FIFO worklist until no messages remain.

pub mod bootstrap;
pub mod bus;
pub mod context;
pub mod error;
pub mod handlers;
pub mod notifications;
pub mod registry;

pub use bootstrap::{bootstrap, default_registry};
pub use bus::MessageBus;
pub use context::{Context, Scope};
pub use error::{BusError, HandlerError, NotificationError};
pub use notifications::{InMemoryNotifier, Notifier, SentMessage, TracingNotifier};
pub use registry::HandlerRegistry;
