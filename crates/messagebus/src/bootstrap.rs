//! Default wiring of commands and events to their handlers.

use std::sync::Arc;

use storage::UnitOfWork;

use crate::bus::MessageBus;
use crate::handlers;
use crate::notifications::Notifier;
use crate::registry::HandlerRegistry;

/// Builds the registry with every command and event wired to its handlers.
pub fn default_registry<U, N>() -> HandlerRegistry<U, N>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut registry = HandlerRegistry::new();
    registry
        .command(handlers::subscribe)
        .command(handlers::unsubscribe)
        .command(handlers::list_subscriptions)
        .command(handlers::list_subscribers)
        .command(handlers::post_message);
    registry
        .event(handlers::send_subscribed_notification)
        .event(handlers::send_already_subscribed_notification)
        .event(handlers::send_unsubscribed_notification)
        .event(handlers::send_unknown_subscription_notification)
        .event(handlers::send_mention_notification);
    registry
}

/// Builds a ready-to-use bus over the given unit of work and notifier.
pub fn bootstrap<U, N>(uow: U, notifications: N) -> MessageBus<U, N>
where
    U: UnitOfWork,
    N: Notifier,
{
    MessageBus::new(default_registry(), Arc::new(uow), Arc::new(notifications))
}
