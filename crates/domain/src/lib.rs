//! Domain layer for the keyword notification system.
//!
//! This crate provides:
//! - The `Channel` aggregate owning subscriptions and a pending event queue
//! - The command and event types the bus dispatches
//! - Word-boundary mention matching over posted messages

pub mod channel;
pub mod error;

pub use channel::{
    AlreadySubscribed, Channel, ChannelMessage, ListSubscribers, ListSubscriptions, Mentioned,
    PostMessage, Subscribe, Subscribed, Subscription, UnknownSubscription, Unsubscribe,
    Unsubscribed,
};
pub use error::DomainError;
