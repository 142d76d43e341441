//! Channel aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod value_objects;

pub use aggregate::Channel;
pub use commands::*;
pub use events::{AlreadySubscribed, Mentioned, Subscribed, UnknownSubscription, Unsubscribed};
pub use value_objects::{ChannelMessage, Subscription};
