//! Channel domain events.
//!
//! Each event is its own struct so the bus can key its handler table on the
//! concrete type. Events carry everything their handlers need; handlers never
//! reach back into the aggregate.

use std::any::Any;

use common::{ChannelName, Event, Keyword, Message, MessageKind, Text, User};
use serde::{Deserialize, Serialize};

use super::Subscription;

/// A subscription was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscribed {
    /// Channel the subscription lives in.
    pub channel_name: ChannelName,

    /// Who subscribed.
    pub subscriber: User,

    /// The watched keyword.
    pub keyword: Keyword,
}

impl From<Subscription> for Subscribed {
    fn from(subscription: Subscription) -> Self {
        Self {
            channel_name: subscription.channel_name,
            subscriber: subscription.subscriber,
            keyword: subscription.keyword,
        }
    }
}

impl Message for Subscribed {
    fn name(&self) -> &'static str {
        "Subscribed"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Event for Subscribed {}

/// A subscribe was attempted for an existing subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlreadySubscribed {
    /// Channel the subscription lives in.
    pub channel_name: ChannelName,

    /// Who tried to subscribe again.
    pub subscriber: User,

    /// The watched keyword.
    pub keyword: Keyword,
}

impl From<Subscription> for AlreadySubscribed {
    fn from(subscription: Subscription) -> Self {
        Self {
            channel_name: subscription.channel_name,
            subscriber: subscription.subscriber,
            keyword: subscription.keyword,
        }
    }
}

impl Message for AlreadySubscribed {
    fn name(&self) -> &'static str {
        "AlreadySubscribed"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Event for AlreadySubscribed {}

/// A subscription was removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unsubscribed {
    /// Channel the subscription lived in.
    pub channel_name: ChannelName,

    /// Who unsubscribed.
    pub subscriber: User,

    /// The keyword no longer watched.
    pub keyword: Keyword,
}

impl From<Subscription> for Unsubscribed {
    fn from(subscription: Subscription) -> Self {
        Self {
            channel_name: subscription.channel_name,
            subscriber: subscription.subscriber,
            keyword: subscription.keyword,
        }
    }
}

impl Message for Unsubscribed {
    fn name(&self) -> &'static str {
        "Unsubscribed"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Event for Unsubscribed {}

/// An unsubscribe was attempted for a subscription that does not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownSubscription {
    /// Channel the attempt targeted.
    pub channel_name: ChannelName,

    /// Who tried to unsubscribe.
    pub subscriber: User,

    /// The keyword that was not subscribed.
    pub keyword: Keyword,
}

impl From<Subscription> for UnknownSubscription {
    fn from(subscription: Subscription) -> Self {
        Self {
            channel_name: subscription.channel_name,
            subscriber: subscription.subscriber,
            keyword: subscription.keyword,
        }
    }
}

impl Message for UnknownSubscription {
    fn name(&self) -> &'static str {
        "UnknownSubscription"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Event for UnknownSubscription {}

/// A posted message matched a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentioned {
    /// Channel the message was posted in.
    pub channel_name: ChannelName,

    /// The subscriber whose keyword matched.
    pub subscriber: User,

    /// The keyword that matched.
    pub keyword: Keyword,

    /// Who posted the message.
    pub author: User,

    /// The message body.
    pub text: Text,
}

impl Message for Mentioned {
    fn name(&self) -> &'static str {
        "Mentioned"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Event for Mentioned {}
