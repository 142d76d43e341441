//! Channel commands.

use std::any::Any;
use std::collections::BTreeSet;

use common::{ChannelName, Command, Keyword, Message, MessageKind, Text, User};

/// Command to watch a keyword in a channel.
#[derive(Debug, Clone)]
pub struct Subscribe {
    /// Channel to watch.
    pub channel_name: ChannelName,

    /// Who wants to be notified.
    pub subscriber: User,

    /// The keyword to watch for.
    pub keyword: Keyword,
}

impl Subscribe {
    /// Creates a new Subscribe command.
    pub fn new(
        channel_name: impl Into<ChannelName>,
        subscriber: impl Into<User>,
        keyword: impl Into<Keyword>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            subscriber: subscriber.into(),
            keyword: keyword.into(),
        }
    }
}

impl Message for Subscribe {
    fn name(&self) -> &'static str {
        "Subscribe"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Command
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Command for Subscribe {
    type Output = ();
}

/// Command to stop watching a keyword in a channel.
#[derive(Debug, Clone)]
pub struct Unsubscribe {
    /// Channel the subscription lives in.
    pub channel_name: ChannelName,

    /// Who no longer wants to be notified.
    pub subscriber: User,

    /// The keyword to stop watching.
    pub keyword: Keyword,
}

impl Unsubscribe {
    /// Creates a new Unsubscribe command.
    pub fn new(
        channel_name: impl Into<ChannelName>,
        subscriber: impl Into<User>,
        keyword: impl Into<Keyword>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            subscriber: subscriber.into(),
            keyword: keyword.into(),
        }
    }
}

impl Message for Unsubscribe {
    fn name(&self) -> &'static str {
        "Unsubscribe"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Command
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Command for Unsubscribe {
    type Output = ();
}

/// Command to list the keywords a user watches in a channel.
#[derive(Debug, Clone)]
pub struct ListSubscriptions {
    /// Channel to inspect.
    pub channel_name: ChannelName,

    /// Whose subscriptions to list.
    pub subscriber: User,
}

impl ListSubscriptions {
    /// Creates a new ListSubscriptions command.
    pub fn new(channel_name: impl Into<ChannelName>, subscriber: impl Into<User>) -> Self {
        Self {
            channel_name: channel_name.into(),
            subscriber: subscriber.into(),
        }
    }
}

impl Message for ListSubscriptions {
    fn name(&self) -> &'static str {
        "ListSubscriptions"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Command
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Command for ListSubscriptions {
    type Output = BTreeSet<Keyword>;
}

/// Command to compute who would be notified by a message.
#[derive(Debug, Clone)]
pub struct ListSubscribers {
    /// Channel the message would be posted in.
    pub channel_name: ChannelName,

    /// The would-be author, excluded from the result.
    pub author: User,

    /// The message body to match against.
    pub text: Text,
}

impl ListSubscribers {
    /// Creates a new ListSubscribers command.
    pub fn new(
        channel_name: impl Into<ChannelName>,
        author: impl Into<User>,
        text: impl Into<Text>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            author: author.into(),
            text: text.into(),
        }
    }
}

impl Message for ListSubscribers {
    fn name(&self) -> &'static str {
        "ListSubscribers"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Command
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Command for ListSubscribers {
    type Output = BTreeSet<User>;
}

/// Command to ingest a posted message and notify mentioned subscribers.
#[derive(Debug, Clone)]
pub struct PostMessage {
    /// Channel the message was posted in.
    pub channel_name: ChannelName,

    /// Who posted it.
    pub author: User,

    /// The message body.
    pub text: Text,
}

impl PostMessage {
    /// Creates a new PostMessage command.
    pub fn new(
        channel_name: impl Into<ChannelName>,
        author: impl Into<User>,
        text: impl Into<Text>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            author: author.into(),
            text: text.into(),
        }
    }
}

impl Message for PostMessage {
    fn name(&self) -> &'static str {
        "PostMessage"
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Command
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl Command for PostMessage {
    type Output = ();
}
