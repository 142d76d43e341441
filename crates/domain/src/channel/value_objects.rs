//! Value objects for the channel domain.

use common::{ChannelName, Keyword, Text, User};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A user's interest in one keyword within one channel.
///
/// Equality and hashing are by value; a channel's subscription set can
/// therefore never hold two entries for the same (channel, subscriber,
/// keyword) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    /// Channel the subscription lives in.
    pub channel_name: ChannelName,

    /// The subscribed user.
    pub subscriber: User,

    /// The watched keyword.
    pub keyword: Keyword,
}

impl Subscription {
    /// Creates a new subscription.
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

/// One posted utterance, used as input to mention matching.
///
/// Never persisted; it exists only for the duration of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Channel the message was posted in.
    pub channel_name: ChannelName,

    /// Who posted it.
    pub author: User,

    /// The message body.
    pub text: Text,
}

impl ChannelMessage {
    /// Creates a new channel message.
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

    /// Returns true if the keyword occurs in the text as a whole word.
    ///
    /// Matching is case sensitive. The keyword is treated as literal text,
    /// bounded on both sides by a word boundary.
    pub fn contains(&self, keyword: &Keyword) -> bool {
        let pattern = format!(r"\b{}\b", regex::escape(keyword.as_str()));
        Regex::new(&pattern).is_ok_and(|re| re.is_match(self.text.as_str()))
    }
}
