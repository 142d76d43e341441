//! Channel aggregate implementation.

use std::collections::{BTreeSet, HashSet};

use common::{ChannelName, Event, Keyword, User};

use super::events::{AlreadySubscribed, Mentioned, Subscribed, UnknownSubscription, Unsubscribed};
use super::{ChannelMessage, Subscription};

/// Channel aggregate root.
///
/// The transactional consistency boundary: a named channel owning its set of
/// keyword subscriptions and a queue of pending events. State changes append
/// to the queue; the transaction scope harvests it at commit and nothing else
/// ever drains it.
#[derive(Debug)]
pub struct Channel {
    /// Identity of the aggregate.
    channel_name: ChannelName,

    /// Live subscriptions, unique by (channel, subscriber, keyword).
    subscriptions: HashSet<Subscription>,

    /// Events queued since the aggregate was loaded.
    events: Vec<Box<dyn Event>>,
}

impl Channel {
    /// Creates an empty channel.
    pub fn new(channel_name: impl Into<ChannelName>) -> Self {
        Self {
            channel_name: channel_name.into(),
            subscriptions: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// Rebuilds a channel from its persisted subscriptions.
    pub fn with_subscriptions(
        channel_name: impl Into<ChannelName>,
        subscriptions: impl IntoIterator<Item = Subscription>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            subscriptions: subscriptions.into_iter().collect(),
            events: Vec::new(),
        }
    }
}

// Query methods
impl Channel {
    /// Returns the channel's identity.
    pub fn channel_name(&self) -> &ChannelName {
        &self.channel_name
    }

    /// Returns all live subscriptions.
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }

    /// Returns the number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns the keywords one subscriber watches in this channel.
    pub fn keywords_for(&self, subscriber: &User) -> BTreeSet<Keyword> {
        self.subscriptions
            .iter()
            .filter(|subscription| &subscription.subscriber == subscriber)
            .map(|subscription| subscription.keyword.clone())
            .collect()
    }

    /// Yields the subscribers whose keyword occurs in the message as a
    /// whole word, skipping the author.
    ///
    /// Lazy; a subscriber with several matching keywords is yielded once
    /// per matching subscription.
    pub fn find_subscribed<'a>(
        &'a self,
        message: &'a ChannelMessage,
    ) -> impl Iterator<Item = &'a User> {
        self.subscriptions
            .iter()
            .filter(move |subscription| subscription.subscriber != message.author)
            .filter(move |subscription| message.contains(&subscription.keyword))
            .map(|subscription| &subscription.subscriber)
    }

    /// Returns the events queued since the aggregate was loaded.
    pub fn events(&self) -> &[Box<dyn Event>] {
        &self.events
    }
}

// Command methods (queue events)
impl Channel {
    /// Adds a subscription.
    ///
    /// A duplicate leaves the set untouched and queues `AlreadySubscribed`;
    /// a fresh subscription is inserted and queues `Subscribed`.
    pub fn subscribe(&mut self, subscription: Subscription) {
        if self.subscriptions.contains(&subscription) {
            self.events
                .push(Box::new(AlreadySubscribed::from(subscription)));
            return;
        }
        let event = Subscribed::from(subscription.clone());
        self.subscriptions.insert(subscription);
        self.events.push(Box::new(event));
    }

    /// Removes a subscription.
    ///
    /// A missing subscription queues `UnknownSubscription`; a live one is
    /// removed and queues `Unsubscribed`.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        if self.subscriptions.remove(&subscription) {
            self.events.push(Box::new(Unsubscribed::from(subscription)));
        } else {
            self.events
                .push(Box::new(UnknownSubscription::from(subscription)));
        }
    }

    /// Queues one `Mentioned` event per subscription the message matches.
    pub fn record_mentions(&mut self, message: &ChannelMessage) {
        for subscription in &self.subscriptions {
            if subscription.subscriber == message.author {
                continue;
            }
            if message.contains(&subscription.keyword) {
                self.events.push(Box::new(Mentioned {
                    channel_name: subscription.channel_name.clone(),
                    subscriber: subscription.subscriber.clone(),
                    keyword: subscription.keyword.clone(),
                    author: message.author.clone(),
                    text: message.text.clone(),
                }));
            }
        }
    }

    /// Removes and returns every queued event, oldest first.
    pub fn take_events(&mut self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut self.events)
    }
}
