//! Notification sink trait and implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ChannelName;

use crate::error::NotificationError;

/// Trait for delivering notification text to users.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Replies in the context of the interaction currently being handled.
    async fn respond(&self, text: &str) -> Result<(), NotificationError>;

    /// Sends text to a channel. Direct messages go to the channel named
    /// after the recipient, see [`ChannelName::direct_to`].
    async fn send(&self, channel_name: &ChannelName, text: &str) -> Result<(), NotificationError>;
}

/// A message delivered through [`InMemoryNotifier::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Where the text was delivered.
    pub channel_name: ChannelName,

    /// The delivered text.
    pub text: String,
}

#[derive(Debug, Default)]
struct InMemoryNotifierState {
    responses: Vec<String>,
    sent: Vec<SentMessage>,
    fail_on_send: bool,
}

/// In-memory notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    state: Arc<RwLock<InMemoryNotifierState>>,
}

impl InMemoryNotifier {
    /// Creates a new in-memory notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the notifier to fail all deliveries.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the responses delivered so far.
    pub fn responses(&self) -> Vec<String> {
        self.state.read().unwrap().responses.clone()
    }

    /// Returns the channel messages delivered so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn respond(&self, text: &str) -> Result<(), NotificationError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(NotificationError::Delivery("Sink unavailable".to_string()));
        }

        state.responses.push(text.to_string());
        Ok(())
    }

    async fn send(&self, channel_name: &ChannelName, text: &str) -> Result<(), NotificationError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(NotificationError::Delivery("Sink unavailable".to_string()));
        }

        state.sent.push(SentMessage {
            channel_name: channel_name.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Notifier that writes deliveries to the log instead of a chat service.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn respond(&self, text: &str) -> Result<(), NotificationError> {
        tracing::info!(text, "notification response");
        Ok(())
    }

    async fn send(&self, channel_name: &ChannelName, text: &str) -> Result<(), NotificationError> {
        tracing::info!(channel = %channel_name, text, "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_respond_and_send_are_recorded() {
        let notifier = InMemoryNotifier::new();

        notifier.respond("hello").await.unwrap();
        notifier
            .send(&ChannelName::new("general"), "world")
            .await
            .unwrap();

        assert_eq!(notifier.responses(), vec!["hello".to_string()]);
        assert_eq!(
            notifier.sent(),
            vec![SentMessage {
                channel_name: ChannelName::new("general"),
                text: "world".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_fail_on_send() {
        let notifier = InMemoryNotifier::new();
        notifier.set_fail_on_send(true);

        let result = notifier.respond("hello").await;
        assert!(result.is_err());
        assert!(notifier.responses().is_empty());
    }
}
