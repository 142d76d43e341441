//! Domain error types.

use common::ChannelName;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The channel has never seen a subscription.
    #[error("Unknown channel: {channel_name}")]
    UnknownChannel { channel_name: ChannelName },
}

impl DomainError {
    /// Creates an unknown-channel error for the given channel.
    pub fn unknown_channel(channel_name: &ChannelName) -> Self {
        Self::UnknownChannel {
            channel_name: channel_name.clone(),
        }
    }
}
