use async_trait::async_trait;
use common::ChannelName;
use domain::Channel;

use crate::error::Result;

/// Collection-like access to [`Channel`] aggregates within one transaction.
///
/// Implementations keep an identity map: repeated lookups for the same name
/// return the same in-memory aggregate, so events queued on it survive until
/// the surrounding transaction commits.
#[async_trait]
pub trait ChannelRepository: Send {
    /// Returns the channel with the given name, or `None` if it was never added.
    async fn get(&mut self, channel_name: &ChannelName) -> Result<Option<&mut Channel>>;

    /// Starts tracking a new channel and returns the tracked aggregate.
    async fn add(&mut self, channel: Channel) -> Result<&mut Channel>;
}
