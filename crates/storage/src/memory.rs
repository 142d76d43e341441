use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::{ChannelName, Event};
use domain::{Channel, Subscription};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::repository::ChannelRepository;
use crate::unit_of_work::{ChannelTx, UnitOfWork};

/// In-memory unit of work implementation for testing.
///
/// Committed channel state lives in a shared map and provides the same
/// interface as the PostgreSQL implementation. A channel stays known once
/// added, even after its last subscription is removed.
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    channels: Arc<RwLock<HashMap<ChannelName, HashSet<Subscription>>>>,
    commits: Arc<RwLock<usize>>,
}

impl InMemoryUnitOfWork {
    /// Creates a new empty in-memory unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of channels in committed state.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Returns the committed subscriptions of a channel, or `None` if the
    /// channel was never committed.
    pub async fn subscriptions(&self, channel_name: &ChannelName) -> Option<HashSet<Subscription>> {
        self.channels.read().await.get(channel_name).cloned()
    }

    /// Returns how many transactions have committed.
    pub async fn commit_count(&self) -> usize {
        *self.commits.read().await
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<Self::Tx> {
        Ok(InMemoryTx {
            repo: InMemoryChannelRepository {
                committed: Arc::clone(&self.channels),
                loaded: HashMap::new(),
                touch_order: Vec::new(),
            },
            commits: Arc::clone(&self.commits),
        })
    }
}

/// An in-memory transaction. Changes stay in the working copy until commit.
pub struct InMemoryTx {
    repo: InMemoryChannelRepository,
    commits: Arc<RwLock<usize>>,
}

#[async_trait]
impl ChannelTx for InMemoryTx {
    type Repo = InMemoryChannelRepository;

    fn channels(&mut self) -> &mut Self::Repo {
        &mut self.repo
    }

    async fn commit(mut self) -> Result<Vec<Box<dyn Event>>> {
        let mut events = Vec::new();
        {
            let mut committed = self.repo.committed.write().await;
            for channel_name in &self.repo.touch_order {
                if let Some(channel) = self.repo.loaded.get_mut(channel_name) {
                    committed.insert(
                        channel_name.clone(),
                        channel.subscriptions().cloned().collect(),
                    );
                    events.extend(channel.take_events());
                }
            }
        }
        *self.commits.write().await += 1;
        Ok(events)
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

/// Repository over a transaction-local working copy of channel state.
pub struct InMemoryChannelRepository {
    committed: Arc<RwLock<HashMap<ChannelName, HashSet<Subscription>>>>,
    loaded: HashMap<ChannelName, Channel>,
    touch_order: Vec<ChannelName>,
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn get(&mut self, channel_name: &ChannelName) -> Result<Option<&mut Channel>> {
        if !self.loaded.contains_key(channel_name) {
            let snapshot = self.committed.read().await.get(channel_name).cloned();
            let Some(subscriptions) = snapshot else {
                return Ok(None);
            };
            self.loaded.insert(
                channel_name.clone(),
                Channel::with_subscriptions(channel_name.clone(), subscriptions),
            );
            self.touch_order.push(channel_name.clone());
        }
        Ok(self.loaded.get_mut(channel_name))
    }

    async fn add(&mut self, channel: Channel) -> Result<&mut Channel> {
        let channel_name = channel.channel_name().clone();
        if !self.loaded.contains_key(&channel_name) {
            self.touch_order.push(channel_name.clone());
        }
        Ok(self.loaded.entry(channel_name).or_insert(channel))
    }
}
