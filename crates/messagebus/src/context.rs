//! Handler context and transactional scope.

use std::sync::{Arc, Mutex};

use common::Event;
use storage::{ChannelTx, StorageError, UnitOfWork};

use crate::notifications::Notifier;

/// Events harvested by committed scopes, waiting to be dispatched.
///
/// The bus hands each handler invocation a context holding one collector
/// and drains it after the handler returns.
#[derive(Clone, Default)]
pub(crate) struct EventCollector {
    events: Arc<Mutex<Vec<Box<dyn Event>>>>,
}

impl EventCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn deposit(&self, events: Vec<Box<dyn Event>>) {
        self.events.lock().unwrap().extend(events);
    }

    pub(crate) fn drain(&self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

/// Dependencies handed to every handler invocation.
pub struct Context<U, N> {
    uow: Arc<U>,
    notifications: Arc<N>,
    collector: EventCollector,
}

impl<U, N> Context<U, N>
where
    U: UnitOfWork,
    N: Notifier,
{
    pub(crate) fn new(uow: Arc<U>, notifications: Arc<N>, collector: EventCollector) -> Self {
        Self {
            uow,
            notifications,
            collector,
        }
    }

    /// Opens a transactional scope over channel state.
    pub async fn begin(&self) -> Result<Scope<U::Tx>, StorageError> {
        Ok(Scope {
            tx: self.uow.begin().await?,
            collector: self.collector.clone(),
        })
    }

    /// The notification sink.
    pub fn notifications(&self) -> &N {
        &self.notifications
    }
}

/// A unit-of-work scope bound to the current handler invocation.
///
/// Committing makes staged changes durable and queues the harvested
/// aggregate events for dispatch. Dropping the scope without committing
/// discards the changes and the events.
pub struct Scope<T: ChannelTx> {
    tx: T,
    collector: EventCollector,
}

impl<T: ChannelTx> Scope<T> {
    /// The channel repository bound to this scope.
    pub fn channels(&mut self) -> &mut T::Repo {
        self.tx.channels()
    }

    /// Commits the scope and queues harvested events for dispatch.
    pub async fn commit(self) -> Result<(), StorageError> {
        let events = self.tx.commit().await?;
        self.collector.deposit(events);
        Ok(())
    }

    /// Rolls the scope back explicitly.
    pub async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ChannelName, Keyword, User};
    use domain::{Channel, Subscription};
    use storage::{ChannelRepository, InMemoryUnitOfWork};

    use crate::notifications::InMemoryNotifier;

    fn context(
        uow: &InMemoryUnitOfWork,
    ) -> (Context<InMemoryUnitOfWork, InMemoryNotifier>, EventCollector) {
        let collector = EventCollector::new();
        let context = Context::new(
            Arc::new(uow.clone()),
            Arc::new(InMemoryNotifier::new()),
            collector.clone(),
        );
        (context, collector)
    }

    fn subscribed_channel() -> Channel {
        let mut channel = Channel::new(ChannelName::new("general"));
        channel.subscribe(Subscription::new(
            ChannelName::new("general"),
            User::new("bob"),
            Keyword::new("deploy"),
        ));
        channel
    }

    #[tokio::test]
    async fn commit_deposits_harvested_events() {
        let uow = InMemoryUnitOfWork::new();
        let (context, collector) = context(&uow);

        let mut scope = context.begin().await.unwrap();
        scope.channels().add(subscribed_channel()).await.unwrap();
        scope.commit().await.unwrap();

        let events = collector.drain();
        assert_eq!(events.len(), 1);
        assert!(collector.drain().is_empty());
        assert_eq!(uow.commit_count().await, 1);
    }

    #[tokio::test]
    async fn rollback_deposits_nothing() {
        let uow = InMemoryUnitOfWork::new();
        let (context, collector) = context(&uow);

        let mut scope = context.begin().await.unwrap();
        scope.channels().add(subscribed_channel()).await.unwrap();
        scope.rollback().await.unwrap();

        assert!(collector.drain().is_empty());
        assert_eq!(uow.channel_count().await, 0);
    }

    #[tokio::test]
    async fn drop_deposits_nothing() {
        let uow = InMemoryUnitOfWork::new();
        let (context, collector) = context(&uow);

        let mut scope = context.begin().await.unwrap();
        scope.channels().add(subscribed_channel()).await.unwrap();
        drop(scope);

        assert!(collector.drain().is_empty());
        assert_eq!(uow.commit_count().await, 0);
    }
}
