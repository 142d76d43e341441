use async_trait::async_trait;
use common::Event;

use crate::error::Result;
use crate::repository::ChannelRepository;

/// Factory for transactional scopes over channel state.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    /// The transaction type produced by [`begin`](UnitOfWork::begin).
    type Tx: ChannelTx;

    /// Opens a new transaction.
    async fn begin(&self) -> Result<Self::Tx>;
}

/// A single atomic scope over channel state.
///
/// All mutations made through [`channels`](ChannelTx::channels) are staged
/// until [`commit`](ChannelTx::commit). Dropping the transaction without
/// committing discards them, as does [`rollback`](ChannelTx::rollback).
/// Both finishers take the transaction by value, so a scope cannot be
/// committed twice or used after it is closed.
#[async_trait]
pub trait ChannelTx: Send {
    /// The repository type bound to this transaction.
    type Repo: ChannelRepository;

    /// The repository tracking aggregates loaded in this transaction.
    fn channels(&mut self) -> &mut Self::Repo;

    /// Makes staged changes durable and harvests the events queued by the
    /// touched aggregates, in the order the aggregates were first loaded.
    async fn commit(self) -> Result<Vec<Box<dyn Event>>>;

    /// Discards staged changes.
    async fn rollback(self) -> Result<()>;
}
