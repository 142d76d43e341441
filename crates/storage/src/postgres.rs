use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use common::{ChannelName, Event};
use domain::{Channel, Subscription};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::error::Result;
use crate::repository::ChannelRepository;
use crate::unit_of_work::{ChannelTx, UnitOfWork};

/// PostgreSQL-based unit of work implementation.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    /// Creates a new PostgreSQL unit of work with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs database migrations to set up the schema.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Tx = PostgresTx;

    async fn begin(&self) -> Result<Self::Tx> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTx {
            repo: PostgresChannelRepository {
                tx,
                loaded: HashMap::new(),
                baseline: HashMap::new(),
                touch_order: Vec::new(),
            },
        })
    }
}

/// A database transaction. Dropping it without committing rolls back.
pub struct PostgresTx {
    repo: PostgresChannelRepository,
}

#[async_trait]
impl ChannelTx for PostgresTx {
    type Repo = PostgresChannelRepository;

    fn channels(&mut self) -> &mut Self::Repo {
        &mut self.repo
    }

    async fn commit(mut self) -> Result<Vec<Box<dyn Event>>> {
        let mut events = Vec::new();
        for channel_name in std::mem::take(&mut self.repo.touch_order) {
            let Some(channel) = self.repo.loaded.get_mut(&channel_name) else {
                continue;
            };

            let current: HashSet<Subscription> = channel.subscriptions().cloned().collect();
            let baseline = self
                .repo
                .baseline
                .get(&channel_name)
                .cloned()
                .unwrap_or_default();

            for subscription in current.difference(&baseline) {
                sqlx::query(
                    r#"
                    INSERT INTO subscriptions (channel_name, subscriber, keyword, active)
                    VALUES ($1, $2, $3, TRUE)
                    ON CONFLICT (channel_name, subscriber, keyword)
                    DO UPDATE SET active = TRUE
                    "#,
                )
                .bind(subscription.channel_name.as_str())
                .bind(subscription.subscriber.as_str())
                .bind(subscription.keyword.as_str())
                .execute(&mut *self.repo.tx)
                .await?;
            }

            for subscription in baseline.difference(&current) {
                sqlx::query(
                    r#"
                    UPDATE subscriptions
                    SET active = FALSE
                    WHERE channel_name = $1 AND subscriber = $2 AND keyword = $3
                    "#,
                )
                .bind(subscription.channel_name.as_str())
                .bind(subscription.subscriber.as_str())
                .bind(subscription.keyword.as_str())
                .execute(&mut *self.repo.tx)
                .await?;
            }

            events.extend(channel.take_events());
        }

        self.repo.tx.commit().await?;
        tracing::debug!(events = events.len(), "transaction committed");
        Ok(events)
    }

    async fn rollback(self) -> Result<()> {
        self.repo.tx.rollback().await?;
        Ok(())
    }
}

/// Repository tracking channel aggregates loaded within one transaction.
///
/// Loaded state doubles as the write baseline: on commit, only the
/// difference between an aggregate's current subscriptions and the
/// baseline captured at load time is flushed.
pub struct PostgresChannelRepository {
    tx: Transaction<'static, Postgres>,
    loaded: HashMap<ChannelName, Channel>,
    baseline: HashMap<ChannelName, HashSet<Subscription>>,
    touch_order: Vec<ChannelName>,
}

#[async_trait]
impl ChannelRepository for PostgresChannelRepository {
    async fn get(&mut self, channel_name: &ChannelName) -> Result<Option<&mut Channel>> {
        if !self.loaded.contains_key(channel_name) {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM channels WHERE channel_name = $1)")
                    .bind(channel_name.as_str())
                    .fetch_one(&mut *self.tx)
                    .await?;
            if !exists {
                return Ok(None);
            }

            let rows = sqlx::query(
                r#"
                SELECT subscriber, keyword
                FROM subscriptions
                WHERE channel_name = $1 AND active
                "#,
            )
            .bind(channel_name.as_str())
            .fetch_all(&mut *self.tx)
            .await?;

            let mut subscriptions = HashSet::new();
            for row in &rows {
                subscriptions.insert(Subscription::new(
                    channel_name.clone(),
                    row.try_get::<String, _>("subscriber")?,
                    row.try_get::<String, _>("keyword")?,
                ));
            }

            self.baseline
                .insert(channel_name.clone(), subscriptions.clone());
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
        sqlx::query(
            r#"
            INSERT INTO channels (channel_name)
            VALUES ($1)
            ON CONFLICT (channel_name) DO NOTHING
            "#,
        )
        .bind(channel_name.as_str())
        .execute(&mut *self.tx)
        .await?;

        if !self.loaded.contains_key(&channel_name) {
            self.touch_order.push(channel_name.clone());
        }
        Ok(self.loaded.entry(channel_name).or_insert(channel))
    }
}
