//! Command and event handlers.
//!
//! Command handlers run the domain operation inside a transactional scope
//! and commit exactly once on success. Event handlers turn the queued
//! domain events into notification text.

use std::collections::BTreeSet;

use common::{ChannelName, Keyword, User};
use domain::{
    AlreadySubscribed, Channel, ChannelMessage, DomainError, ListSubscribers, ListSubscriptions,
    Mentioned, PostMessage, Subscribe, Subscribed, Subscription, UnknownSubscription, Unsubscribe,
    Unsubscribed,
};
use storage::{ChannelRepository, UnitOfWork};

use crate::context::Context;
use crate::error::HandlerError;
use crate::notifications::Notifier;

/// Subscribes a user to a keyword, creating the channel on first use.
pub async fn subscribe<U, N>(ctx: Context<U, N>, command: Subscribe) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut scope = ctx.begin().await?;
    let subscription = Subscription::new(
        command.channel_name.clone(),
        command.subscriber,
        command.keyword,
    );
    if let Some(channel) = scope.channels().get(&command.channel_name).await? {
        channel.subscribe(subscription);
    } else {
        let mut channel = Channel::new(command.channel_name.clone());
        channel.subscribe(subscription);
        scope.channels().add(channel).await?;
    }
    scope.commit().await?;
    Ok(())
}

/// Removes a subscription in a known channel.
pub async fn unsubscribe<U, N>(ctx: Context<U, N>, command: Unsubscribe) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut scope = ctx.begin().await?;
    let Some(channel) = scope.channels().get(&command.channel_name).await? else {
        return Err(DomainError::unknown_channel(&command.channel_name).into());
    };
    channel.unsubscribe(Subscription::new(
        command.channel_name.clone(),
        command.subscriber,
        command.keyword,
    ));
    scope.commit().await?;
    Ok(())
}

/// Lists the keywords a user watches in a channel.
pub async fn list_subscriptions<U, N>(
    ctx: Context<U, N>,
    command: ListSubscriptions,
) -> Result<BTreeSet<Keyword>, HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut scope = ctx.begin().await?;
    let Some(channel) = scope.channels().get(&command.channel_name).await? else {
        return Err(DomainError::unknown_channel(&command.channel_name).into());
    };
    let keywords = channel.keywords_for(&command.subscriber);
    scope.commit().await?;
    Ok(keywords)
}

/// Computes who would be notified if the given text were posted.
pub async fn list_subscribers<U, N>(
    ctx: Context<U, N>,
    command: ListSubscribers,
) -> Result<BTreeSet<User>, HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut scope = ctx.begin().await?;
    let message = ChannelMessage::new(command.channel_name.clone(), command.author, command.text);
    let Some(channel) = scope.channels().get(&command.channel_name).await? else {
        return Err(DomainError::unknown_channel(&command.channel_name).into());
    };
    let subscribers = channel.find_subscribed(&message).cloned().collect();
    scope.commit().await?;
    Ok(subscribers)
}

/// Ingests a posted message.
///
/// Mentions queue notification events on the channel; a message posted in
/// a channel nobody ever subscribed in is ignored.
pub async fn post_message<U, N>(ctx: Context<U, N>, command: PostMessage) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    let mut scope = ctx.begin().await?;
    let message = ChannelMessage::new(command.channel_name.clone(), command.author, command.text);
    if let Some(channel) = scope.channels().get(&command.channel_name).await? {
        channel.record_mentions(&message);
    }
    scope.commit().await?;
    Ok(())
}

/// Confirms a new subscription to the subscriber.
pub async fn send_subscribed_notification<U, N>(
    ctx: Context<U, N>,
    event: Subscribed,
) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    ctx.notifications()
        .respond(&format!(
            "You will be notified if '{}' is mentioned in <#{}>",
            event.keyword, event.channel_name
        ))
        .await?;
    Ok(())
}

/// Tells the subscriber the subscription already existed.
pub async fn send_already_subscribed_notification<U, N>(
    ctx: Context<U, N>,
    event: AlreadySubscribed,
) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    ctx.notifications()
        .respond(&format!(
            "You are already subscribed to '{}' in <#{}>",
            event.keyword, event.channel_name
        ))
        .await?;
    Ok(())
}

/// Confirms a removed subscription to the subscriber.
pub async fn send_unsubscribed_notification<U, N>(
    ctx: Context<U, N>,
    event: Unsubscribed,
) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    ctx.notifications()
        .respond(&format!(
            "You will be no longer notified if '{}' is mentioned in <#{}>",
            event.keyword, event.channel_name
        ))
        .await?;
    Ok(())
}

/// Tells the subscriber there was nothing to unsubscribe.
pub async fn send_unknown_subscription_notification<U, N>(
    ctx: Context<U, N>,
    event: UnknownSubscription,
) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    ctx.notifications()
        .respond(&format!(
            "You are not subscribed to '{}' in <#{}>",
            event.keyword, event.channel_name
        ))
        .await?;
    Ok(())
}

/// Sends a direct message to a subscriber whose keyword was mentioned.
pub async fn send_mention_notification<U, N>(
    ctx: Context<U, N>,
    event: Mentioned,
) -> Result<(), HandlerError>
where
    U: UnitOfWork,
    N: Notifier,
{
    ctx.notifications()
        .send(
            &ChannelName::direct_to(&event.subscriber),
            &format!(
                "'{}' was mentioned by {} in <#{}>: {}",
                event.keyword, event.author, event.channel_name, event.text
            ),
        )
        .await?;
    Ok(())
}
