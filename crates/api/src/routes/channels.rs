//! Subscription and message endpoints.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Keyword, User};
use domain::{ListSubscribers, ListSubscriptions, PostMessage, Subscribe, Unsubscribe};
use messagebus::{MessageBus, Notifier};
use serde::{Deserialize, Serialize};
use storage::UnitOfWork;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<U: UnitOfWork, N: Notifier> {
    pub bus: MessageBus<U, N>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SubscriptionRequest {
    pub subscriber: String,
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct ListSubscriptionsParams {
    pub subscriber: String,
}

#[derive(Deserialize)]
pub struct ListSubscribersParams {
    pub author: String,
    pub text: String,
}

#[derive(Deserialize)]
pub struct PostMessageRequest {
    pub author: String,
    pub text: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub channel: String,
    pub subscriber: String,
    pub keyword: String,
}

#[derive(Serialize)]
pub struct KeywordsResponse {
    pub keywords: BTreeSet<Keyword>,
}

#[derive(Serialize)]
pub struct SubscribersResponse {
    pub subscribers: BTreeSet<User>,
}

#[derive(Serialize)]
pub struct MessageAcceptedResponse {
    pub status: &'static str,
}

// -- Handlers --

/// POST /channels/:channel/subscriptions: subscribe a user to a keyword.
#[tracing::instrument(skip(state, req))]
pub async fn subscribe<U: UnitOfWork, N: Notifier>(
    State(state): State<Arc<AppState<U, N>>>,
    Path(channel): Path<String>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    require("subscriber", &req.subscriber)?;
    require("keyword", &req.keyword)?;

    state
        .bus
        .execute(Subscribe::new(
            channel.as_str(),
            req.subscriber.as_str(),
            req.keyword.as_str(),
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse {
            channel,
            subscriber: req.subscriber,
            keyword: req.keyword,
        }),
    ))
}

/// DELETE /channels/:channel/subscriptions: remove a subscription.
#[tracing::instrument(skip(state, req))]
pub async fn unsubscribe<U: UnitOfWork, N: Notifier>(
    State(state): State<Arc<AppState<U, N>>>,
    Path(channel): Path<String>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    require("subscriber", &req.subscriber)?;
    require("keyword", &req.keyword)?;

    state
        .bus
        .execute(Unsubscribe::new(
            channel.as_str(),
            req.subscriber.as_str(),
            req.keyword.as_str(),
        ))
        .await?;

    Ok(Json(SubscriptionResponse {
        channel,
        subscriber: req.subscriber,
        keyword: req.keyword,
    }))
}

/// GET /channels/:channel/subscriptions: list the keywords a user watches.
#[tracing::instrument(skip(state, params))]
pub async fn list_subscriptions<U: UnitOfWork, N: Notifier>(
    State(state): State<Arc<AppState<U, N>>>,
    Path(channel): Path<String>,
    Query(params): Query<ListSubscriptionsParams>,
) -> Result<Json<KeywordsResponse>, ApiError> {
    let keywords = state
        .bus
        .execute(ListSubscriptions::new(
            channel.as_str(),
            params.subscriber.as_str(),
        ))
        .await?;

    Ok(Json(KeywordsResponse { keywords }))
}

/// GET /channels/:channel/subscribers: who a message would notify.
#[tracing::instrument(skip(state, params))]
pub async fn list_subscribers<U: UnitOfWork, N: Notifier>(
    State(state): State<Arc<AppState<U, N>>>,
    Path(channel): Path<String>,
    Query(params): Query<ListSubscribersParams>,
) -> Result<Json<SubscribersResponse>, ApiError> {
    let subscribers = state
        .bus
        .execute(ListSubscribers::new(
            channel.as_str(),
            params.author.as_str(),
            params.text.as_str(),
        ))
        .await?;

    Ok(Json(SubscribersResponse { subscribers }))
}

/// POST /channels/:channel/messages: ingest a posted message.
#[tracing::instrument(skip(state, req))]
pub async fn post_message<U: UnitOfWork, N: Notifier>(
    State(state): State<Arc<AppState<U, N>>>,
    Path(channel): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageAcceptedResponse>), ApiError> {
    require("author", &req.author)?;

    state
        .bus
        .execute(PostMessage::new(
            channel.as_str(),
            req.author.as_str(),
            req.text.as_str(),
        ))
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageAcceptedResponse { status: "accepted" }),
    ))
}

fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}
