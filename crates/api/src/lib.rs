//! HTTP API server with observability for the keyword notification service.
//!
//! Provides REST endpoints for managing keyword subscriptions and posting
//! channel messages, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use messagebus::{Notifier, bootstrap};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::UnitOfWork;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::channels::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<U: UnitOfWork, N: Notifier>(
    state: Arc<AppState<U, N>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/channels/{channel}/subscriptions",
            post(routes::channels::subscribe::<U, N>),
        )
        .route(
            "/channels/{channel}/subscriptions",
            delete(routes::channels::unsubscribe::<U, N>),
        )
        .route(
            "/channels/{channel}/subscriptions",
            get(routes::channels::list_subscriptions::<U, N>),
        )
        .route(
            "/channels/{channel}/subscribers",
            get(routes::channels::list_subscribers::<U, N>),
        )
        .route(
            "/channels/{channel}/messages",
            post(routes::channels::post_message::<U, N>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the shared application state over the given storage and notifier.
pub fn create_state<U: UnitOfWork, N: Notifier>(uow: U, notifications: N) -> Arc<AppState<U, N>> {
    Arc::new(AppState {
        bus: bootstrap(uow, notifications),
    })
}
