//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{ChannelName, User};
use domain::Subscription;
use messagebus::{InMemoryNotifier, SentMessage};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::InMemoryUnitOfWork;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let (app, _, _) = setup_with_doubles();
    app
}

fn setup_with_doubles() -> (axum::Router, InMemoryUnitOfWork, InMemoryNotifier) {
    let uow = InMemoryUnitOfWork::new();
    let notifications = InMemoryNotifier::new();
    let state = api::create_state(uow.clone(), notifications.clone());
    let app = api::create_app(state, get_metrics_handle());
    (app, uow, notifications)
}

fn subscription_request(subscriber: &str, keyword: &str) -> Body {
    Body::from(
        serde_json::to_string(&serde_json::json!({
            "subscriber": subscriber,
            "keyword": keyword,
        }))
        .unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_subscribe_creates_subscription() {
    let (app, uow, _) = setup_with_doubles();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["channel"], "general");
    assert_eq!(json["subscriber"], "bob");
    assert_eq!(json["keyword"], "deploy");

    let subscriptions = uow
        .subscriptions(&ChannelName::new("general"))
        .await
        .unwrap();
    assert!(subscriptions.contains(&Subscription::new("general", "bob", "deploy")));
}

#[tokio::test]
async fn test_subscribe_then_list() {
    let app = setup();

    let create_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);

    let list_response = app
        .oneshot(
            Request::builder()
                .uri("/channels/general/subscriptions?subscriber=bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(list_response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(list_response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["keywords"], serde_json::json!(["deploy"]));
}

#[tokio::test]
async fn test_unsubscribe_removes_subscription() {
    let (app, uow, _) = setup_with_doubles();

    let create_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);

    let delete_response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(delete_response.status(), StatusCode::OK);

    let subscriptions = uow
        .subscriptions(&ChannelName::new("general"))
        .await
        .unwrap();
    assert!(subscriptions.is_empty());
}

#[tokio::test]
async fn test_list_subscriptions_in_unknown_channel_is_not_found() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/channels/ghost-town/subscriptions?subscriber=bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("ghost-town"));
}

#[tokio::test]
async fn test_list_subscribers_in_unknown_channel_is_not_found() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/channels/ghost-town/subscribers?author=carol&text=deploy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsubscribe_in_unknown_channel_is_not_found() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/channels/ghost-town/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_subscriber_param_is_bad_request() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/channels/general/subscriptions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_keyword_is_bad_request() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "  "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_subscribers_for_a_message() {
    let app = setup();

    for (subscriber, keyword) in [("bob", "deploy"), ("alice", "ship"), ("eve", "lunch")] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/channels/general/subscriptions")
                    .header("content-type", "application/json")
                    .body(subscription_request(subscriber, keyword))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/channels/general/subscribers?author=carol&text=deploy%20the%20ship")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["subscribers"], serde_json::json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_post_message_notifies_subscribers() {
    let (app, _, notifications) = setup_with_doubles();

    let create_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);

    let post_response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/messages")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({
                        "author": "carol",
                        "text": "time to deploy",
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(post_response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        notifications.sent(),
        vec![SentMessage {
            channel_name: ChannelName::direct_to(&User::new("bob")),
            text: "'deploy' was mentioned by carol in <#general>: time to deploy".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_post_message_to_unknown_channel_is_accepted() {
    let (app, _, notifications) = setup_with_doubles();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/ghost-town/messages")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({
                        "author": "bob",
                        "text": "anybody here?",
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(notifications.sent().is_empty());
}

#[tokio::test]
async fn test_metrics_endpoint_renders_counters() {
    let app = setup();

    let create_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/channels/general/subscriptions")
                .header("content-type", "application/json")
                .body(subscription_request("bob", "deploy"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("messages_handled_total"));
}
