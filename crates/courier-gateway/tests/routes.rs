// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway route tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use courier_bridge::StreamBridge;
use courier_core::{MessageProcessor, SYSTEM_SENDER_ID};
use courier_gateway::{AuthConfig, GatewayState, HealthState, build_router};
use courier_test_utils::{MockFriendDirectory, MockProcessor, TestHarness};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

fn state_for(processor: Arc<dyn MessageProcessor + Send + Sync>, token: Option<&str>) -> GatewayState {
    GatewayState::new(
        processor.clone(),
        StreamBridge::new(processor, SYSTEM_SENDER_ID),
        AuthConfig::new(token.map(str::to_string)),
        CancellationToken::new(),
    )
}

fn post_message(body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/messages")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_router(state_for(Arc::new(MockProcessor::new()), Some(TOKEN)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_streams"], 0);
}

#[tokio::test]
async fn metrics_render_when_recorder_present() {
    let state = state_for(Arc::new(MockProcessor::new()), Some(TOKEN)).with_health(
        HealthState::new(Some(Arc::new(|| "courier_messages_total 3\n".to_string()))),
    );
    let app = build_router(state);

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"courier_messages_total 3\n");
}

#[tokio::test]
async fn metrics_absent_without_recorder() {
    let app = build_router(state_for(Arc::new(MockProcessor::new()), Some(TOKEN)));
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn messages_require_bearer_token() {
    let processor = Arc::new(MockProcessor::new());
    let app = build_router(state_for(processor.clone(), Some(TOKEN)));
    let body = serde_json::json!({"message_id": "m-1", "from": 1, "to": 2});

    let missing = app.clone().oneshot(post_message(body.clone(), None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = app.oneshot(post_message(body, Some("nope"))).await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(processor.call_count().await, 0);
}

#[tokio::test]
async fn no_configured_token_fails_closed() {
    let app = build_router(state_for(Arc::new(MockProcessor::new()), None));
    let body = serde_json::json!({"message_id": "m-1", "from": 1, "to": 2});

    let response = app.oneshot(post_message(body, Some(TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn routed_message_returns_fan_out_result() {
    let harness = TestHarness::builder()
        .with_friends(MockFriendDirectory::new().with_friends(1, 2))
        .build()
        .unwrap();
    let app = build_router(state_for(harness.processor(), Some(TOKEN)));

    let response = app
        .oneshot(post_message(
            serde_json::json!({"message_id": "m-1", "from": 1, "to": 2, "content": "hi"}),
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failure_count"], 0);
    assert_eq!(body["message_id"], "m-1");
    assert_eq!(harness.queue.attempted_targets().await, vec![2]);
}

#[tokio::test]
async fn denial_is_ok_with_success_false() {
    let harness = TestHarness::builder().build().unwrap();
    let app = build_router(state_for(harness.processor(), Some(TOKEN)));

    let response = app
        .oneshot(post_message(
            serde_json::json!({"message_id": "m-2", "from": 1, "to": 9}),
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["failure_count"], 1);
}

#[tokio::test]
async fn invalid_addressing_is_bad_request() {
    let harness = TestHarness::builder().build().unwrap();
    let app = build_router(state_for(harness.processor(), Some(TOKEN)));

    let response = app
        .oneshot(post_message(
            serde_json::json!({"message_id": "m-3", "from": 1, "to": 2, "group_id": 10}),
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("exactly one"));
}

#[tokio::test]
async fn infrastructure_failure_hides_detail() {
    let processor = Arc::new(MockProcessor::new().failing_for("m-4"));
    let app = build_router(state_for(processor, Some(TOKEN)));

    let response = app
        .oneshot(post_message(
            serde_json::json!({"message_id": "m-4", "from": 1, "group_id": 10}),
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(!error.contains("mock"));
    assert!(!error.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_routing_times_out() {
    let processor = Arc::new(MockProcessor::new().with_delay(std::time::Duration::from_secs(60)));
    let state = state_for(processor, Some(TOKEN))
        .with_request_timeout(std::time::Duration::from_secs(1));
    let app = build_router(state);

    let response = app
        .oneshot(post_message(
            serde_json::json!({"message_id": "m-5", "from": 1, "to": 2}),
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn websocket_requires_token() {
    let app = build_router(state_for(Arc::new(MockProcessor::new()), Some(TOKEN)));

    let response = app
        .oneshot(Request::get("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
