// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end: gateway -> router -> HTTP collaborators -> in-process queue.

use std::sync::Arc;
use std::time::Duration;

use courier_bridge::StreamBridge;
use courier_clients::{HttpFriendDirectory, HttpGroupDirectory, HttpMessageStore, InMemoryQueue};
use courier_config::model::RouterConfig;
use courier_core::MessageProcessor;
use courier_core::types::FanOutResult;
use courier_gateway::{AuthConfig, GatewayState, build_router, serve};
use courier_router::{Collaborators, Router};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "e2e-token";
const TOPIC: &str = "courier.delivery";

struct Stack {
    base: String,
    queue: Arc<InMemoryQueue>,
    shutdown: CancellationToken,
}

async fn directory_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/friends/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"is_friend": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/friends/1/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"is_friend": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/groups/10/members/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"is_member": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/groups/10/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "members": [{"user_id": 1}, {"user_id": 2}, {"user_id": 3}]
        })))
        .mount(&server)
        .await;
    server
}

async fn start(directory: &MockServer, store: &MockServer) -> Stack {
    let timeout = Duration::from_secs(2);
    let queue = Arc::new(InMemoryQueue::new(16));
    let collaborators = Collaborators {
        friends: Arc::new(HttpFriendDirectory::new(&directory.uri(), timeout).unwrap()),
        groups: Arc::new(HttpGroupDirectory::new(&directory.uri(), timeout).unwrap()),
        store: Arc::new(HttpMessageStore::new(&store.uri(), timeout).unwrap()),
        queue: queue.clone(),
        status: None,
    };
    let router = Router::new(&RouterConfig::default(), collaborators).unwrap();
    let processor: Arc<dyn MessageProcessor + Send + Sync> = Arc::new(router);

    let shutdown = CancellationToken::new();
    let state = GatewayState::new(
        processor.clone(),
        StreamBridge::new(processor, 0),
        AuthConfig::new(Some(TOKEN.to_string())),
        shutdown.clone(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, build_router(state), shutdown.clone()));

    Stack {
        base: format!("127.0.0.1:{}", addr.port()),
        queue,
        shutdown,
    }
}

async fn store_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    server
}

async fn post(stack: &Stack, body: serde_json::Value) -> FanOutResult {
    let resp = reqwest::Client::new()
        .post(format!("http://{}/v1/messages", stack.base))
        .bearer_auth(TOKEN)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn group_message_reaches_every_other_member() {
    let directory = directory_server().await;
    let store = store_server().await;
    let stack = start(&directory, &store).await;
    let mut deliveries = stack.queue.subscribe(TOPIC);

    let result = post(
        &stack,
        serde_json::json!({"message_id": "g-1", "from": 1, "group_id": 10, "content": "hi all"}),
    )
    .await;

    assert!(result.success);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 0);

    let mut targets = Vec::new();
    for _ in 0..2 {
        let env = tokio::time::timeout(Duration::from_secs(2), deliveries.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(env.message_id, "g-1");
        assert_eq!(env.group_id, 10);
        targets.push(env.target);
    }
    assert_eq!(targets, vec![2, 3]);

    // Persistence is detached; give it a moment to land.
    let mut persisted = 0;
    for _ in 0..50 {
        persisted = store.received_requests().await.map(|r| r.len()).unwrap_or(0);
        if persisted > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(persisted, 1);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn private_message_to_stranger_is_refused() {
    let directory = directory_server().await;
    let store = store_server().await;
    let stack = start(&directory, &store).await;
    let mut deliveries = stack.queue.subscribe(TOPIC);

    let result = post(
        &stack,
        serde_json::json!({"message_id": "p-1", "from": 1, "to": 3, "content": "hey"}),
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.attempted(), 0);
    assert!(deliveries.try_recv().is_err());
    assert!(store.received_requests().await.unwrap().is_empty());

    stack.shutdown.cancel();
}

#[tokio::test]
async fn stream_survives_refused_message() {
    // No group routes mounted: the membership lookup fails and is refused.
    let directory = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/friends/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"is_friend": true})))
        .mount(&directory)
        .await;
    let store = store_server().await;
    let stack = start(&directory, &store).await;
    let mut deliveries = stack.queue.subscribe(TOPIC);

    let url = format!("ws://{}/ws?token={TOKEN}", stack.base);
    let (mut socket, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    let denied = serde_json::json!({"message_id": "s-1", "from": 1, "group_id": 99});
    socket.send(Message::text(denied.to_string())).await.unwrap();
    let ok = serde_json::json!({"message_id": "s-2", "from": 1, "to": 2, "content": "hi"});
    socket.send(Message::text(ok.to_string())).await.unwrap();

    let env = tokio::time::timeout(Duration::from_secs(5), deliveries.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(env.message_id, "s-2");
    assert_eq!(env.target, 2);

    socket.close(None).await.unwrap();
    stack.shutdown.cancel();
}
