// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a real [`Router`] to mock collaborators.

use std::sync::Arc;

use courier_config::model::RouterConfig;
use courier_core::types::{FanOutResult, GroupId, InboundMessage, MessageType, UserId};
use courier_core::{CourierError, MessageProcessor, RequestContext, StatusDirectory};
use courier_router::{Collaborators, Router};

use crate::mock_directory::{MockFriendDirectory, MockGroupDirectory, MockStatusDirectory};
use crate::mock_store::{MockQueue, MockStore};

/// Builder for a [`TestHarness`]. Anything not supplied is an empty mock.
#[derive(Default)]
pub struct TestHarnessBuilder {
    friends: Option<MockFriendDirectory>,
    groups: Option<MockGroupDirectory>,
    status: Option<MockStatusDirectory>,
    store: Option<MockStore>,
    queue: Option<MockQueue>,
    config: RouterConfig,
}

impl TestHarnessBuilder {
    pub fn with_friends(mut self, friends: MockFriendDirectory) -> Self {
        self.friends = Some(friends);
        self
    }

    pub fn with_groups(mut self, groups: MockGroupDirectory) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Supplying a status directory also enables node-keyed topics.
    pub fn with_status(mut self, status: MockStatusDirectory) -> Self {
        self.status = Some(status);
        self.config.route_by_node = true;
        self
    }

    pub fn with_store(mut self, store: MockStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_queue(mut self, queue: MockQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Replace the router config. `route_by_node` is kept if a status
    /// directory was supplied.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        let by_node = self.config.route_by_node;
        self.config = config;
        self.config.route_by_node |= by_node;
        self
    }

    pub fn build(self) -> Result<TestHarness, CourierError> {
        let friends = Arc::new(self.friends.unwrap_or_default());
        let groups = Arc::new(self.groups.unwrap_or_default());
        let status = Arc::new(self.status.unwrap_or_default());
        let store = Arc::new(self.store.unwrap_or_default());
        let queue = Arc::new(self.queue.unwrap_or_default());

        let router = Router::new(
            &self.config,
            Collaborators {
                friends: friends.clone(),
                groups: groups.clone(),
                store: store.clone(),
                queue: queue.clone(),
                status: Some(status.clone() as Arc<dyn StatusDirectory + Send + Sync>),
            },
        )?;

        Ok(TestHarness {
            router: Arc::new(router),
            friends,
            groups,
            status,
            store,
            queue,
        })
    }
}

/// A router plus handles on every mock it talks to.
pub struct TestHarness {
    pub router: Arc<Router>,
    pub friends: Arc<MockFriendDirectory>,
    pub groups: Arc<MockGroupDirectory>,
    pub status: Arc<MockStatusDirectory>,
    pub store: Arc<MockStore>,
    pub queue: Arc<MockQueue>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// Route `msg` under a fresh request context.
    pub async fn send(&self, msg: InboundMessage) -> Result<FanOutResult, CourierError> {
        self.router.process_message(&RequestContext::new(), msg).await
    }

    /// The router as a trait object, for bridge and gateway wiring.
    pub fn processor(&self) -> Arc<dyn MessageProcessor + Send + Sync> {
        self.router.clone()
    }
}

/// A text message from `from` to user `to`.
pub fn private_message(message_id: &str, from: UserId, to: UserId) -> InboundMessage {
    InboundMessage {
        message_id: message_id.to_string(),
        from,
        to,
        group_id: 0,
        content: format!("hello {to}"),
        message_type: MessageType::Text,
        timestamp: 1_700_000_000_000,
        ack_id: format!("ack-{message_id}"),
    }
}

/// A text message from `from` to group `group_id`.
pub fn group_message(message_id: &str, from: UserId, group_id: GroupId) -> InboundMessage {
    InboundMessage {
        message_id: message_id.to_string(),
        from,
        to: 0,
        group_id,
        content: format!("hello group {group_id}"),
        message_type: MessageType::Text,
        timestamp: 1_700_000_000_000,
        ack_id: format!("ack-{message_id}"),
    }
}
