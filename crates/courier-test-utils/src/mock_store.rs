// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message store and delivery queue.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use courier_core::types::{DeliveryEnvelope, InboundMessage, UserId};
use courier_core::{CourierError, DeliveryQueue, MessageStore};

/// Records every persistence attempt.
///
/// Persistence runs detached from routing, so tests wait for it with
/// [`MockStore::wait_for_calls`] instead of asserting right after a route.
#[derive(Default)]
pub struct MockStore {
    calls: Arc<Mutex<Vec<InboundMessage>>>,
    notify: Arc<Notify>,
    failing: bool,
    delay: Option<Duration>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persist call fails after being recorded.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<InboundMessage> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Wait until at least `n` persist calls were made or `timeout` elapses.
    ///
    /// Returns whether the count was reached.
    pub async fn wait_for_calls(&self, n: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.calls.lock().await.len() >= n {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl MessageStore for MockStore {
    async fn persist(&self, msg: &InboundMessage) -> Result<(), CourierError> {
        self.calls.lock().await.push(msg.clone());
        self.notify.notify_waiters();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(CourierError::Store {
                message: "mock store rejected the message".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

/// Records every publish in call order.
#[derive(Default)]
pub struct MockQueue {
    attempts: Arc<Mutex<Vec<(String, DeliveryEnvelope)>>>,
    failing_targets: HashSet<UserId>,
    delay: Option<Duration>,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishing for any of `targets` fails.
    pub fn failing_for(mut self, targets: &[UserId]) -> Self {
        self.failing_targets.extend(targets.iter().copied());
        self
    }

    /// Sleep before each publish is recorded.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every `(topic, envelope)` publish attempt, failed ones included.
    pub async fn attempts(&self) -> Vec<(String, DeliveryEnvelope)> {
        self.attempts.lock().await.clone()
    }

    /// Targets of every attempt, in order.
    pub async fn attempted_targets(&self) -> Vec<UserId> {
        self.attempts.lock().await.iter().map(|(_, e)| e.target).collect()
    }

    /// Envelopes that were accepted.
    pub async fn published(&self) -> Vec<DeliveryEnvelope> {
        self.attempts
            .lock()
            .await
            .iter()
            .filter(|(_, e)| !self.failing_targets.contains(&e.target))
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

#[async_trait]
impl DeliveryQueue for MockQueue {
    async fn publish(&self, topic: &str, envelope: &DeliveryEnvelope) -> Result<(), CourierError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.attempts
            .lock()
            .await
            .push((topic.to_string(), envelope.clone()));
        if self.failing_targets.contains(&envelope.target) {
            return Err(CourierError::queue(format!(
                "mock broker refused envelope for {}",
                envelope.target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::MessageType;

    fn message() -> InboundMessage {
        InboundMessage {
            message_id: "m-1".into(),
            from: 1,
            to: 2,
            group_id: 0,
            content: "hi".into(),
            message_type: MessageType::Text,
            timestamp: 0,
            ack_id: String::new(),
        }
    }

    #[tokio::test]
    async fn wait_for_calls_sees_detached_persist() {
        let store = Arc::new(MockStore::new());
        let bg = Arc::clone(&store);
        tokio::spawn(async move { bg.persist(&message()).await });
        assert!(store.wait_for_calls(1, Duration::from_secs(1)).await);
        assert_eq!(store.calls().await[0].message_id, "m-1");
    }

    #[tokio::test]
    async fn wait_for_calls_times_out() {
        let store = MockStore::new();
        assert!(!store.wait_for_calls(1, Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn queue_fails_configured_targets() {
        let queue = MockQueue::new().failing_for(&[3]);
        let msg = message();
        assert!(queue.publish("t", &DeliveryEnvelope::for_target(&msg, 2)).await.is_ok());
        assert!(queue.publish("t", &DeliveryEnvelope::for_target(&msg, 3)).await.is_err());
        assert_eq!(queue.attempted_targets().await, vec![2, 3]);
        assert_eq!(queue.published().await.len(), 1);
    }
}
