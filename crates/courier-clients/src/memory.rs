// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process delivery queue.
//!
//! One broadcast channel per topic. Used when no broker is configured, and by
//! edge consumers running in the same process.

use async_trait::async_trait;
use courier_core::types::DeliveryEnvelope;
use courier_core::{CourierError, DeliveryQueue};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

/// Topic-keyed fan-out of envelopes to in-process subscribers.
///
/// Publishing to a topic nobody listens on succeeds and drops the envelope,
/// the same as a broker with no consumers attached. Slow subscribers lag and
/// lose the oldest envelopes once `capacity` is exceeded.
#[derive(Debug)]
pub struct InMemoryQueue {
    topics: DashMap<String, broadcast::Sender<DeliveryEnvelope>>,
    capacity: usize,
}

impl InMemoryQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Receive every envelope published to `topic` from now on.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<DeliveryEnvelope> {
        self.sender(topic).subscribe()
    }

    /// Number of topics that have been published to or subscribed on.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<DeliveryEnvelope> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl DeliveryQueue for InMemoryQueue {
    async fn publish(&self, topic: &str, envelope: &DeliveryEnvelope) -> Result<(), CourierError> {
        match self.sender(topic).send(envelope.clone()) {
            Ok(receivers) => debug!(topic, receivers, "envelope published"),
            Err(_) => debug!(topic, "no subscribers, envelope dropped"),
        }
        Ok(())
    }
}
