// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted message processor for bridge and gateway tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use courier_core::types::{FanOutResult, InboundMessage};
use courier_core::{CourierError, MessageProcessor, RequestContext};

/// Records every message and answers from a script.
///
/// Messages whose id is registered with [`MockProcessor::failing_for`] get a
/// directory error; messages registered with [`MockProcessor::denying`] get an
/// authorization denial; everything else is delivered to one recipient.
#[derive(Default)]
pub struct MockProcessor {
    calls: Arc<Mutex<Vec<InboundMessage>>>,
    completed: Arc<Mutex<Vec<String>>>,
    notify: Arc<Notify>,
    failing: HashSet<String>,
    denying: HashSet<String>,
    delay: Option<Duration>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, message_id: impl Into<String>) -> Self {
        self.failing.insert(message_id.into());
        self
    }

    pub fn denying(mut self, message_id: impl Into<String>) -> Self {
        self.denying.insert(message_id.into());
        self
    }

    /// Take `delay` to answer each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Messages received, in arrival order.
    pub async fn calls(&self) -> Vec<InboundMessage> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Ids of calls that ran to completion.
    pub async fn completed(&self) -> Vec<String> {
        self.completed.lock().await.clone()
    }

    /// Wait until at least `n` calls completed or `timeout` elapses.
    pub async fn wait_for_completed(&self, n: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.completed.lock().await.len() >= n {
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
impl MessageProcessor for MockProcessor {
    async fn process_message(
        &self,
        _ctx: &RequestContext,
        msg: InboundMessage,
    ) -> Result<FanOutResult, CourierError> {
        self.calls.lock().await.push(msg.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing.contains(&msg.message_id) {
            Err(CourierError::directory("groups", "mock directory unavailable"))
        } else if self.denying.contains(&msg.message_id) {
            Ok(FanOutResult::denied(msg.message_id.clone(), "not allowed"))
        } else {
            Ok(FanOutResult {
                success: true,
                message: "delivered to 1 recipient(s)".to_string(),
                message_id: msg.message_id.clone(),
                success_count: 1,
                failure_count: 0,
                failed_users: Vec::new(),
            })
        };

        self.completed.lock().await.push(msg.message_id);
        self.notify.notify_waiters();
        result
    }
}
