// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detached, best-effort message persistence.

use std::sync::Arc;
use std::time::Duration;

use courier_core::types::InboundMessage;
use courier_core::MessageStore;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

use crate::recording;

/// Hands accepted messages to the message store without blocking routing.
///
/// Each call spawns its own task bounded by `timeout`. The task is not tied
/// to any request's cancellation, so it keeps running after the request that
/// triggered it has returned or been cancelled. Failures are logged and
/// counted, never reported to the caller.
#[derive(Clone)]
pub struct PersistencePublisher {
    store: Arc<dyn MessageStore + Send + Sync>,
    timeout: Duration,
}

impl PersistencePublisher {
    pub fn new(store: Arc<dyn MessageStore + Send + Sync>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spawn the persistence call for `msg`.
    ///
    /// Dropping the returned handle detaches the task; it is returned so
    /// callers that need to (tests, shutdown) can await completion.
    pub fn publish(&self, msg: InboundMessage) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let timeout = self.timeout;
        let span = tracing::debug_span!(
            "persist",
            message_id = %msg.message_id,
            from = msg.from,
            group_id = msg.group_id,
        );

        tokio::spawn(
            async move {
                match tokio::time::timeout(timeout, store.persist(&msg)).await {
                    Ok(Ok(())) => debug!("message persisted"),
                    Ok(Err(e)) => {
                        recording::record_persist_failure();
                        warn!(error = %e, "message persistence failed");
                    }
                    Err(_) => {
                        recording::record_persist_failure();
                        warn!(
                            timeout_ms = timeout.as_millis() as u64,
                            "message persistence timed out"
                        );
                    }
                }
            }
            .instrument(span),
        )
    }
}

impl std::fmt::Debug for PersistencePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistencePublisher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
