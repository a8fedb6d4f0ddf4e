// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The streaming delivery bridge.
//!
//! One receive loop per stream feeds decoded messages to the router one at a
//! time. Router failures come back to the sender as [`SystemFrame`]s and never
//! end the stream; only transport failures, a clean close by the peer, or
//! server-side cancellation do.

use std::sync::Arc;

use courier_core::types::{InboundMessage, UserId};
use courier_core::{CourierError, MessageProcessor, RequestContext};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn, Instrument};

use crate::frame::{FrameError, SystemFrame};
use crate::session::{CloseReason, SessionState, StreamSession};
use crate::sink::{FrameSource, SerializedSink};

/// Connects streams to a [`MessageProcessor`].
#[derive(Clone)]
pub struct StreamBridge {
    processor: Arc<dyn MessageProcessor + Send + Sync>,
    system_sender_id: UserId,
}

impl StreamBridge {
    pub fn new(processor: Arc<dyn MessageProcessor + Send + Sync>, system_sender_id: UserId) -> Self {
        Self {
            processor,
            system_sender_id,
        }
    }

    pub fn system_sender_id(&self) -> UserId {
        self.system_sender_id
    }

    /// Run one stream until it closes.
    ///
    /// The receive loop runs in its own task and is raced against `cancel`.
    /// Cancelling aborts the loop; a message already handed to the router
    /// still finishes.
    pub async fn serve<S: FrameSource>(
        &self,
        session: StreamSession,
        source: S,
        sink: SerializedSink,
        cancel: CancellationToken,
    ) -> CloseReason {
        let span = tracing::info_span!(
            "stream",
            session_id = session.session_id(),
            peer = session.peer(),
        );

        let receive = ReceiveLoop {
            processor: Arc::clone(&self.processor),
            system_sender_id: self.system_sender_id,
            session_id: session.session_id().to_string(),
            sink,
            state: SessionState::Open,
        };

        let (done_tx, done_rx) = oneshot::channel();
        let handle = tokio::spawn(
            async move {
                let reason = receive.run(source).await;
                let _ = done_tx.send(reason);
            }
            .instrument(span.clone()),
        );

        let reason = tokio::select! {
            finished = done_rx => finished.unwrap_or_else(|_| {
                warn!(parent: &span, "receive loop exited without a close reason");
                CloseReason::TransportError
            }),
            () = cancel.cancelled() => {
                handle.abort();
                CloseReason::Cancelled
            }
        };

        let lifetime_ms = (chrono::Utc::now() - session.opened_at()).num_milliseconds();
        info!(parent: &span, reason = %reason, lifetime_ms, "stream closed");
        reason
    }
}

impl std::fmt::Debug for StreamBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBridge")
            .field("system_sender_id", &self.system_sender_id)
            .finish_non_exhaustive()
    }
}

struct ReceiveLoop {
    processor: Arc<dyn MessageProcessor + Send + Sync>,
    system_sender_id: UserId,
    session_id: String,
    sink: SerializedSink,
    state: SessionState,
}

impl ReceiveLoop {
    fn transition(&mut self, next: SessionState) {
        trace!(from = %self.state, to = %next, "stream state");
        self.state = next;
    }

    async fn run<S: FrameSource>(mut self, mut source: S) -> CloseReason {
        debug!("stream opened");
        let reason = loop {
            self.transition(SessionState::Receiving);
            let msg = match source.next_frame().await {
                None => break CloseReason::Normal,
                Some(Ok(msg)) => msg,
                Some(Err(FrameError::Malformed(detail))) => {
                    warn!(detail = %detail, "skipping malformed frame");
                    continue;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "stream read failed");
                    break CloseReason::TransportError;
                }
            };

            self.transition(SessionState::Processing);
            if let Err(reason) = self.process(msg).await {
                break reason;
            }
        };
        self.transition(SessionState::Closed(reason));
        reason
    }

    /// Hand one message to the router and answer failures.
    async fn process(&self, msg: InboundMessage) -> Result<(), CloseReason> {
        let processor = Arc::clone(&self.processor);
        let ctx = RequestContext::new().in_session(self.session_id.clone());
        let request = msg.clone();

        // Spawned so that aborting this loop leaves the call running.
        let outcome = tokio::spawn(async move { processor.process_message(&ctx, request).await }).await;

        let err = match outcome {
            Ok(Ok(result)) => {
                if !result.success {
                    info!(
                        message_id = %result.message_id,
                        failure_count = result.failure_count,
                        message = %result.message,
                        "message not delivered"
                    );
                }
                return Ok(());
            }
            Ok(Err(e)) => e,
            Err(join_err) => CourierError::Internal(format!("processing task failed: {join_err}")),
        };

        warn!(message_id = %msg.message_id, from = msg.from, error = %err, "processing failed");
        let frame = SystemFrame::error_for(&msg, self.system_sender_id, err.user_message());
        self.sink.send(&frame).await.map_err(|e| {
            warn!(error = %e, "failed to write error frame");
            CloseReason::TransportError
        })
    }
}
