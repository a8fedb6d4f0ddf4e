// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport seams for a stream: the frame source the receive loop reads and
//! the sink replies are written to.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::types::InboundMessage;
use tokio::sync::Mutex;

use crate::frame::{FrameError, SystemFrame};

/// Inbound half of a stream.
#[async_trait]
pub trait FrameSource: Send + 'static {
    /// Next decoded frame.
    ///
    /// `None` means the peer closed the stream cleanly.
    async fn next_frame(&mut self) -> Option<Result<InboundMessage, FrameError>>;
}

/// Outbound half of a stream.
#[async_trait]
pub trait FrameSink: Send + 'static {
    async fn send_frame(&mut self, frame: &SystemFrame) -> Result<(), FrameError>;
}

/// Shareable sink that writes at most one frame at a time.
#[derive(Clone)]
pub struct SerializedSink {
    inner: Arc<Mutex<Box<dyn FrameSink>>>,
}

impl SerializedSink {
    pub fn new(sink: impl FrameSink) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    pub async fn send(&self, frame: &SystemFrame) -> Result<(), FrameError> {
        self.inner.lock().await.send_frame(frame).await
    }
}

impl std::fmt::Debug for SerializedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializedSink").finish_non_exhaustive()
    }
}
