// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted stream transport for bridge tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_bridge::{FrameError, FrameSink, FrameSource, SystemFrame};
use courier_core::types::InboundMessage;

/// One step of a scripted inbound stream.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Frame(InboundMessage),
    Malformed(String),
    /// The connection drops.
    Disconnect,
    /// The peer never sends anything again.
    Stall,
}

/// Frame source replaying a script, then ending cleanly.
pub struct ScriptedSource {
    steps: VecDeque<ScriptStep>,
    reads: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            reads: Arc::default(),
        }
    }

    /// Shared counter of `next_frame` calls.
    pub fn reads(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.reads)
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn next_frame(&mut self) -> Option<Result<InboundMessage, FrameError>> {
        *self.reads.lock().await += 1;
        match self.steps.pop_front()? {
            ScriptStep::Frame(msg) => Some(Ok(msg)),
            ScriptStep::Malformed(detail) => Some(Err(FrameError::Malformed(detail))),
            ScriptStep::Disconnect => Some(Err(FrameError::Transport(
                "connection reset by peer".to_string(),
            ))),
            ScriptStep::Stall => std::future::pending().await,
        }
    }
}

/// Frame sink capturing written frames.
#[derive(Clone, Default)]
pub struct CapturingSink {
    frames: Arc<Mutex<Vec<SystemFrame>>>,
    broken: bool,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub async fn frames(&self) -> Vec<SystemFrame> {
        self.frames.lock().await.clone()
    }
}

#[async_trait]
impl FrameSink for CapturingSink {
    async fn send_frame(&mut self, frame: &SystemFrame) -> Result<(), FrameError> {
        if self.broken {
            return Err(FrameError::Transport("broken pipe".to_string()));
        }
        self.frames.lock().await.push(frame.clone());
        Ok(())
    }
}
