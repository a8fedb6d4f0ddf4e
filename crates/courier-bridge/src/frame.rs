// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire frames exchanged over a stream.
//!
//! Inbound frames are JSON-encoded [`InboundMessage`]s. Outbound frames are
//! [`SystemFrame`]s, written only when processing a message fails.

use courier_core::types::{InboundMessage, UserId};
use serde::{Deserialize, Serialize};

/// Errors raised by a stream transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The payload could not be decoded. The stream stays usable.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The underlying connection failed. The stream is unusable.
    #[error("transport error: {0}")]
    Transport(String),
}

impl FrameError {
    /// Whether the stream can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrameError::Malformed(_))
    }
}

/// Reply written back to the sender on behalf of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFrame {
    pub message_id: String,
    /// Always the reserved system sender id.
    pub from: UserId,
    /// The original sender.
    pub to: UserId,
    pub content: String,
    /// Unix millis at which the frame was built.
    pub timestamp: i64,
}

impl SystemFrame {
    /// Error reply for `msg`, addressed back to its sender.
    pub fn error_for(msg: &InboundMessage, system_sender_id: UserId, content: impl Into<String>) -> Self {
        Self {
            message_id: msg.message_id.clone(),
            from: system_sender_id,
            to: msg.from,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to_json(&self) -> Result<String, FrameError> {
        serde_json::to_string(self).map_err(|e| FrameError::Malformed(e.to_string()))
    }
}

/// Decode one text frame into an inbound message.
pub fn decode_frame(text: &str) -> Result<InboundMessage, FrameError> {
    serde_json::from_str(text).map_err(|e| FrameError::Malformed(e.to_string()))
}
