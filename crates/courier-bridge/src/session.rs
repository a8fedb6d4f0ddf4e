// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-stream session identity and lifecycle states.

use chrono::{DateTime, Utc};

/// State of a stream's receive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Channel established, nothing read yet.
    Open,
    /// Waiting for the next inbound frame.
    Receiving,
    /// Handing a message to the router.
    Processing,
    /// Terminal.
    Closed(CloseReason),
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Open => write!(f, "open"),
            SessionState::Receiving => write!(f, "receiving"),
            SessionState::Processing => write!(f, "processing"),
            SessionState::Closed(reason) => write!(f, "closed({reason})"),
        }
    }
}

/// Why a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer ended the stream.
    Normal,
    /// Reading or writing the transport failed.
    TransportError,
    /// The stream was cancelled from the server side.
    Cancelled,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::Normal => write!(f, "normal"),
            CloseReason::TransportError => write!(f, "transport_error"),
            CloseReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One live stream. Carries identity only, no message state.
#[derive(Debug, Clone)]
pub struct StreamSession {
    session_id: String,
    peer: String,
    opened_at: DateTime<Utc>,
}

impl StreamSession {
    /// New session for an authenticated `peer`.
    pub fn new(peer: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            peer: peer.into(),
            opened_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}
