// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped context threaded explicitly through the routing pipeline.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::CourierError;

/// Per-request identifiers and the cancellation scope of the request.
///
/// Directory and queue calls on the request path are raced against
/// [`cancellation`](Self::cancellation). Work that must outlive the request
/// (message persistence) does not take this token.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    session_id: Option<String>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// A fresh context with a random request id and its own cancellation token.
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            session_id: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A context with an explicit request id.
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::new()
        }
    }

    /// Attach the streaming session this request arrived on.
    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Replace the cancellation token (e.g. with a child of a channel token).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` to completion unless the request is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, CourierError>
    where
        F: Future<Output = Result<T, CourierError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CourierError::Cancelled),
            out = fut => out,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
