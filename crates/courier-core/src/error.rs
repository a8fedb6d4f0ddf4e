// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier message router.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across collaborator traits and the routing core.
///
/// Authorization denials (not a friend, not a group member) are deliberately
/// absent: they are business outcomes carried by
/// [`FanOutResult`](crate::types::FanOutResult), not errors.
#[derive(Debug, Error)]
pub enum CourierError {
    /// The sender id is missing or zero.
    #[error("invalid sender: {reason}")]
    InvalidSender { reason: String },

    /// Addressing is malformed (no target, or both a user and a group target).
    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// A directory lookup (friendship, membership, roster, status) failed.
    #[error("{service} directory unavailable: {message}")]
    DirectoryUnavailable {
        service: &'static str,
        message: String,
        source: Option<BoxError>,
    },

    /// Publishing a delivery envelope to the broker failed.
    #[error("delivery queue error: {message}")]
    Queue {
        message: String,
        source: Option<BoxError>,
    },

    /// The external message store rejected or failed a persist call.
    #[error("message store error: {message}")]
    Store {
        message: String,
        source: Option<BoxError>,
    },

    /// Streaming transport failure (read, write, or framing).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<BoxError>,
    },

    /// The request's cancellation token fired before the work completed.
    #[error("request cancelled")]
    Cancelled,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CourierError {
    /// Shorthand for a directory failure without an underlying source.
    pub fn directory(service: &'static str, message: impl Into<String>) -> Self {
        CourierError::DirectoryUnavailable {
            service,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a queue failure without an underlying source.
    pub fn queue(message: impl Into<String>) -> Self {
        CourierError::Queue {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a transport failure without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        CourierError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the error was caused by the caller's input rather than by
    /// infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CourierError::InvalidSender { .. } | CourierError::InvalidTarget { .. }
        )
    }

    /// A message safe to return to untrusted clients.
    ///
    /// Validation errors describe the caller's mistake; everything else is
    /// collapsed into a generic string so collaborator detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CourierError::InvalidSender { reason } | CourierError::InvalidTarget { reason } => {
                reason.clone()
            }
            CourierError::DirectoryUnavailable { .. } => {
                "message could not be routed, please retry later".to_string()
            }
            CourierError::Cancelled => "request cancelled".to_string(),
            CourierError::Timeout { .. } => "request timed out".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        let sender = CourierError::InvalidSender {
            reason: "sender id must be non-zero".into(),
        };
        let target = CourierError::InvalidTarget {
            reason: "no target".into(),
        };
        assert!(sender.is_client_error());
        assert!(target.is_client_error());
        assert!(!CourierError::directory("group", "down").is_client_error());
        assert!(!CourierError::Cancelled.is_client_error());
    }

    #[test]
    fn user_message_hides_collaborator_detail() {
        let err = CourierError::DirectoryUnavailable {
            service: "group",
            message: "connect to 10.0.0.7:8080 refused".into(),
            source: Some(Box::new(std::io::Error::other("refused"))),
        };
        let msg = err.user_message();
        assert!(!msg.contains("10.0.0.7"));
        assert!(!msg.contains("refused"));
        assert!(err.to_string().contains("10.0.0.7"));
    }

    #[test]
    fn user_message_keeps_validation_reason() {
        let err = CourierError::InvalidTarget {
            reason: "message must address exactly one of `to` or `group_id`".into(),
        };
        assert!(err.user_message().contains("exactly one"));
    }

    #[test]
    fn display_includes_service_name() {
        let err = CourierError::directory("friend", "timeout");
        assert_eq!(err.to_string(), "friend directory unavailable: timeout");
    }
}
