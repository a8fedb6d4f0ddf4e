// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/messages, GET /health, GET /metrics.

use std::sync::atomic::Ordering;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use courier_core::types::InboundMessage;
use courier_core::{CourierError, RequestContext};
use serde::Serialize;

use crate::server::GatewayState;

/// Header carrying a caller-chosen request id for log correlation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    pub uptime_secs: u64,
    pub active_streams: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Client-safe error description.
    pub error: String,
}

/// HTTP status for a routing error.
pub fn status_for(err: &CourierError) -> StatusCode {
    match err {
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        CourierError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        CourierError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: &CourierError) -> Response {
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
        .into_response()
}

/// POST /v1/messages
///
/// Routes one message and returns its `FanOutResult`. Authorization denials
/// are a 200 with `success: false`.
pub async fn post_messages(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(msg): Json<InboundMessage>,
) -> Response {
    let ctx = match headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) if !id.is_empty() => RequestContext::with_request_id(id),
        _ => RequestContext::new(),
    }
    .with_cancellation(state.shutdown.child_token());

    let outcome = tokio::time::timeout(
        state.request_timeout,
        state.processor.process_message(&ctx, msg),
    )
    .await
    .unwrap_or(Err(CourierError::Timeout {
        duration: state.request_timeout,
    }));

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(request_id = ctx.request_id(), error = %e, "message rejected");
            } else {
                tracing::warn!(request_id = ctx.request_id(), error = %e, "message routing failed");
            }
            error_response(&e)
        }
    }
}

/// GET /health
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        active_streams: state.health.active_streams.load(Ordering::Relaxed),
    })
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when no recorder is installed.
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let invalid = CourierError::InvalidTarget {
            reason: "no target".into(),
        };
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&CourierError::directory("groups", "down")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&CourierError::Timeout {
                duration: std::time::Duration::from_secs(1)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&CourierError::Cancelled),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"something went wrong"}"#);
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            active_streams: 3,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"active_streams\":3"));
    }
}
