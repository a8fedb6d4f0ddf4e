// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP and WebSocket edge for Courier.
//!
//! Exposes the router over a unary REST endpoint and a long-lived WebSocket
//! stream driven by the streaming bridge, plus unauthenticated health and
//! Prometheus endpoints.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod ws;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, serve, start_server};
