// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier message router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Courier configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Routing and fan-out behavior.
    #[serde(default)]
    pub router: RouterConfig,

    /// Directory service endpoints (friendship, groups, status).
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Message store endpoint.
    #[serde(default)]
    pub store: StoreConfig,

    /// Delivery broker endpoint.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Edge gateway (HTTP + WebSocket) settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Instance name, reported by `/health`.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "courier".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Routing orchestrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Broker topic delivery envelopes are published to.
    #[serde(default = "default_delivery_topic")]
    pub delivery_topic: String,

    /// Upper bound for one detached persistence call, in milliseconds.
    #[serde(default = "default_persist_timeout_ms")]
    pub persist_timeout_ms: u64,

    /// Key the delivery topic by the recipient's edge node
    /// (`{delivery_topic}.{node}`). Requires `directory.status_url`.
    #[serde(default)]
    pub route_by_node: bool,

    /// Sender id stamped on system-originated frames. Must stay 0: every
    /// non-zero id is a potential user id.
    #[serde(default)]
    pub system_sender_id: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            delivery_topic: default_delivery_topic(),
            persist_timeout_ms: default_persist_timeout_ms(),
            route_by_node: false,
            system_sender_id: 0,
        }
    }
}

fn default_delivery_topic() -> String {
    "courier.delivery".to_string()
}

fn default_persist_timeout_ms() -> u64 {
    5_000
}

/// Directory service endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Base URL of the friendship service.
    #[serde(default = "default_friends_url")]
    pub friends_url: String,

    /// Base URL of the group service.
    #[serde(default = "default_groups_url")]
    pub groups_url: String,

    /// Base URL of the user-status service. `None` disables status lookups.
    #[serde(default)]
    pub status_url: Option<String>,

    /// Per-call timeout for directory requests, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            friends_url: default_friends_url(),
            groups_url: default_groups_url(),
            status_url: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_friends_url() -> String {
    "http://127.0.0.1:7101".to_string()
}

fn default_groups_url() -> String {
    "http://127.0.0.1:7102".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3_000
}

/// Message store endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the message store service.
    #[serde(default = "default_store_url")]
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
        }
    }
}

fn default_store_url() -> String {
    "http://127.0.0.1:7103".to_string()
}

/// Delivery broker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Base URL of the broker's REST publish endpoint.
    /// `None` selects the in-process queue.
    #[serde(default)]
    pub url: Option<String>,

    /// Buffer size per topic for the in-process queue.
    #[serde(default = "default_broker_capacity")]
    pub capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: None,
            capacity: default_broker_capacity(),
        }
    }
}

fn default_broker_capacity() -> usize {
    1024
}

/// Edge gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on `/v1/*` and `/ws`. `None` rejects every
    /// authenticated request.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Upper bound on one `POST /v1/messages` call, in milliseconds.
    #[serde(default = "default_gateway_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
            request_timeout_ms: default_gateway_request_timeout_ms(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    7100
}

fn default_gateway_request_timeout_ms() -> u64 {
    30_000
}
