// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier serve` implementation.
//!
//! Wires the collaborator clients into the router, the router into the
//! streaming bridge, and both into the gateway, then serves until a shutdown
//! signal arrives.

use std::sync::Arc;
use std::time::Duration;

use courier_bridge::StreamBridge;
use courier_clients::{
    HttpDeliveryQueue, HttpFriendDirectory, HttpGroupDirectory, HttpMessageStore,
    HttpStatusDirectory, InMemoryQueue,
};
use courier_config::model::CourierConfig;
use courier_core::{CourierError, DeliveryQueue, MessageProcessor, StatusDirectory};
use courier_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use courier_router::{Collaborators, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Run the router and gateway until SIGINT/SIGTERM.
pub async fn run_serve(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing(&config.service.log_level);

    info!(
        name = %config.service.name,
        delivery_topic = %config.router.delivery_topic,
        route_by_node = config.router.route_by_node,
        "starting courier serve"
    );

    let render = install_metrics();
    let cancel = shutdown::install_signal_handler();
    let state = build_state(&config, render, cancel)?;

    courier_gateway::start_server(&ServerConfig::from(&config.gateway), state).await?;

    info!("courier stopped");
    Ok(())
}

/// Build the HTTP collaborators described by `config`.
///
/// Without a broker URL envelopes go to an in-process queue.
pub fn build_collaborators(config: &CourierConfig) -> Result<Collaborators, CourierError> {
    let dir_timeout = Duration::from_millis(config.directory.request_timeout_ms);

    let queue: Arc<dyn DeliveryQueue + Send + Sync> = match &config.broker.url {
        Some(url) => Arc::new(HttpDeliveryQueue::new(url, dir_timeout)?),
        None => {
            info!(
                capacity = config.broker.capacity,
                "no broker configured, using in-process queue"
            );
            Arc::new(InMemoryQueue::new(config.broker.capacity))
        }
    };

    let status = HttpStatusDirectory::from_config(&config.directory)?
        .map(|s| Arc::new(s) as Arc<dyn StatusDirectory + Send + Sync>);
    if status.is_some() && !config.router.route_by_node {
        warn!("directory.status_url is set but router.route_by_node is off, status is unused");
    }

    Ok(Collaborators {
        friends: Arc::new(HttpFriendDirectory::from_config(&config.directory)?),
        groups: Arc::new(HttpGroupDirectory::from_config(&config.directory)?),
        store: Arc::new(HttpMessageStore::new(
            &config.store.url,
            Duration::from_millis(config.router.persist_timeout_ms),
        )?),
        queue,
        status,
    })
}

/// Assemble the gateway state: router, bridge, auth, and health.
pub fn build_state(
    config: &CourierConfig,
    render: Option<RenderFn>,
    cancel: CancellationToken,
) -> Result<GatewayState, CourierError> {
    let router = Router::new(&config.router, build_collaborators(config)?)?;
    let processor: Arc<dyn MessageProcessor + Send + Sync> = Arc::new(router);
    let bridge = StreamBridge::new(processor.clone(), config.router.system_sender_id);

    if config.gateway.bearer_token.is_none() {
        warn!("gateway.bearer_token is not set, every /v1 and /ws request will be rejected");
    }

    Ok(GatewayState::new(
        processor,
        bridge,
        AuthConfig::new(config.gateway.bearer_token.clone()),
        cancel,
    )
    .with_health(HealthState::new(render))
    .with_request_timeout(Duration::from_millis(config.gateway.request_timeout_ms)))
}

/// Install the Prometheus recorder and return its render function.
///
/// Metrics stay disabled (and `/metrics` returns 404) if a recorder is
/// already installed.
fn install_metrics() -> Option<RenderFn> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            courier_router::recording::register_metrics();
            courier_gateway::ws::register_metrics();
            Some(Arc::new(move || handle.render()))
        }
        Err(e) => {
            warn!(error = %e, "failed to install prometheus recorder, metrics disabled");
            None
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("courier={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_collaborators() {
        let config = CourierConfig::default();
        let collaborators = build_collaborators(&config).unwrap();
        assert!(collaborators.status.is_none());
    }

    #[test]
    fn status_client_built_when_configured() {
        let mut config = CourierConfig::default();
        config.directory.status_url = Some("http://127.0.0.1:7104".into());
        config.router.route_by_node = true;
        let collaborators = build_collaborators(&config).unwrap();
        assert!(collaborators.status.is_some());
    }

    #[test]
    fn broker_url_selects_http_queue() {
        let mut config = CourierConfig::default();
        config.broker.url = Some("http://127.0.0.1:7105".into());
        assert!(build_collaborators(&config).is_ok());
    }

    #[tokio::test]
    async fn state_carries_gateway_settings() {
        let mut config = CourierConfig::default();
        config.gateway.bearer_token = Some("secret".into());
        config.gateway.request_timeout_ms = 1_500;

        let state = build_state(&config, None, CancellationToken::new()).unwrap();
        assert!(state.auth.accepts(Some("secret")));
        assert_eq!(state.request_timeout, Duration::from_millis(1_500));
        assert_eq!(state.bridge.system_sender_id(), courier_core::SYSTEM_SENDER_ID);
        assert!(state.health.prometheus_render.is_none());
    }

    #[tokio::test]
    async fn node_routing_without_status_is_rejected() {
        let mut config = CourierConfig::default();
        config.router.route_by_node = true;
        let err = build_state(&config, None, CancellationToken::new()).err().unwrap();
        assert!(matches!(err, CourierError::Config(_)));
    }
}
