// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the delivery broker's publish endpoint.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::types::DeliveryEnvelope;
use courier_core::{CourierError, DeliveryQueue};

use crate::http::{JsonClient, Service};

/// Publishes envelopes with `POST /v1/topics/{topic}`. Never retries.
#[derive(Debug, Clone)]
pub struct HttpDeliveryQueue {
    http: JsonClient,
}

impl HttpDeliveryQueue {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        Ok(Self {
            http: JsonClient::new(Service::Broker, base_url, timeout)?,
        })
    }
}

#[async_trait]
impl DeliveryQueue for HttpDeliveryQueue {
    async fn publish(&self, topic: &str, envelope: &DeliveryEnvelope) -> Result<(), CourierError> {
        self.http
            .post_json(&format!("/v1/topics/{topic}"), envelope)
            .await
    }
}
