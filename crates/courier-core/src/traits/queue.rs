// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery queue trait for the broker feeding edge nodes.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::DeliveryEnvelope;

/// Publishes per-recipient envelopes for downstream real-time push.
///
/// A failed publish is reported once; the router never retries it.
#[async_trait]
pub trait DeliveryQueue: Send + Sync + 'static {
    async fn publish(&self, topic: &str, envelope: &DeliveryEnvelope) -> Result<(), CourierError>;
}
