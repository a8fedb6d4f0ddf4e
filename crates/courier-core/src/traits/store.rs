// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message store trait for the external persistence service.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::InboundMessage;

/// Durable record of accepted messages.
///
/// Delivery is at-least-once; implementations and the service behind them
/// must tolerate the same message being persisted twice.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    async fn persist(&self, msg: &InboundMessage) -> Result<(), CourierError>;
}
