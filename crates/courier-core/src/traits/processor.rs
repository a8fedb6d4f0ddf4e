// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The entry point exposed by the routing core to its transports.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::CourierError;
use crate::types::{FanOutResult, InboundMessage};

/// Routes one inbound message and reports the aggregate outcome.
///
/// Used by the unary HTTP handler and by the streaming bridge, neither of
/// which depends on the concrete router.
#[async_trait]
pub trait MessageProcessor: Send + Sync + 'static {
    async fn process_message(
        &self,
        ctx: &RequestContext,
        msg: InboundMessage,
    ) -> Result<FanOutResult, CourierError>;
}
