// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery topic selection.
//!
//! With node routing enabled, envelopes for online users go to
//! `{base}.{node}` so the edge node holding the socket consumes them
//! directly; offline users go to `{base}.offline`.

use std::sync::Arc;

use courier_core::types::{UserId, UserStatus};
use courier_core::{RequestContext, StatusDirectory};
use tracing::debug;

/// Suffix of the topic collecting envelopes for offline users.
pub const OFFLINE_SUFFIX: &str = "offline";

/// Picks the broker topic for one recipient.
#[derive(Clone)]
pub struct TopicResolver {
    base: String,
    status: Option<Arc<dyn StatusDirectory + Send + Sync>>,
}

impl TopicResolver {
    /// Every envelope goes to `base`.
    pub fn fixed(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            status: None,
        }
    }

    /// Key topics by the recipient's edge node.
    pub fn by_node(base: impl Into<String>, status: Arc<dyn StatusDirectory + Send + Sync>) -> Self {
        Self {
            base: base.into(),
            status: Some(status),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Topic for `target`.
    ///
    /// A failed status lookup, or an online user with no known node, falls
    /// back to the base topic; it never fails the delivery.
    pub async fn resolve(&self, ctx: &RequestContext, target: UserId) -> String {
        let Some(status) = &self.status else {
            return self.base.clone();
        };

        match ctx.run(status.status(target)).await {
            Ok(UserStatus {
                online: true,
                node: Some(node),
            }) if !node.is_empty() => format!("{}.{node}", self.base),
            Ok(UserStatus { online: false, .. }) => format!("{}.{OFFLINE_SUFFIX}", self.base),
            // Online without a known node.
            Ok(_) => self.base.clone(),
            Err(e) => {
                debug!(user_id = target, error = %e, "status lookup failed, using base topic");
                self.base.clone()
            }
        }
    }
}

impl std::fmt::Debug for TopicResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicResolver")
            .field("base", &self.base)
            .field("by_node", &self.status.is_some())
            .finish()
    }
}
