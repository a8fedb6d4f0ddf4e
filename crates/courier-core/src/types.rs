// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, the streaming bridge, and the clients.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Platform user identifier. Zero never names a real user.
pub type UserId = u64;

/// Platform group identifier. Zero means "not group-addressed".
pub type GroupId = u64;

/// Reserved sender id stamped on frames the system originates.
pub const SYSTEM_SENDER_ID: UserId = 0;

/// Kind of payload carried by a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Audio,
    Video,
    File,
}

/// The unit of work entering the routing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Caller-supplied opaque identifier.
    pub message_id: String,
    /// Sender id; must be non-zero.
    pub from: UserId,
    /// Recipient id, 0 when group-addressed.
    #[serde(default)]
    pub to: UserId,
    /// Target group, 0 when user-addressed.
    #[serde(default)]
    pub group_id: GroupId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub message_type: MessageType,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Client correlation token echoed on delivery.
    #[serde(default)]
    pub ack_id: String,
}

/// Addressing mode of a validated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// One-to-one message.
    Private { to: UserId },
    /// Group message, fanned out to the roster minus the sender.
    Group { group_id: GroupId },
}

impl Route {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Private { .. } => "private",
            Route::Group { .. } => "group",
        }
    }
}

/// The per-recipient unit published to the delivery queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// User this copy is delivered to.
    pub target: UserId,
    pub message_id: String,
    pub from: UserId,
    /// Group context; 0 for private messages.
    pub group_id: GroupId,
    pub content: String,
    pub message_type: MessageType,
    pub timestamp: i64,
    pub ack_id: String,
}

impl DeliveryEnvelope {
    /// Build the copy of `msg` addressed to `target`.
    pub fn for_target(msg: &InboundMessage, target: UserId) -> Self {
        Self {
            target,
            message_id: msg.message_id.clone(),
            from: msg.from,
            group_id: msg.group_id,
            content: msg.content.clone(),
            message_type: msg.message_type,
            timestamp: msg.timestamp,
            ack_id: msg.ack_id.clone(),
        }
    }
}

/// Aggregate outcome of routing one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutResult {
    /// True iff at least one recipient was enqueued.
    pub success: bool,
    /// Human-readable summary for the sender.
    pub message: String,
    pub message_id: String,
    pub success_count: usize,
    pub failure_count: usize,
    /// Recipients whose enqueue failed, in roster order.
    pub failed_users: Vec<UserId>,
}

impl FanOutResult {
    /// Negative outcome for a sender that is not allowed to reach the target.
    pub fn denied(message_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            message_id: message_id.into(),
            success_count: 0,
            failure_count: 1,
            failed_users: Vec::new(),
        }
    }

    /// Number of recipients an enqueue was attempted for.
    pub fn attempted(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// Role of a user inside a group.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

/// One entry of a group roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    #[serde(default)]
    pub role: MemberRole,
}

impl GroupMember {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            role: MemberRole::Member,
        }
    }
}

/// Presence as reported by the user-status directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub online: bool,
    /// Edge node currently holding the user's socket, when online.
    #[serde(default)]
    pub node: Option<String>,
}
