// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory service traits: friendship, group membership, and user status.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{GroupId, GroupMember, UserId, UserStatus};

/// Answers friendship queries. Calls must be idempotent and side-effect-free.
#[async_trait]
pub trait FriendDirectory: Send + Sync + 'static {
    /// Whether `friend_id` is a friend of `user_id`.
    async fn is_friend(&self, user_id: UserId, friend_id: UserId) -> Result<bool, CourierError>;
}

/// Answers group membership and roster queries.
#[async_trait]
pub trait GroupDirectory: Send + Sync + 'static {
    /// Whether `user_id` belongs to `group_id`.
    async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, CourierError>;

    /// The full roster of `group_id`, in directory order.
    async fn members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, CourierError>;
}

/// Reports where (and whether) a user is connected.
#[async_trait]
pub trait StatusDirectory: Send + Sync + 'static {
    async fn status(&self, user_id: UserId) -> Result<UserStatus, CourierError>;
}
