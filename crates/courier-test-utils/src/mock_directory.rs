// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory friend, group, and status directories that record every call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_core::types::{GroupId, GroupMember, UserId, UserStatus};
use courier_core::{CourierError, FriendDirectory, GroupDirectory, StatusDirectory};

/// Friendship lookups backed by a fixed set of pairs.
#[derive(Default)]
pub struct MockFriendDirectory {
    pairs: HashSet<(UserId, UserId)>,
    unavailable: bool,
    calls: Arc<Mutex<Vec<(UserId, UserId)>>>,
}

impl MockFriendDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `a` and `b` friends of each other.
    pub fn with_friends(mut self, a: UserId, b: UserId) -> Self {
        self.pairs.insert((a, b));
        self.pairs.insert((b, a));
        self
    }

    /// Every lookup fails.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// `(user_id, friend_id)` of every lookup, in call order.
    pub async fn calls(&self) -> Vec<(UserId, UserId)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl FriendDirectory for MockFriendDirectory {
    async fn is_friend(&self, user_id: UserId, friend_id: UserId) -> Result<bool, CourierError> {
        self.calls.lock().await.push((user_id, friend_id));
        if self.unavailable {
            return Err(CourierError::directory("friends", "mock friend directory unavailable"));
        }
        Ok(self.pairs.contains(&(user_id, friend_id)))
    }
}

/// Group membership and rosters backed by a fixed map.
#[derive(Default)]
pub struct MockGroupDirectory {
    groups: HashMap<GroupId, Vec<GroupMember>>,
    membership_unavailable: bool,
    roster_unavailable: bool,
    member_checks: Arc<Mutex<Vec<(GroupId, UserId)>>>,
    roster_fetches: Arc<Mutex<Vec<GroupId>>>,
}

impl MockGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `group_id` with `members` in roster order.
    pub fn with_group(mut self, group_id: GroupId, members: &[UserId]) -> Self {
        self.groups
            .insert(group_id, members.iter().copied().map(GroupMember::new).collect());
        self
    }

    /// Define `group_id` with an explicit roster, duplicates included.
    pub fn with_roster(mut self, group_id: GroupId, roster: Vec<GroupMember>) -> Self {
        self.groups.insert(group_id, roster);
        self
    }

    /// Membership checks fail.
    pub fn membership_unavailable(mut self) -> Self {
        self.membership_unavailable = true;
        self
    }

    /// Roster fetches fail; membership checks still answer.
    pub fn roster_unavailable(mut self) -> Self {
        self.roster_unavailable = true;
        self
    }

    pub async fn member_checks(&self) -> Vec<(GroupId, UserId)> {
        self.member_checks.lock().await.clone()
    }

    pub async fn roster_fetches(&self) -> Vec<GroupId> {
        self.roster_fetches.lock().await.clone()
    }
}

#[async_trait]
impl GroupDirectory for MockGroupDirectory {
    async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, CourierError> {
        self.member_checks.lock().await.push((group_id, user_id));
        if self.membership_unavailable {
            return Err(CourierError::directory("groups", "mock group directory unavailable"));
        }
        Ok(self
            .groups
            .get(&group_id)
            .is_some_and(|roster| roster.iter().any(|m| m.user_id == user_id)))
    }

    async fn members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, CourierError> {
        self.roster_fetches.lock().await.push(group_id);
        if self.roster_unavailable {
            return Err(CourierError::directory("groups", "mock roster unavailable"));
        }
        Ok(self.groups.get(&group_id).cloned().unwrap_or_default())
    }
}

/// Presence lookups. Unknown users are offline.
#[derive(Default)]
pub struct MockStatusDirectory {
    statuses: HashMap<UserId, UserStatus>,
    failing: HashSet<UserId>,
    calls: Arc<Mutex<Vec<UserId>>>,
}

impl MockStatusDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `user_id` online at `node`.
    pub fn online(mut self, user_id: UserId, node: impl Into<String>) -> Self {
        self.statuses.insert(
            user_id,
            UserStatus {
                online: true,
                node: Some(node.into()),
            },
        );
        self
    }

    /// Lookups for `user_id` fail.
    pub fn failing_for(mut self, user_id: UserId) -> Self {
        self.failing.insert(user_id);
        self
    }

    pub async fn calls(&self) -> Vec<UserId> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl StatusDirectory for MockStatusDirectory {
    async fn status(&self, user_id: UserId) -> Result<UserStatus, CourierError> {
        self.calls.lock().await.push(user_id);
        if self.failing.contains(&user_id) {
            return Err(CourierError::directory("status", "mock status lookup failed"));
        }
        Ok(self.statuses.get(&user_id).cloned().unwrap_or_default())
    }
}
