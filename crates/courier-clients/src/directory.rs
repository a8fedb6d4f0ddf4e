// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for the friendship, group, and user-status services.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::model::DirectoryConfig;
use courier_core::types::{GroupId, GroupMember, UserId, UserStatus};
use courier_core::{CourierError, FriendDirectory, GroupDirectory, StatusDirectory};
use serde::Deserialize;

use crate::http::{JsonClient, Service};

#[derive(Debug, Deserialize)]
struct FriendResponse {
    is_friend: bool,
}

#[derive(Debug, Deserialize)]
struct MemberResponse {
    is_member: bool,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    members: Vec<GroupMember>,
}

fn timeout_of(config: &DirectoryConfig) -> Duration {
    Duration::from_millis(config.request_timeout_ms)
}

/// Friendship lookups over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFriendDirectory {
    http: JsonClient,
}

impl HttpFriendDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        Ok(Self {
            http: JsonClient::new(Service::Friends, base_url, timeout)?,
        })
    }

    pub fn from_config(config: &DirectoryConfig) -> Result<Self, CourierError> {
        Self::new(&config.friends_url, timeout_of(config))
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl FriendDirectory for HttpFriendDirectory {
    async fn is_friend(&self, user_id: UserId, friend_id: UserId) -> Result<bool, CourierError> {
        let resp: FriendResponse = self
            .http
            .get_json(&format!("/v1/friends/{user_id}/{friend_id}"))
            .await?;
        Ok(resp.is_friend)
    }
}

/// Group membership and roster lookups over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGroupDirectory {
    http: JsonClient,
}

impl HttpGroupDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        Ok(Self {
            http: JsonClient::new(Service::Groups, base_url, timeout)?,
        })
    }

    pub fn from_config(config: &DirectoryConfig) -> Result<Self, CourierError> {
        Self::new(&config.groups_url, timeout_of(config))
    }
}

#[async_trait]
impl GroupDirectory for HttpGroupDirectory {
    async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, CourierError> {
        let resp: MemberResponse = self
            .http
            .get_json(&format!("/v1/groups/{group_id}/members/{user_id}"))
            .await?;
        Ok(resp.is_member)
    }

    async fn members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, CourierError> {
        let resp: MembersResponse = self
            .http
            .get_json(&format!("/v1/groups/{group_id}/members"))
            .await?;
        Ok(resp.members)
    }
}

/// User presence lookups over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatusDirectory {
    http: JsonClient,
}

impl HttpStatusDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        Ok(Self {
            http: JsonClient::new(Service::Status, base_url, timeout)?,
        })
    }

    /// `None` when no status service is configured.
    pub fn from_config(config: &DirectoryConfig) -> Result<Option<Self>, CourierError> {
        config
            .status_url
            .as_deref()
            .map(|url| Self::new(url, timeout_of(config)))
            .transpose()
    }
}

#[async_trait]
impl StatusDirectory for HttpStatusDirectory {
    async fn status(&self, user_id: UserId) -> Result<UserStatus, CourierError> {
        self.http
            .get_json(&format!("/v1/users/{user_id}/status"))
            .await
    }
}
