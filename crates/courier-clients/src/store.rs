// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the message store.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::types::InboundMessage;
use courier_core::{CourierError, MessageStore};

use crate::http::{JsonClient, Service};

/// Persists messages with `POST /v1/messages`.
///
/// The store must tolerate duplicates; a retried request may persist the same
/// message twice.
#[derive(Debug, Clone)]
pub struct HttpMessageStore {
    http: JsonClient,
}

impl HttpMessageStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        Ok(Self {
            http: JsonClient::new(Service::Store, base_url, timeout)?,
        })
    }
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn persist(&self, msg: &InboundMessage) -> Result<(), CourierError> {
        self.http.post_json("/v1/messages", msg).await
    }
}
