// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared JSON-over-HTTP plumbing for the collaborator clients.

use std::time::Duration;

use courier_core::CourierError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which collaborator a client talks to. Decides how failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Friends,
    Groups,
    Status,
    Store,
    Broker,
}

impl Service {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Service::Friends => "friends",
            Service::Groups => "groups",
            Service::Status => "status",
            Service::Store => "store",
            Service::Broker => "broker",
        }
    }

    fn error(self, message: String, source: Option<BoxError>) -> CourierError {
        match self {
            Service::Friends | Service::Groups | Service::Status => {
                CourierError::DirectoryUnavailable {
                    service: self.name(),
                    message,
                    source,
                }
            }
            Service::Store => CourierError::Store { message, source },
            Service::Broker => CourierError::Queue { message, source },
        }
    }
}

/// Pooled reqwest client bound to one collaborator's base URL.
#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    client: reqwest::Client,
    base_url: String,
    service: Service,
}

impl JsonClient {
    pub(crate) fn new(
        service: Service,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CourierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CourierError::Config(format!(
                    "failed to build {} HTTP client: {e}",
                    service.name()
                ))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CourierError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;
        let response = self.check_status(response).await?;
        response.json::<T>().await.map_err(|e| {
            self.service.error(
                format!("failed to parse response from {url}: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), CourierError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;
        self.check_status(response).await?;
        Ok(())
    }

    fn request_failed(&self, e: reqwest::Error) -> CourierError {
        let message = if e.is_timeout() {
            format!("{} request timed out", self.service.name())
        } else {
            format!("{} request failed: {e}", self.service.name())
        };
        self.service.error(message, Some(Box::new(e)))
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CourierError> {
        let status = response.status();
        debug!(service = self.service.name(), status = %status, "collaborator responded");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(self
            .service
            .error(format!("{} returned {status}: {body}", self.service.name()), None))
    }
}
