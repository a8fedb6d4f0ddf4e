// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication for the gateway.
//!
//! When no token is configured, every protected request is rejected
//! (fail-closed).

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token. `None` rejects everything.
    pub bearer_token: Option<String>,
}

impl AuthConfig {
    pub fn new(bearer_token: Option<String>) -> Self {
        Self { bearer_token }
    }

    /// Check a presented token against the configured one.
    pub fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.bearer_token, presented) {
            (Some(expected), Some(token)) => token == expected,
            _ => false,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token from a percent-decoded `token=<token>` query parameter. Browsers
/// cannot set headers on a WebSocket handshake.
pub fn token_from_uri(uri: &Uri) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(uri).ok()?.0.token
}

/// Middleware for REST routes: header token only.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.bearer_token.is_none() {
        tracing::error!("gateway has no bearer token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }
    if auth.accepts(bearer_from_headers(request.headers())) {
        return Ok(next.run(request).await);
    }
    Err(StatusCode::UNAUTHORIZED)
}

/// Middleware for the WebSocket route: header token, then query token.
pub async fn ws_auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.bearer_token.is_none() {
        tracing::error!("gateway has no bearer token configured -- rejecting stream");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let presented = bearer_from_headers(request.headers())
        .map(str::to_owned)
        .or_else(|| token_from_uri(request.uri()));
    if auth.accepts(presented.as_deref()) {
        return Ok(next.run(request).await);
    }
    Err(StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_configured_accepts_nothing() {
        let config = AuthConfig::default();
        assert!(!config.accepts(Some("anything")));
        assert!(!config.accepts(None));
    }

    #[test]
    fn matching_token_is_accepted() {
        let config = AuthConfig::new(Some("secret-token".to_string()));
        assert!(config.accepts(Some("secret-token")));
        assert!(!config.accepts(Some("secret")));
        assert!(!config.accepts(None));
    }

    #[test]
    fn debug_redacts_token() {
        let config = AuthConfig::new(Some("secret-token".to_string()));
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_from_headers(&headers), None);
        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(bearer_from_headers(&headers), Some("abc"));
        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(bearer_from_headers(&headers), None);
    }

    fn token_of(uri: &str) -> Option<String> {
        token_from_uri(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn query_token_parsing() {
        assert_eq!(token_of("/ws"), None);
        assert_eq!(token_of("/ws?token=abc").as_deref(), Some("abc"));
        assert_eq!(token_of("/ws?x=1&token=abc&y=2").as_deref(), Some("abc"));
        assert_eq!(token_of("/ws?tokens=abc"), None);
    }

    #[test]
    fn query_token_is_percent_decoded() {
        let config = AuthConfig::new(Some("abc+/=".to_string()));
        let presented = token_of("/ws?token=abc%2B%2F%3D");
        assert_eq!(presented.as_deref(), Some("abc+/="));
        assert!(config.accepts(presented.as_deref()));
    }
}
