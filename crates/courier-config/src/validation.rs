// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::CourierConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let topic = config.router.delivery_topic.trim();
    if topic.is_empty() {
        errors.push(ConfigError::validation(
            "router.delivery_topic must not be empty",
        ));
    } else if topic.contains('/') || topic.chars().any(char::is_whitespace) {
        errors.push(ConfigError::validation(format!(
            "router.delivery_topic `{topic}` must not contain '/' or whitespace"
        )));
    }

    if config.router.persist_timeout_ms == 0 {
        errors.push(ConfigError::validation(
            "router.persist_timeout_ms must be greater than 0",
        ));
    }

    // 0 is the only id no user can hold.
    if config.router.system_sender_id != 0 {
        errors.push(ConfigError::validation(format!(
            "router.system_sender_id `{}` must be 0, non-zero ids are user ids",
            config.router.system_sender_id
        )));
    }

    if config.directory.request_timeout_ms == 0 {
        errors.push(ConfigError::validation(
            "directory.request_timeout_ms must be greater than 0",
        ));
    }

    if config.router.route_by_node && config.directory.status_url.is_none() {
        errors.push(ConfigError::validation(
            "router.route_by_node requires directory.status_url",
        ));
    }

    check_url(&mut errors, "directory.friends_url", &config.directory.friends_url);
    check_url(&mut errors, "directory.groups_url", &config.directory.groups_url);
    if let Some(url) = &config.directory.status_url {
        check_url(&mut errors, "directory.status_url", url);
    }
    check_url(&mut errors, "store.url", &config.store.url);
    if let Some(url) = &config.broker.url {
        check_url(&mut errors, "broker.url", url);
    }

    if config.broker.capacity == 0 {
        errors.push(ConfigError::validation(
            "broker.capacity must be greater than 0",
        ));
    }

    let host = config.gateway.host.trim();
    let is_ip = host.parse::<std::net::IpAddr>().is_ok();
    let is_hostname = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !is_ip && !is_hostname {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if let Some(token) = &config.gateway.bearer_token {
        if token.trim().is_empty() {
            errors.push(ConfigError::validation(
                "gateway.bearer_token must not be blank when set",
            ));
        }
    }

    if config.gateway.request_timeout_ms == 0 {
        errors.push(ConfigError::validation(
            "gateway.request_timeout_ms must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    match rest {
        Some(authority) if !authority.is_empty() && !authority.starts_with('/') => {}
        _ => errors.push(ConfigError::validation(format!(
            "{key} `{value}` must be an absolute http(s) URL"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&CourierConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = CourierConfig::default();
        config.router.delivery_topic = " ".into();
        config.router.persist_timeout_ms = 0;
        config.store.url = "ftp://store".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn route_by_node_requires_status_url() {
        let mut config = CourierConfig::default();
        config.router.route_by_node = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("status_url"));

        config.directory.status_url = Some("http://status:7104".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_bad_host_and_blank_token() {
        let mut config = CourierConfig::default();
        config.gateway.host = "not a host!".into();
        config.gateway.bearer_token = Some("   ".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_zero_gateway_timeout() {
        let mut config = CourierConfig::default();
        config.gateway.request_timeout_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("gateway.request_timeout_ms"));
    }

    #[test]
    fn rejects_system_sender_that_could_be_a_user() {
        let mut config = CourierConfig::default();
        config.router.system_sender_id = 42;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("router.system_sender_id"));
    }

    #[test]
    fn blank_token_rejected_but_absent_token_allowed() {
        let mut config = CourierConfig::default();
        config.gateway.bearer_token = None;
        assert!(validate_config(&config).is_ok());
        config.gateway.bearer_token = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("bearer_token"));
        config.gateway.bearer_token = Some("t".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = CourierConfig::default();
        config.service.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }
}
