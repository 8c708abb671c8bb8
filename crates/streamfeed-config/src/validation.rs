// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::StreamConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &StreamConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let api = &config.api;

    if api.version.trim().is_empty() {
        errors.push(validation("api.version must not be empty".to_string()));
    }

    if !is_host_label(&api.region) {
        errors.push(validation(format!(
            "api.region `{}` must be a non-empty host label (letters, digits, `-`)",
            api.region
        )));
    }

    if let Some(location) = api.location.as_deref().filter(|l| !is_host_label(l)) {
        errors.push(validation(format!(
            "api.location `{location}` must be a non-empty host label (letters, digits, `-`)"
        )));
    }

    if api.timeout_ms == 0 {
        errors.push(validation("api.timeout_ms must be greater than zero".to_string()));
    }

    match (&api.key, &api.secret) {
        (Some(_), None) => errors.push(validation(
            "api.key is set but api.secret is missing".to_string(),
        )),
        (None, Some(_)) => errors.push(validation(
            "api.secret is set but api.key is missing".to_string(),
        )),
        _ => {}
    }

    if let Some(base_url) = api.base_url.as_deref().filter(|u| !is_http_url(u)) {
        errors.push(validation(format!(
            "api.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if !is_http_url(&config.analytics.base_url) {
        errors.push(validation(format!(
            "analytics.base_url `{}` must start with http:// or https://",
            config.analytics.base_url
        )));
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(validation(format!(
            "log.level `{}` must be one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn is_host_label(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
