// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Streamfeed client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so that a misspelled key
//! is reported instead of silently ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level Streamfeed configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Credentials and API host selection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Analytics (redirect and tracking) endpoint.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Feed API credentials and endpoint settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Public API key, sent as the `api_key` query parameter.
    #[serde(default)]
    pub key: Option<String>,

    /// Shared secret used to sign tokens. Never sent over the wire.
    #[serde(default)]
    pub secret: Option<String>,

    /// API version path segment.
    #[serde(default = "default_version")]
    pub version: String,

    /// Region host prefix, e.g. `us-east` or `dublin`.
    #[serde(default = "default_region")]
    pub region: String,

    /// Location host prefix. Takes precedence over `region` when set.
    #[serde(default)]
    pub location: Option<String>,

    /// Full base URL override, mainly for tests and proxies.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    /// Base URL every relative API path is joined onto. Always ends in `/`.
    pub fn api_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            return with_trailing_slash(base);
        }
        let host_prefix = self.location.as_deref().unwrap_or(&self.region);
        format!(
            "https://{host_prefix}-api.stream-io-api.com/api/{}/",
            self.version
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            secret: None,
            version: default_version(),
            region: default_region(),
            location: None,
            base_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &self.key)
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("version", &self.version)
            .field("region", &self.region)
            .field("location", &self.location)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_version() -> String {
    "v1.0".to_string()
}

fn default_region() -> String {
    "us-east".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

/// Analytics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Base URL of the analytics service, without the version segment.
    #[serde(default = "default_analytics_base_url")]
    pub base_url: String,
}

impl AnalyticsConfig {
    /// Redirect endpoint for the given API version.
    pub fn redirect_url(&self, version: &str) -> String {
        format!("{}{version}/redirect/", with_trailing_slash(&self.base_url))
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_analytics_base_url(),
        }
    }
}

fn default_analytics_base_url() -> String {
    "https://analytics.stream-io-api.com/analytics".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_uses_region() {
        let api = ApiConfig::default();
        assert_eq!(
            api.api_base_url(),
            "https://us-east-api.stream-io-api.com/api/v1.0/"
        );
    }

    #[test]
    fn location_wins_over_region() {
        let api = ApiConfig {
            location: Some("qa".into()),
            region: "dublin".into(),
            ..ApiConfig::default()
        };
        assert_eq!(api.api_base_url(), "https://qa-api.stream-io-api.com/api/v1.0/");
    }

    #[test]
    fn base_url_override_gets_trailing_slash() {
        let api = ApiConfig {
            base_url: Some("http://127.0.0.1:8080/api/v1.0".into()),
            ..ApiConfig::default()
        };
        assert_eq!(api.api_base_url(), "http://127.0.0.1:8080/api/v1.0/");
    }

    #[test]
    fn redirect_url_includes_version() {
        let analytics = AnalyticsConfig::default();
        assert_eq!(
            analytics.redirect_url("v1.0"),
            "https://analytics.stream-io-api.com/analytics/v1.0/redirect/"
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let api = ApiConfig {
            secret: Some("very-secret".into()),
            ..ApiConfig::default()
        };
        let debug = format!("{api:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
