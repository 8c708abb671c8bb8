// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./streamfeed.toml` > `~/.config/streamfeed/streamfeed.toml`
//! > `/etc/streamfeed/streamfeed.toml`, with `STREAM_*` environment
//! variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StreamConfig;

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = "streamfeed.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/streamfeed/streamfeed.toml";

/// Environment variables recognized after the `STREAM_` prefix, with the
/// config key each one sets.
const ENV_KEYS: &[(&str, &str)] = &[
    ("api_key", "api.key"),
    ("api_secret", "api.secret"),
    ("api_version", "api.version"),
    ("region", "api.region"),
    ("location", "api.location"),
    ("base_url", "api.base_url"),
    ("timeout_ms", "api.timeout_ms"),
    ("analytics_base_url", "analytics.base_url"),
    ("log_level", "log.level"),
];

/// Load configuration from the standard file hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/streamfeed/streamfeed.toml`
/// 3. `~/.config/streamfeed/streamfeed.toml`
/// 4. `./streamfeed.toml`
/// 5. `STREAM_*` environment variables
pub fn load_config() -> Result<StreamConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<StreamConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StreamConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StreamConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StreamConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StreamConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// `~/.config/streamfeed/streamfeed.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("streamfeed").join(CONFIG_FILE_NAME))
}

/// Maps a prefix-stripped env var name (any case) to its config key.
///
/// Uses an explicit table rather than splitting on `_`, because keys such as
/// `timeout_ms` and `base_url` contain underscores themselves.
pub fn map_env_key(key: &str) -> Option<&'static str> {
    ENV_KEYS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(key))
        .map(|(_, config_key)| *config_key)
}

fn env_provider() -> Env {
    Env::prefixed("STREAM_")
        .filter(|key| map_env_key(key.as_str()).is_some())
        .map(|key| map_env_key(key.as_str()).unwrap_or_default().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("api_key"), Some("api.key"));
        assert_eq!(map_env_key("api_secret"), Some("api.secret"));
        assert_eq!(map_env_key("region"), Some("api.region"));
        assert_eq!(map_env_key("timeout_ms"), Some("api.timeout_ms"));
        assert_eq!(map_env_key("analytics_base_url"), Some("analytics.base_url"));
        assert_eq!(map_env_key("API_KEY"), Some("api.key"));
        assert_eq!(map_env_key("unrelated"), None);
    }

    #[test]
    fn env_vars_override_toml() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
[api]
key = "from-file"
region = "dublin"
"#,
            )?;
            jail.set_env("STREAM_API_KEY", "from-env");
            jail.set_env("STREAM_API_SECRET", "env-secret");
            jail.set_env("STREAM_TIMEOUT_MS", "10000");
            jail.set_env("STREAM_SOMETHING_ELSE", "ignored");

            let config = load_config_from_path(Path::new(CONFIG_FILE_NAME))?;
            assert_eq!(config.api.key.as_deref(), Some("from-env"));
            assert_eq!(config.api.secret.as_deref(), Some("env-secret"));
            assert_eq!(config.api.region, "dublin");
            assert_eq!(config.api.timeout_ms, 10000);
            Ok(())
        });
    }
}
