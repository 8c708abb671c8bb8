// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Streamfeed client.
//!
//! Layered TOML files plus `STREAM_*` environment variables, strict key
//! checking, semantic validation, and miette-rendered diagnostics.
//!
//! # Usage
//!
//! ```no_run
//! use streamfeed_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API host: {}", config.api.api_base_url());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AnalyticsConfig, ApiConfig, LogConfig, StreamConfig};

/// Load configuration from the file hierarchy and environment, then validate.
pub fn load_and_validate() -> Result<StreamConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<StreamConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

/// Load configuration from an explicit file (plus environment) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<StreamConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

#[allow(clippy::result_large_err)]
fn finish(loaded: Result<StreamConfig, figment::Error>) -> Result<StreamConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(config = ?config, "configuration loaded");
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
