// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Streamfeed configuration system.

use std::io::Write;

use streamfeed_config::diagnostic::ConfigError;
use streamfeed_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with every known field deserializes.
#[test]
fn valid_toml_deserializes_into_stream_config() {
    let toml = r#"
[api]
key = "api-key"
secret = "api-secret"
version = "v1.0"
region = "dublin"
location = "qa"
timeout_ms = 10000

[analytics]
base_url = "https://analytics.example.com/analytics"

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.api.key.as_deref(), Some("api-key"));
    assert_eq!(config.api.secret.as_deref(), Some("api-secret"));
    assert_eq!(config.api.region, "dublin");
    assert_eq!(config.api.location.as_deref(), Some("qa"));
    assert_eq!(config.api.timeout_ms, 10000);
    assert_eq!(config.api.api_base_url(), "https://qa-api.stream-io-api.com/api/v1.0/");
    assert_eq!(
        config.analytics.redirect_url(&config.api.version),
        "https://analytics.example.com/analytics/v1.0/redirect/"
    );
    assert_eq!(config.log.level, "debug");
}

/// An empty file yields the compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert!(config.api.key.is_none());
    assert!(config.api.secret.is_none());
    assert_eq!(config.api.version, "v1.0");
    assert_eq!(config.api.region, "us-east");
    assert_eq!(config.api.timeout_ms, 3000);
    assert_eq!(config.log.level, "info");
}

/// A typo in a known section is rejected with a suggestion.
#[test]
fn unknown_key_in_api_suggests_correction() {
    let toml = r#"
[api]
secert = "x"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("secret"), "errors: {errors:?}");
}

/// Unknown top-level sections are rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Wrong value types surface as InvalidType diagnostics.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[api]
timeout_ms = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("string timeout should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "errors: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[api]
key = "only-key"
timeout_ms = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2, "errors: {errors:?}");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// A config file on disk is picked up by path.
#[test]
fn loads_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[api]
base_url = "http://127.0.0.1:8080/api/v1.0"
"#
    )
    .expect("write config");

    figment::Jail::expect_with(|jail| {
        jail.clear_env();
        let config = load_and_validate_path(file.path()).expect("file config should validate");
        assert_eq!(config.api.api_base_url(), "http://127.0.0.1:8080/api/v1.0/");
        Ok(())
    });
}
