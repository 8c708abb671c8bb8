// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Streamfeed client.

use thiserror::Error;

/// The primary error type returned by every Streamfeed operation.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Caller input failed validation. Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A wire id could not be split into `slug:user_id`.
    #[error("malformed feed identifier `{0}`")]
    MalformedIdentifier(String),

    /// The HTTP executor failed to deliver the request or read the response.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service answered with a non-2xx status.
    #[error("service error ({status}): {}", describe_service_body(body))]
    Service {
        status: u16,
        body: serde_json::Value,
    },

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Credentials or client settings are unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token library refused to encode or decode a token.
    #[error("signing error: {0}")]
    Signing(String),
}

impl StreamError {
    /// Shorthand for [`StreamError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns the HTTP status for service errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Picks the most useful text out of a service error body.
///
/// The service reports `{"exception": "...", "detail": "..."}`; anything
/// else is rendered as compact JSON.
fn describe_service_body(body: &serde_json::Value) -> String {
    let exception = body.get("exception").and_then(|v| v.as_str());
    let detail = body.get("detail").and_then(|v| v.as_str());
    match (exception, detail) {
        (Some(exception), Some(detail)) => format!("{exception}: {detail}"),
        (Some(exception), None) => exception.to_string(),
        (None, Some(detail)) => detail.to_string(),
        (None, None) => body.to_string(),
    }
}
