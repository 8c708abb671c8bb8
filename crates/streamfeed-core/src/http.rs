// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response descriptors exchanged with the HTTP executor.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use strum::{Display, EnumString};

/// HTTP verbs used by the feed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A signed credential sent in the `Authorization` header.
///
/// Tokens are pure functions of the secret and their claims, so callers may
/// cache them freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignedToken").field(&"[redacted]").finish()
    }
}

/// A fully shaped API call, ready for the executor.
///
/// `path` is relative to the API base URL (e.g. `feed/user/42/`).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub token: SignedToken,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, token: SignedToken) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            token,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response handed back by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Response used for calls that were short-circuited locally.
    pub fn no_op() -> Self {
        Self {
            status: 200,
            body: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `results` array of list endpoints, or an empty slice.
    pub fn results(&self) -> &[Value] {
        self.body
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `next` page URL of list endpoints, if the service returned one.
    pub fn next_url(&self) -> Option<&str> {
        self.body
            .get("next")
            .and_then(Value::as_str)
            .filter(|next| !next.is_empty())
    }
}
