// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`HttpExecutor`].
//!
//! Adds the `api_key` query parameter and the JWT auth headers to every
//! request and hands back whatever status the service answered with.
//! Failed deliveries are not retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use streamfeed_core::{ApiRequest, ApiResponse, HttpExecutor, HttpMethod, StreamError};
use tracing::debug;
use url::Url;

const CLIENT_HEADER: &str = concat!("streamfeed-rust-client-", env!("CARGO_PKG_VERSION"));

/// Sends [`ApiRequest`]s over HTTPS.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ReqwestExecutor {
    /// Creates an executor rooted at `base_url`, e.g.
    /// `https://us-east-api.stream-io-api.com/api/v1.0/`.
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, StreamError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| StreamError::Config(format!("invalid API base url `{base_url}`: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert("stream-auth-type", HeaderValue::from_static("jwt"));
        headers.insert("x-stream-client", HeaderValue::from_static(CLIENT_HEADER));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StreamError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, StreamError> {
        let mut url = self.base_url.join(&request.path).map_err(|e| {
            StreamError::invalid(format!("invalid request path `{}`: {e}", request.path))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn transport(context: &str, err: reqwest::Error) -> StreamError {
    StreamError::Transport {
        message: format!("{context}: {err}"),
        source: Some(Box::new(err)),
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, StreamError> {
        let url = self.url_for(&request)?;
        let authorization = HeaderValue::from_str(request.token.as_str())
            .map_err(|e| StreamError::Config(format!("invalid authorization header value: {e}")))?;

        let mut builder = self
            .client
            .request(method(request.method), url)
            .header("authorization", authorization);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport("HTTP request failed", e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport("failed to read response body", e))?;

        debug!(method = %request.method, path = %request.path, status, "response received");
        Ok(ApiResponse::new(status, parse_body(text)))
    }
}
