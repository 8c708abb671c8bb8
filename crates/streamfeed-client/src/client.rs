// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`StreamClient`] facade.
//!
//! Owns the credentials and the executor, hands out [`Feed`] and [`Batcher`]
//! handles, and turns non-2xx responses into [`StreamError::Service`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Map, Value};
use streamfeed_auth::TokenSigner;
use streamfeed_config::{AnalyticsConfig, StreamConfig};
use streamfeed_core::{
    Activity, ActivityRef, ApiRequest, ApiResponse, FeedRef, ForeignIdTime, HttpExecutor,
    StreamError,
};
use tracing::{debug, warn};

use crate::batcher::Batcher;
use crate::feed::Feed;
use crate::redirect::RedirectUrlBuilder;
use crate::request::RequestBuilder;
use crate::transport::ReqwestExecutor;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "STREAM_API_KEY";
/// Environment variable consulted when the config carries no API secret.
pub const API_SECRET_ENV: &str = "STREAM_API_SECRET";

const DEFAULT_API_VERSION: &str = "v1.0";

struct Inner {
    api_key: String,
    requests: RequestBuilder,
    redirect: RedirectUrlBuilder,
    executor: Arc<dyn HttpExecutor>,
}

/// Entry point for every feed operation. Cheap to clone.
#[derive(Clone)]
pub struct StreamClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamClient")
            .field("api_key", &self.inner.api_key)
            .field("secret", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl StreamClient {
    /// Creates a client that sends every request through `executor`.
    pub fn new(
        api_key: impl Into<String>,
        secret: &SecretString,
        executor: Arc<dyn HttpExecutor>,
    ) -> Result<Self, StreamError> {
        let redirect = AnalyticsConfig::default().redirect_url(DEFAULT_API_VERSION);
        Self::build(api_key.into(), secret, executor, &redirect)
    }

    /// Creates a client talking HTTPS to the host selected by `config`.
    pub fn from_config(config: &StreamConfig) -> Result<Self, StreamError> {
        let (api_key, secret) = resolve_credentials(config)?;
        let executor = ReqwestExecutor::new(
            &config.api.api_base_url(),
            api_key.clone(),
            Duration::from_millis(config.api.timeout_ms),
        )?;
        debug!(base_url = %executor.base_url(), "created HTTP executor");
        let redirect = config.analytics.redirect_url(&config.api.version);
        Self::build(api_key, &secret, Arc::new(executor), &redirect)
    }

    /// Like [`from_config`](Self::from_config) but with a caller-supplied executor.
    pub fn from_config_with_executor(
        config: &StreamConfig,
        executor: Arc<dyn HttpExecutor>,
    ) -> Result<Self, StreamError> {
        let (api_key, secret) = resolve_credentials(config)?;
        let redirect = config.analytics.redirect_url(&config.api.version);
        Self::build(api_key, &secret, executor, &redirect)
    }

    fn build(
        api_key: String,
        secret: &SecretString,
        executor: Arc<dyn HttpExecutor>,
        redirect_endpoint: &str,
    ) -> Result<Self, StreamError> {
        if api_key.is_empty() {
            return Err(StreamError::Config("API key must not be empty".into()));
        }
        let signer = TokenSigner::new(secret);
        let redirect = RedirectUrlBuilder::new(redirect_endpoint, api_key.clone())?;
        Ok(Self {
            inner: Arc::new(Inner {
                api_key,
                requests: RequestBuilder::new(signer),
                redirect,
                executor,
            }),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    pub fn signer(&self) -> &TokenSigner {
        self.inner.requests.signer()
    }

    pub(crate) fn requests(&self) -> &RequestBuilder {
        &self.inner.requests
    }

    /// Handle for the feed `slug:user_id`.
    pub fn feed(&self, slug: &str, user_id: &str) -> Result<Feed, StreamError> {
        Ok(Feed::new(self.clone(), FeedRef::new(slug, user_id)?))
    }

    /// Handle for an already parsed feed reference.
    pub fn feed_ref(&self, feed: FeedRef) -> Feed {
        Feed::new(self.clone(), feed)
    }

    /// Handle for multi-feed operations.
    pub fn batcher(&self) -> Batcher {
        Batcher::new(self.clone())
    }

    /// Executes `request` and rejects non-2xx answers.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse, StreamError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "sending request");

        let response = self.inner.executor.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            warn!(%method, %path, status = response.status, "service rejected request");
            Err(StreamError::Service {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Replaces whole activities, matched by `foreign_id` and `time`.
    ///
    /// An empty slice is a no-op that makes no network call.
    pub async fn update_activities(
        &self,
        activities: &[Activity],
    ) -> Result<ApiResponse, StreamError> {
        match self.inner.requests.update_activities(activities)? {
            Some(request) => self.send(request).await,
            None => Ok(ApiResponse::no_op()),
        }
    }

    pub async fn update_activity(&self, activity: &Activity) -> Result<ApiResponse, StreamError> {
        self.update_activities(std::slice::from_ref(activity)).await
    }

    pub async fn get_activities_by_id(&self, ids: &[String]) -> Result<ApiResponse, StreamError> {
        let request = self.inner.requests.get_activities_by_id(ids)?;
        self.send(request).await
    }

    pub async fn get_activities_by_foreign_id(
        &self,
        refs: &[ForeignIdTime],
    ) -> Result<ApiResponse, StreamError> {
        let request = self.inner.requests.get_activities_by_foreign_id(refs)?;
        self.send(request).await
    }

    /// Sets and unsets fields of one activity. Keys may be dotted paths.
    pub async fn activity_partial_update(
        &self,
        target: &ActivityRef,
        set: &Map<String, Value>,
        unset: &[String],
    ) -> Result<ApiResponse, StreamError> {
        let request = self.inner.requests.partial_update(target, set, unset)?;
        self.send(request).await
    }

    /// Signed analytics URL that records `events` then redirects to `target_url`.
    pub fn create_redirect_url(
        &self,
        target_url: &str,
        events: &[Map<String, Value>],
    ) -> Result<String, StreamError> {
        self.inner
            .redirect
            .build(self.signer(), target_url, events)
            .map(String::from)
    }
}

/// Credentials from `config`, falling back to the process environment.
pub fn resolve_credentials(config: &StreamConfig) -> Result<(String, SecretString), StreamError> {
    let key = config
        .api
        .key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            StreamError::Config(format!("no API key: set api.key or {API_KEY_ENV}"))
        })?;
    let secret = config
        .api
        .secret
        .clone()
        .or_else(|| std::env::var(API_SECRET_ENV).ok())
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| {
            StreamError::Config(format!("no API secret: set api.secret or {API_SECRET_ENV}"))
        })?;
    Ok((key, SecretString::from(secret)))
}
