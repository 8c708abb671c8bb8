// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP executor trait: the single point where requests leave the process.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StreamError;
use crate::http::{ApiRequest, ApiResponse};

/// Sends a shaped request to the feed service.
///
/// Implementations own connection pooling, TLS and timeouts. They must not
/// retry: an add-activity call is not idempotent. Any status code is a
/// successful execution; only delivery failures return
/// [`StreamError::Transport`].
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, StreamError>;
}

#[async_trait]
impl<T: HttpExecutor + ?Sized> HttpExecutor for Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, StreamError> {
        (**self).execute(request).await
    }
}
