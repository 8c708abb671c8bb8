// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock HTTP executor for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use streamfeed_core::{ApiRequest, ApiResponse, HttpExecutor, StreamError};

/// An executor that never touches the network.
///
/// Responses are popped from a FIFO queue. When the queue is empty a
/// `200 {}` response is returned. Every request is kept for inspection.
#[derive(Clone, Default)]
pub struct MockExecutor {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, StreamError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::default(),
        }
    }

    /// Queue a successful response with `status` and `body`.
    pub async fn push_response(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .await
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queue an executor failure, as a dropped connection would produce.
    pub async fn push_error(&self, error: StreamError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Every request executed so far, oldest first.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl HttpExecutor for MockExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, StreamError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, json!({}))))
    }
}
