// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sends [`BatchRequest`]s through the client.

use streamfeed_core::{Activity, ApiResponse, FeedRef, FollowRelation, StreamError};
use tracing::info;

use crate::batch::{BatchComposer, BatchRequest};
use crate::client::StreamClient;

/// Handle for multi-feed operations, obtained from [`StreamClient::batcher`].
#[derive(Debug, Clone)]
pub struct Batcher {
    client: StreamClient,
}

impl Batcher {
    pub(crate) fn new(client: StreamClient) -> Self {
        Self { client }
    }

    /// Adds `activity` to every feed in `feeds`.
    pub async fn add_to_many(
        &self,
        activity: Activity,
        feeds: Vec<FeedRef>,
    ) -> Result<ApiResponse, StreamError> {
        self.dispatch(BatchComposer::add_to_many(activity, feeds)?)
            .await
    }

    pub async fn follow_many(
        &self,
        relations: Vec<FollowRelation>,
        activity_copy_limit: Option<u32>,
    ) -> Result<ApiResponse, StreamError> {
        self.dispatch(BatchComposer::follow_many(relations, activity_copy_limit)?)
            .await
    }

    pub async fn unfollow_many(
        &self,
        relations: Vec<FollowRelation>,
    ) -> Result<ApiResponse, StreamError> {
        self.dispatch(BatchComposer::unfollow_many(relations)?).await
    }

    async fn dispatch(&self, batch: BatchRequest) -> Result<ApiResponse, StreamError> {
        if batch.is_empty() {
            return Ok(ApiResponse::no_op());
        }
        info!(path = batch.path(), size = batch.len(), "sending batch");
        let request = batch.into_request(self.client.signer())?;
        self.client.send(request).await
    }
}
