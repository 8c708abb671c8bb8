// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operations scoped to a single feed.

use streamfeed_core::{Activity, ApiResponse, FeedRef, PaginationQuery, SignedToken, StreamError};
use tracing::debug;

use crate::client::StreamClient;
use crate::request::TargetUpdate;

/// Handle for one feed, obtained from [`StreamClient::feed`].
#[derive(Debug, Clone)]
pub struct Feed {
    client: StreamClient,
    feed: FeedRef,
}

impl Feed {
    pub(crate) fn new(client: StreamClient, feed: FeedRef) -> Self {
        Self { client, feed }
    }

    pub fn feed_ref(&self) -> &FeedRef {
        &self.feed
    }

    pub fn slug(&self) -> &str {
        self.feed.slug()
    }

    pub fn user_id(&self) -> &str {
        self.feed.user_id()
    }

    /// The `slug:user_id` form.
    pub fn id(&self) -> String {
        self.feed.wire_id()
    }

    /// Token that can only read this feed, safe to ship to a browser.
    pub fn readonly_token(&self) -> Result<SignedToken, StreamError> {
        self.client.signer().readonly_token(&self.feed)
    }

    pub async fn add_activity(&self, activity: &Activity) -> Result<ApiResponse, StreamError> {
        let request = self.client.requests().add_activity(&self.feed, activity)?;
        self.client.send(request).await
    }

    /// Adds many activities in one call. An empty slice makes no call.
    pub async fn add_activities(&self, activities: &[Activity]) -> Result<ApiResponse, StreamError> {
        match self.client.requests().add_activities(&self.feed, activities)? {
            Some(request) => {
                debug!(feed = %self.feed, count = activities.len(), "adding activities");
                self.client.send(request).await
            }
            None => Ok(ApiResponse::no_op()),
        }
    }

    /// Removes by activity id.
    pub async fn remove_activity(&self, activity_id: &str) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .remove_activity(&self.feed, activity_id, false)?;
        self.client.send(request).await
    }

    /// Removes every activity carrying `foreign_id`.
    pub async fn remove_activity_by_foreign_id(
        &self,
        foreign_id: &str,
    ) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .remove_activity(&self.feed, foreign_id, true)?;
        self.client.send(request).await
    }

    pub async fn get_activities(&self, query: &PaginationQuery) -> Result<ApiResponse, StreamError> {
        let request = self.client.requests().get_activities(&self.feed, query)?;
        self.client.send(request).await
    }

    /// Makes this feed follow `target`.
    ///
    /// `None` leaves history copying to the service default.
    pub async fn follow(
        &self,
        target: &FeedRef,
        activity_copy_limit: Option<u32>,
    ) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .follow(&self.feed, target, activity_copy_limit)?;
        self.client.send(request).await
    }

    pub async fn unfollow(
        &self,
        target: &FeedRef,
        keep_history: bool,
    ) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .unfollow(&self.feed, target, keep_history)?;
        self.client.send(request).await
    }

    pub async fn followers(&self, offset: u32, limit: u32) -> Result<ApiResponse, StreamError> {
        let request = self.client.requests().followers(&self.feed, offset, limit)?;
        self.client.send(request).await
    }

    pub async fn following(
        &self,
        offset: u32,
        limit: u32,
        filter: Option<&[FeedRef]>,
    ) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .following(&self.feed, offset, limit, filter)?;
        self.client.send(request).await
    }

    /// Changes the `to` targets of the activity identified by `foreign_id` and `time`.
    pub async fn update_activity_to_targets(
        &self,
        foreign_id: &str,
        time: &str,
        update: &TargetUpdate,
    ) -> Result<ApiResponse, StreamError> {
        let request = self
            .client
            .requests()
            .update_activity_to_targets(&self.feed, foreign_id, time, update)?;
        self.client.send(request).await
    }
}
