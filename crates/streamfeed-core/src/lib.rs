// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Streamfeed activity-feed client.
//!
//! Provides feed addressing, the activity and follow data model, the error
//! type shared by every crate, and the [`HttpExecutor`] seam through which
//! all network traffic flows.

pub mod error;
pub mod feed;
pub mod http;
pub mod traits;
pub mod types;

pub use error::StreamError;
pub use feed::FeedRef;
pub use http::{ApiRequest, ApiResponse, HttpMethod, SignedToken};
pub use traits::HttpExecutor;
pub use types::{
    Activity, ActivityRef, FollowRelation, ForeignIdTime, MarkRead, PaginationQuery,
};
