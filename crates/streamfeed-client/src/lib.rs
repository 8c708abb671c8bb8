// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the activity feed API.
//!
//! [`RequestBuilder`], [`BatchComposer`] and [`RedirectUrlBuilder`] shape
//! requests without doing any I/O. [`StreamClient`] sends them through an
//! [`HttpExecutor`](streamfeed_core::HttpExecutor), by default the
//! reqwest-backed [`ReqwestExecutor`].
//!
//! ```no_run
//! # async fn run() -> Result<(), streamfeed_core::StreamError> {
//! use streamfeed_client::StreamClient;
//! use streamfeed_core::{Activity, PaginationQuery};
//!
//! let config = streamfeed_config::StreamConfig::default();
//! let client = StreamClient::from_config(&config)?;
//! let feed = client.feed("user", "1")?;
//! feed.add_activity(&Activity::new("1", "tweet", "1")).await?;
//! let page = feed.get_activities(&PaginationQuery::page(0, 10)).await?;
//! println!("{} activities", page.results().len());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod batcher;
pub mod client;
pub mod feed;
pub mod pagination;
pub mod redirect;
pub mod request;
pub mod transport;

pub use batch::{BatchComposer, BatchRequest};
pub use batcher::Batcher;
pub use client::{StreamClient, resolve_credentials};
pub use feed::Feed;
pub use pagination::{next_page, parse_next_url};
pub use redirect::RedirectUrlBuilder;
pub use request::{RequestBuilder, TargetUpdate};
pub use transport::ReqwestExecutor;
