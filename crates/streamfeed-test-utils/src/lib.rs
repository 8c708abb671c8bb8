// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Streamfeed.
//!
//! Provides [`MockExecutor`], an in-memory [`HttpExecutor`](streamfeed_core::HttpExecutor)
//! that records every request and answers from a queue.

pub mod mock_executor;

pub use mock_executor::MockExecutor;
