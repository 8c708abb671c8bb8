// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the request-shaping core and its collaborators.

pub mod executor;

pub use executor::HttpExecutor;
