// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token signing for the Streamfeed client.
//!
//! Every call to the feed service is authorized by a token derived from the
//! shared API secret. [`TokenKind`] names the scope, [`TokenSigner`] turns
//! it into a [`SignedToken`](streamfeed_core::SignedToken).

pub mod claims;
pub mod signer;

pub use claims::{Action, Resource, TokenClaims, TokenKind, WILDCARD};
pub use signer::{TokenSigner, inspect};
