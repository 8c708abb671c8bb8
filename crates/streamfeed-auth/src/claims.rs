// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token kinds and the claim sets they sign.

use serde::{Deserialize, Serialize};
use streamfeed_core::{FeedRef, StreamError};
use strum::{Display, EnumString};

/// Wildcard used for unscoped claims.
pub const WILDCARD: &str = "*";

/// What a token permits on its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Action {
    #[strum(serialize = "read")]
    #[serde(rename = "read")]
    Read,
    #[strum(serialize = "write")]
    #[serde(rename = "write")]
    Write,
    #[strum(serialize = "delete")]
    #[serde(rename = "delete")]
    Delete,
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    All,
}

impl Action {
    /// Parses an action name, rejecting anything outside the known set.
    pub fn parse(name: &str) -> Result<Self, StreamError> {
        name.parse()
            .map_err(|_| StreamError::invalid(format!("unknown token action `{name}`")))
    }
}

/// The API surface a token is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Resource {
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    All,
    #[strum(serialize = "activities")]
    #[serde(rename = "activities")]
    Activities,
    #[strum(serialize = "feed")]
    #[serde(rename = "feed")]
    Feed,
    #[strum(serialize = "follower")]
    #[serde(rename = "follower")]
    Follower,
    #[strum(serialize = "feed_targets")]
    #[serde(rename = "feed_targets")]
    FeedTargets,
    #[strum(serialize = "redirect_and_track")]
    #[serde(rename = "redirect_and_track")]
    RedirectAndTrack,
}

impl Resource {
    /// Parses a resource name, rejecting anything outside the known set.
    pub fn parse(name: &str) -> Result<Self, StreamError> {
        name.parse()
            .map_err(|_| StreamError::invalid(format!("unknown token resource `{name}`")))
    }
}

/// The four families of token the service accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Full or partial access to every resource of one feed.
    Feed { feed: FeedRef, action: Action },
    /// Read access to one feed, safe to hand to untrusted clients.
    Readonly(FeedRef),
    /// One resource of one feed, e.g. `feed_targets`.
    FeedResource {
        feed: FeedRef,
        resource: Resource,
        action: Action,
    },
    /// One resource across the whole application.
    Resource { resource: Resource, action: Action },
    /// Everything in the application.
    Application,
}

impl TokenKind {
    pub fn feed(feed: FeedRef, action: Action) -> Self {
        Self::Feed { feed, action }
    }

    pub fn resource(resource: Resource, action: Action) -> Self {
        Self::Resource { resource, action }
    }

    /// The canonical claim set for this kind.
    pub fn claims(&self) -> TokenClaims {
        match self {
            Self::Feed { feed, action } => {
                TokenClaims::new(action.to_string(), feed.token_id(), WILDCARD)
            }
            Self::Readonly(feed) => {
                TokenClaims::new(Action::Read.to_string(), feed.token_id(), WILDCARD)
            }
            Self::FeedResource {
                feed,
                resource,
                action,
            } => TokenClaims::new(action.to_string(), feed.token_id(), resource.to_string()),
            Self::Resource { resource, action } => {
                TokenClaims::new(action.to_string(), WILDCARD, resource.to_string())
            }
            Self::Application => TokenClaims::new(WILDCARD, WILDCARD, WILDCARD),
        }
    }
}

/// Claims carried in the token body.
///
/// Field order is part of the wire contract: `action` is serialized first so
/// every read-only token starts with the same encoded prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub action: String,
    pub feed_id: String,
    pub resource: String,
}

impl TokenClaims {
    pub fn new(
        action: impl Into<String>,
        feed_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            feed_id: feed_id.into(),
            resource: resource.into(),
        }
    }
}
