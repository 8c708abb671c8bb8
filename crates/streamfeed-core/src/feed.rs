// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feed addressing: the `slug:user_id` identifier scheme.
//!
//! A [`FeedRef`] is validated once at construction and is immutable
//! afterwards. Its wire form (`slug:user_id`) is what appears in request
//! bodies, `to` lists and follow relations; its token form (`slug` and
//! `user_id` concatenated) is what appears in signed token claims.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StreamError;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("slug pattern is valid"));

static USER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("user id pattern is valid"));

/// Reference to a single feed, e.g. `user:42` or `flat:5f0c...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedRef {
    slug: String,
    user_id: String,
}

impl FeedRef {
    /// Builds a feed reference, validating both parts.
    ///
    /// The slug may contain letters, digits and `_`; the user id may
    /// additionally contain `-`.
    pub fn new(slug: impl Into<String>, user_id: impl Into<String>) -> Result<Self, StreamError> {
        let slug = slug.into();
        let user_id = user_id.into();

        if !SLUG_PATTERN.is_match(&slug) {
            return Err(StreamError::invalid(format!(
                "feed slug `{slug}` may only contain letters, digits and underscores"
            )));
        }
        if !USER_ID_PATTERN.is_match(&user_id) {
            return Err(StreamError::invalid(format!(
                "user id `{user_id}` may only contain letters, digits, underscores and dashes"
            )));
        }

        Ok(Self { slug, user_id })
    }

    /// Parses a wire id, splitting on the first colon.
    pub fn parse(wire_id: &str) -> Result<Self, StreamError> {
        let (slug, user_id) = wire_id
            .split_once(':')
            .ok_or_else(|| StreamError::MalformedIdentifier(wire_id.to_string()))?;
        Self::new(slug, user_id)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The `slug:user_id` form used in bodies and query parameters.
    pub fn wire_id(&self) -> String {
        format!("{}:{}", self.slug, self.user_id)
    }

    /// The `slug` + `user_id` form embedded in token claims.
    pub fn token_id(&self) -> String {
        format!("{}{}", self.slug, self.user_id)
    }
}

impl fmt::Display for FeedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.slug, self.user_id)
    }
}

impl FromStr for FeedRef {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FeedRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeedRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
