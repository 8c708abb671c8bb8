// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-feed operations sent in a single request.

use serde_json::{Map, Value, json};
use streamfeed_auth::TokenSigner;
use streamfeed_core::{Activity, ApiRequest, FeedRef, FollowRelation, HttpMethod, StreamError};

/// A composed batch, ready to be signed.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRequest {
    /// One activity fanned out to many feeds.
    AddToMany { activity: Activity, feeds: Vec<FeedRef> },
    /// Many follows with one shared copy limit.
    FollowMany {
        relations: Vec<FollowRelation>,
        activity_copy_limit: Option<u32>,
    },
    /// Many unfollows, each with its own history flag.
    UnfollowMany { relations: Vec<FollowRelation> },
}

impl BatchRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::AddToMany { .. } => "feed/add_to_many/",
            Self::FollowMany { .. } => "follow_many/",
            Self::UnfollowMany { .. } => "unfollow_many/",
        }
    }

    /// Number of feeds or relations the batch touches.
    pub fn len(&self) -> usize {
        match self {
            Self::AddToMany { feeds, .. } => feeds.len(),
            Self::FollowMany { relations, .. } | Self::UnfollowMany { relations } => {
                relations.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn body(&self) -> Result<Value, StreamError> {
        Ok(match self {
            Self::AddToMany { activity, feeds } => {
                let feeds = feeds.iter().map(FeedRef::wire_id).collect::<Vec<_>>();
                json!({ "activity": serde_json::to_value(activity)?, "feeds": feeds })
            }
            Self::FollowMany { relations, .. } => Value::Array(
                relations
                    .iter()
                    .map(|r| json!({ "source": r.source.wire_id(), "target": r.target.wire_id() }))
                    .collect(),
            ),
            Self::UnfollowMany { relations } => Value::Array(
                relations
                    .iter()
                    .map(|r| {
                        let mut entry = Map::new();
                        entry.insert("source".into(), Value::String(r.source.wire_id()));
                        entry.insert("target".into(), Value::String(r.target.wire_id()));
                        if let Some(keep_history) = r.keep_history {
                            entry.insert("keep_history".into(), Value::Bool(keep_history));
                        }
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        })
    }

    /// Signs the batch with an application token.
    pub fn into_request(self, signer: &TokenSigner) -> Result<ApiRequest, StreamError> {
        let token = signer.application_token()?;
        let request = ApiRequest::new(HttpMethod::Post, self.path(), token).with_body(self.body()?);
        Ok(match self {
            Self::FollowMany {
                activity_copy_limit: Some(limit),
                ..
            } => request.with_query("activity_copy_limit", limit.to_string()),
            _ => request,
        })
    }
}

/// Validates and shapes batch operations.
pub struct BatchComposer;

impl BatchComposer {
    /// Fans `activity` out to `feeds`. At least one feed is required.
    pub fn add_to_many(activity: Activity, feeds: Vec<FeedRef>) -> Result<BatchRequest, StreamError> {
        if feeds.is_empty() {
            return Err(StreamError::invalid("add_to_many needs at least one feed"));
        }
        Ok(BatchRequest::AddToMany { activity, feeds })
    }

    /// Follows every relation in one call.
    ///
    /// The endpoint takes one copy limit for the whole batch; `None` leaves
    /// it to the service and `Some(0)` copies no history. Limits set on the
    /// relations themselves must agree with it: with a batch limit they must
    /// match it, without one they must all carry the same value, which is
    /// then used for the batch.
    pub fn follow_many(
        relations: Vec<FollowRelation>,
        activity_copy_limit: Option<u32>,
    ) -> Result<BatchRequest, StreamError> {
        reject_self_follow(&relations)?;
        let activity_copy_limit = batch_copy_limit(&relations, activity_copy_limit)?;
        Ok(BatchRequest::FollowMany {
            relations,
            activity_copy_limit,
        })
    }

    /// Unfollows every relation, honouring each relation's `keep_history`.
    pub fn unfollow_many(relations: Vec<FollowRelation>) -> Result<BatchRequest, StreamError> {
        reject_self_follow(&relations)?;
        Ok(BatchRequest::UnfollowMany { relations })
    }
}

fn batch_copy_limit(
    relations: &[FollowRelation],
    requested: Option<u32>,
) -> Result<Option<u32>, StreamError> {
    if let Some(limit) = requested {
        return match relations
            .iter()
            .find(|r| r.activity_copy_limit.is_some_and(|own| own != limit))
        {
            Some(relation) => Err(StreamError::invalid(format!(
                "relation {} -> {} has activity_copy_limit {:?} but the batch uses {limit}",
                relation.source, relation.target, relation.activity_copy_limit
            ))),
            None => Ok(Some(limit)),
        };
    }

    let Some(first) = relations.first() else {
        return Ok(None);
    };
    if relations
        .iter()
        .all(|r| r.activity_copy_limit == first.activity_copy_limit)
    {
        Ok(first.activity_copy_limit)
    } else {
        Err(StreamError::invalid(
            "follow_many relations carry different activity_copy_limit values; \
             the endpoint accepts one limit per batch",
        ))
    }
}

fn reject_self_follow(relations: &[FollowRelation]) -> Result<(), StreamError> {
    match relations.iter().find(|r| r.source == r.target) {
        Some(relation) => Err(StreamError::invalid(format!(
            "feed `{}` cannot follow itself",
            relation.source
        ))),
        None => Ok(()),
    }
}
