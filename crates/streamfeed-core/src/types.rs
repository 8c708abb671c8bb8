// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by the request builders and the client facade.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::feed::FeedRef;

/// A single feed entry.
///
/// `actor`, `verb` and `object` are stored opaquely by the service and may be
/// any JSON value. Unknown fields are kept in `extra` so that a fetched
/// activity can be sent back without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub actor: Value,

    pub verb: Value,

    pub object: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,

    /// ISO-8601 timestamp, passed through verbatim. When absent the service
    /// assigns the time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,

    /// Feeds the activity is copied into on write.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<FeedRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    pub fn new(actor: impl Into<Value>, verb: impl Into<Value>, object: impl Into<Value>) -> Self {
        Self {
            id: None,
            actor: actor.into(),
            verb: verb.into(),
            object: object.into(),
            target: None,
            time: None,
            foreign_id: None,
            to: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_foreign_id(mut self, foreign_id: impl Into<String>) -> Self {
        self.foreign_id = Some(foreign_id.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<Value>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_to(mut self, to: impl IntoIterator<Item = FeedRef>) -> Self {
        self.to.extend(to);
        self
    }

    /// Adds a custom field such as `popularity` or a nested object.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Alternate identity of an activity: its foreign id plus its time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignIdTime {
    pub foreign_id: String,
    pub time: String,
}

impl ForeignIdTime {
    pub fn new(foreign_id: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            foreign_id: foreign_id.into(),
            time: time.into(),
        }
    }
}

/// Identifies an existing activity for partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    Id(String),
    ForeignId(ForeignIdTime),
}

impl ActivityRef {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn foreign_id(foreign_id: impl Into<String>, time: impl Into<String>) -> Self {
        Self::ForeignId(ForeignIdTime::new(foreign_id, time))
    }
}

/// A directed follow edge from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRelation {
    pub source: FeedRef,
    pub target: FeedRef,
    /// `None` leaves the copy limit to the service. `Some(0)` copies nothing.
    pub activity_copy_limit: Option<u32>,
    /// On unfollow, keep activities that were already copied.
    pub keep_history: Option<bool>,
}

impl FollowRelation {
    pub fn new(source: FeedRef, target: FeedRef) -> Self {
        Self {
            source,
            target,
            activity_copy_limit: None,
            keep_history: None,
        }
    }

    pub fn with_activity_copy_limit(mut self, limit: u32) -> Self {
        self.activity_copy_limit = Some(limit);
        self
    }

    pub fn with_keep_history(mut self, keep_history: bool) -> Self {
        self.keep_history = Some(keep_history);
        self
    }
}

/// How `mark_read` / `mark_seen` should be applied on a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkRead {
    /// Mark every activity in the returned page.
    All,
    /// Mark exactly these activity ids, whether or not they are in the page.
    Ids(Vec<String>),
}

/// Pagination and filter options for read operations.
///
/// Offset/limit and id cursors are passed through together if both are set;
/// the service decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub id_gt: Option<String>,
    pub id_lt: Option<String>,
    pub id_gte: Option<String>,
    pub id_lte: Option<String>,
    pub mark_read: Option<MarkRead>,
    pub mark_seen: Option<MarkRead>,
    pub ranking: Option<String>,
    /// Restrict follow listings to these feeds. `Some(vec![])` is an empty
    /// filter, not an absent one.
    pub filter: Option<Vec<FeedRef>>,
}

impl PaginationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset/limit page.
    pub fn page(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_id_gt(mut self, id: impl Into<String>) -> Self {
        self.id_gt = Some(id.into());
        self
    }

    pub fn with_id_lt(mut self, id: impl Into<String>) -> Self {
        self.id_lt = Some(id.into());
        self
    }

    pub fn with_id_gte(mut self, id: impl Into<String>) -> Self {
        self.id_gte = Some(id.into());
        self
    }

    pub fn with_id_lte(mut self, id: impl Into<String>) -> Self {
        self.id_lte = Some(id.into());
        self
    }

    pub fn with_mark_read(mut self, mark: MarkRead) -> Self {
        self.mark_read = Some(mark);
        self
    }

    pub fn with_mark_seen(mut self, mark: MarkRead) -> Self {
        self.mark_seen = Some(mark);
        self
    }

    pub fn with_ranking(mut self, ranking: impl Into<String>) -> Self {
        self.ranking = Some(ranking.into());
        self
    }

    pub fn with_filter(mut self, feeds: impl IntoIterator<Item = FeedRef>) -> Self {
        self.filter = Some(feeds.into_iter().collect());
        self
    }
}
