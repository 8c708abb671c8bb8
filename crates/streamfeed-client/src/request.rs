// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns feed operations into [`ApiRequest`] values.
//!
//! Building is pure: no I/O happens here, so every request shape can be
//! asserted without a network. Each builder signs the token the endpoint
//! requires and percent-encodes identifiers placed in the path.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::{Map, Value, json};
use streamfeed_auth::{Action, Resource, TokenSigner};
use streamfeed_core::{
    Activity, ActivityRef, ApiRequest, FeedRef, ForeignIdTime, HttpMethod, PaginationQuery,
    StreamError,
};

use crate::pagination;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escapes `raw` for use as one path segment.
///
/// `.` and `..` are rejected: URL resolution treats them as dot-segments
/// in any spelling, so they would address a parent resource.
fn segment(raw: &str) -> Result<String, StreamError> {
    match raw {
        "" => Err(StreamError::invalid("path identifier must not be empty")),
        "." | ".." => Err(StreamError::invalid(format!(
            "`{raw}` is not a valid path identifier"
        ))),
        _ => Ok(utf8_percent_encode(raw, PATH_SEGMENT).to_string()),
    }
}

fn feed_path(feed: &FeedRef) -> String {
    format!("feed/{}/{}/", feed.slug(), feed.user_id())
}

fn wire_ids(feeds: &[FeedRef]) -> Vec<String> {
    feeds.iter().map(FeedRef::wire_id).collect()
}

/// Changes to the `to` list of an existing activity.
///
/// Either replace the list wholesale with [`TargetUpdate::replace`] or apply a
/// diff with [`TargetUpdate::diff`]; the two forms cannot be mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetUpdate {
    pub new_targets: Option<Vec<FeedRef>>,
    pub added_targets: Vec<FeedRef>,
    pub removed_targets: Vec<FeedRef>,
}

impl TargetUpdate {
    pub fn replace(targets: impl IntoIterator<Item = FeedRef>) -> Self {
        Self {
            new_targets: Some(targets.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn diff(
        added: impl IntoIterator<Item = FeedRef>,
        removed: impl IntoIterator<Item = FeedRef>,
    ) -> Self {
        Self {
            new_targets: None,
            added_targets: added.into_iter().collect(),
            removed_targets: removed.into_iter().collect(),
        }
    }

    /// Rejects empty, mixed, and self-contradicting updates.
    pub fn validate(&self) -> Result<(), StreamError> {
        let has_diff = !self.added_targets.is_empty() || !self.removed_targets.is_empty();
        match (&self.new_targets, has_diff) {
            (Some(_), true) => {
                return Err(StreamError::invalid(
                    "new_targets cannot be combined with added_targets or removed_targets",
                ));
            }
            (None, false) => {
                return Err(StreamError::invalid(
                    "target update needs new_targets, added_targets or removed_targets",
                ));
            }
            _ => {}
        }

        if let Some(feed) = self
            .added_targets
            .iter()
            .find(|feed| self.removed_targets.contains(feed))
        {
            return Err(StreamError::invalid(format!(
                "feed `{feed}` cannot be both added and removed"
            )));
        }
        Ok(())
    }

    fn to_body(&self, foreign_id: &str, time: &str) -> Value {
        let mut body = Map::new();
        body.insert("foreign_id".into(), Value::String(foreign_id.to_string()));
        body.insert("time".into(), Value::String(time.to_string()));
        if let Some(targets) = &self.new_targets {
            body.insert("new_targets".into(), json!(wire_ids(targets)));
        }
        if !self.added_targets.is_empty() {
            body.insert("added_targets".into(), json!(wire_ids(&self.added_targets)));
        }
        if !self.removed_targets.is_empty() {
            body.insert(
                "removed_targets".into(),
                json!(wire_ids(&self.removed_targets)),
            );
        }
        Value::Object(body)
    }
}

/// Builds signed requests for single-feed and activity endpoints.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    signer: TokenSigner,
}

impl RequestBuilder {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// `POST feed/{slug}/{user_id}/` with the activity as the body.
    pub fn add_activity(&self, feed: &FeedRef, activity: &Activity) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(feed, Action::Write)?;
        Ok(ApiRequest::new(HttpMethod::Post, feed_path(feed), token)
            .with_body(serde_json::to_value(activity)?))
    }

    /// Bulk form of [`add_activity`](Self::add_activity).
    ///
    /// Returns `None` for an empty slice: there is nothing to send.
    pub fn add_activities(
        &self,
        feed: &FeedRef,
        activities: &[Activity],
    ) -> Result<Option<ApiRequest>, StreamError> {
        if activities.is_empty() {
            return Ok(None);
        }
        let token = self.signer.feed_token(feed, Action::Write)?;
        let body = json!({ "activities": activities });
        Ok(Some(
            ApiRequest::new(HttpMethod::Post, feed_path(feed), token).with_body(body),
        ))
    }

    /// `DELETE feed/{slug}/{user_id}/{identifier}/`.
    ///
    /// The identifier always travels in the path. Removal by activity id
    /// adds no query parameter; with `by_foreign_id` the identifier is a
    /// foreign id and the request carries `foreign_id=1`. Empty, `.` and
    /// `..` identifiers are rejected before signing.
    pub fn remove_activity(
        &self,
        feed: &FeedRef,
        identifier: &str,
        by_foreign_id: bool,
    ) -> Result<ApiRequest, StreamError> {
        let identifier = segment(identifier)?;
        let token = self.signer.feed_token(feed, Action::Delete)?;
        let path = format!("{}{identifier}/", feed_path(feed));
        let request = ApiRequest::new(HttpMethod::Delete, path, token);
        Ok(if by_foreign_id {
            request.with_query("foreign_id", "1")
        } else {
            request
        })
    }

    /// `GET feed/{slug}/{user_id}/` with the pagination query encoded.
    pub fn get_activities(
        &self,
        feed: &FeedRef,
        query: &PaginationQuery,
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(feed, Action::Read)?;
        let mut request = ApiRequest::new(HttpMethod::Get, feed_path(feed), token);
        pagination::encode(query, &mut request.query);
        Ok(request)
    }

    /// `POST feed/{slug}/{user_id}/follows/`.
    ///
    /// `activity_copy_limit` is only written when given; the service default
    /// applies otherwise and `Some(0)` copies nothing.
    pub fn follow(
        &self,
        source: &FeedRef,
        target: &FeedRef,
        activity_copy_limit: Option<u32>,
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(source, Action::Write)?;
        let target_token = self.signer.feed_token(target, Action::All)?;

        let mut body = Map::new();
        body.insert("target".into(), Value::String(target.wire_id()));
        if let Some(limit) = activity_copy_limit {
            body.insert("activity_copy_limit".into(), json!(limit));
        }
        body.insert(
            "target_token".into(),
            Value::String(target_token.into_string()),
        );

        let path = format!("{}follows/", feed_path(source));
        Ok(ApiRequest::new(HttpMethod::Post, path, token).with_body(Value::Object(body)))
    }

    /// `DELETE feed/{slug}/{user_id}/follows/{target}/`.
    pub fn unfollow(
        &self,
        source: &FeedRef,
        target: &FeedRef,
        keep_history: bool,
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(source, Action::Delete)?;
        let path = format!("{}follows/{}/", feed_path(source), target.wire_id());
        let request = ApiRequest::new(HttpMethod::Delete, path, token);
        Ok(if keep_history {
            request.with_query("keep_history", "true")
        } else {
            request
        })
    }

    pub fn followers(
        &self,
        feed: &FeedRef,
        offset: u32,
        limit: u32,
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(feed, Action::Read)?;
        let path = format!("{}followers/", feed_path(feed));
        let mut request = ApiRequest::new(HttpMethod::Get, path, token);
        pagination::encode(&PaginationQuery::page(offset, limit), &mut request.query);
        Ok(request)
    }

    /// Feeds that `feed` follows, optionally restricted by `filter`.
    ///
    /// An empty filter is still sent, as an empty value.
    pub fn following(
        &self,
        feed: &FeedRef,
        offset: u32,
        limit: u32,
        filter: Option<&[FeedRef]>,
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.feed_token(feed, Action::Read)?;
        let path = format!("{}follows/", feed_path(feed));
        let mut query = PaginationQuery::page(offset, limit);
        if let Some(filter) = filter {
            query = query.with_filter(filter.iter().cloned());
        }
        let mut request = ApiRequest::new(HttpMethod::Get, path, token);
        pagination::encode(&query, &mut request.query);
        Ok(request)
    }

    /// `POST feed_targets/{slug}/{user_id}/activity_to_targets/`.
    pub fn update_activity_to_targets(
        &self,
        feed: &FeedRef,
        foreign_id: &str,
        time: &str,
        update: &TargetUpdate,
    ) -> Result<ApiRequest, StreamError> {
        if foreign_id.is_empty() || time.is_empty() {
            return Err(StreamError::invalid(
                "target updates need both foreign_id and time",
            ));
        }
        update.validate()?;
        let token = self
            .signer
            .feed_resource_token(feed, Resource::FeedTargets, Action::Write)?;
        let path = format!(
            "feed_targets/{}/{}/activity_to_targets/",
            feed.slug(),
            feed.user_id()
        );
        Ok(ApiRequest::new(HttpMethod::Post, path, token).with_body(update.to_body(foreign_id, time)))
    }

    /// `POST activities/` replacing whole activities.
    ///
    /// Returns `None` for an empty slice.
    pub fn update_activities(
        &self,
        activities: &[Activity],
    ) -> Result<Option<ApiRequest>, StreamError> {
        if activities.is_empty() {
            return Ok(None);
        }
        let token = self.signer.resource_token(Resource::Activities, Action::All)?;
        let body = json!({ "activities": activities });
        Ok(Some(
            ApiRequest::new(HttpMethod::Post, "activities/", token).with_body(body),
        ))
    }

    pub fn get_activities_by_id(&self, ids: &[String]) -> Result<ApiRequest, StreamError> {
        if ids.is_empty() {
            return Err(StreamError::invalid("at least one activity id is required"));
        }
        let token = self.signer.resource_token(Resource::Activities, Action::All)?;
        Ok(ApiRequest::new(HttpMethod::Get, "activity/", token).with_query("ids", ids.join(",")))
    }

    /// Lookup by `(foreign_id, time)` pairs, sent as two parallel lists.
    pub fn get_activities_by_foreign_id(
        &self,
        refs: &[ForeignIdTime],
    ) -> Result<ApiRequest, StreamError> {
        if refs.is_empty() {
            return Err(StreamError::invalid(
                "at least one foreign id and time pair is required",
            ));
        }
        let token = self.signer.resource_token(Resource::Activities, Action::All)?;
        let foreign_ids = refs
            .iter()
            .map(|r| r.foreign_id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let timestamps = refs
            .iter()
            .map(|r| r.time.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Ok(ApiRequest::new(HttpMethod::Get, "activity/", token)
            .with_query("foreign_ids", foreign_ids)
            .with_query("timestamps", timestamps))
    }

    /// `POST activity/` setting and unsetting individual fields.
    ///
    /// Keys in `set` and `unset` may be dotted paths such as
    /// `product.price`. Both may be empty; the request is still built.
    pub fn partial_update(
        &self,
        target: &ActivityRef,
        set: &Map<String, Value>,
        unset: &[String],
    ) -> Result<ApiRequest, StreamError> {
        let token = self.signer.resource_token(Resource::Activities, Action::All)?;

        let mut body = Map::new();
        match target {
            ActivityRef::Id(id) => {
                if id.is_empty() {
                    return Err(StreamError::invalid("activity id must not be empty"));
                }
                body.insert("id".into(), Value::String(id.clone()));
            }
            ActivityRef::ForeignId(ForeignIdTime { foreign_id, time }) => {
                if foreign_id.is_empty() || time.is_empty() {
                    return Err(StreamError::invalid(
                        "partial update by foreign id needs both foreign_id and time",
                    ));
                }
                body.insert("foreign_id".into(), Value::String(foreign_id.clone()));
                body.insert("time".into(), Value::String(time.clone()));
            }
        }
        body.insert("set".into(), Value::Object(set.clone()));
        body.insert("unset".into(), json!(unset));

        Ok(ApiRequest::new(HttpMethod::Post, "activity/", token).with_body(Value::Object(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use streamfeed_auth::inspect;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(TokenSigner::new(&SecretString::from("test-secret")))
    }

    fn feed(id: &str) -> FeedRef {
        FeedRef::parse(id).unwrap()
    }

    fn claims(request: &ApiRequest) -> (String, String, String) {
        let claims = inspect(&request.token).unwrap();
        (claims.action, claims.feed_id, claims.resource)
    }

    #[test]
    fn add_activity_posts_to_feed_with_write_token() {
        let activity = Activity::new("1", "tweet", "1").with_field("popularity", 100);
        let request = builder().add_activity(&feed("user:1"), &activity).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "feed/user/1/");
        assert_eq!(request.body.as_ref().unwrap()["popularity"], 100);
        assert_eq!(claims(&request), ("write".into(), "user1".into(), "*".into()));
    }

    #[test]
    fn add_activities_wraps_list_and_skips_empty() {
        let activities = vec![Activity::new("1", "tweet", "1"), Activity::new("2", "like", "3")];
        let request = builder()
            .add_activities(&feed("user:1"), &activities)
            .unwrap()
            .unwrap();
        assert_eq!(request.body.unwrap()["activities"].as_array().unwrap().len(), 2);

        assert!(builder().add_activities(&feed("user:1"), &[]).unwrap().is_none());
    }

    #[test]
    fn remove_by_id_and_by_foreign_id() {
        let by_id = builder()
            .remove_activity(&feed("user:1"), "54a60c1e-4ee3-494b-a1e3-50c06acb5ed4", false)
            .unwrap();
        assert_eq!(by_id.method, HttpMethod::Delete);
        assert_eq!(by_id.path, "feed/user/1/54a60c1e-4ee3-494b-a1e3-50c06acb5ed4/");
        assert!(by_id.query.is_empty());
        assert_eq!(claims(&by_id).0, "delete");

        let by_fid = builder()
            .remove_activity(&feed("user:1"), "post:42", true)
            .unwrap();
        assert_eq!(by_fid.path, "feed/user/1/post:42/");
        assert_eq!(by_fid.query["foreign_id"], "1");
    }

    #[test]
    fn remove_escapes_path_characters() {
        let request = builder()
            .remove_activity(&feed("user:1"), "a/b c?", true)
            .unwrap();
        assert_eq!(request.path, "feed/user/1/a%2Fb%20c%3F/");
    }

    #[test]
    fn remove_rejects_empty_identifier() {
        let err = builder().remove_activity(&feed("user:1"), "", false).unwrap_err();
        assert!(matches!(err, StreamError::InvalidArgument(_)));
    }

    #[test]
    fn remove_rejects_dot_segments() {
        for identifier in [".", ".."] {
            for by_foreign_id in [false, true] {
                let err = builder()
                    .remove_activity(&feed("user:1"), identifier, by_foreign_id)
                    .unwrap_err();
                assert!(matches!(err, StreamError::InvalidArgument(_)), "{identifier}");
            }
        }
    }

    #[test]
    fn remove_keeps_identifiers_that_only_contain_dots() {
        let request = builder()
            .remove_activity(&feed("user:1"), "...", true)
            .unwrap();
        assert_eq!(request.path, "feed/user/1/.../");

        let request = builder()
            .remove_activity(&feed("user:1"), "v1..2", false)
            .unwrap();
        assert_eq!(request.path, "feed/user/1/v1..2/");
    }

    #[test]
    fn get_activities_uses_read_token_and_query() {
        let request = builder()
            .get_activities(&feed("flat:1"), &PaginationQuery::page(0, 3).with_id_lt("c"))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "feed/flat/1/");
        assert_eq!(request.query["limit"], "3");
        assert_eq!(request.query["offset"], "0");
        assert_eq!(request.query["id_lt"], "c");
        assert!(request.body.is_none());
        assert_eq!(claims(&request).0, "read");
    }

    #[test]
    fn follow_copy_limit_zero_differs_from_default() {
        let zero = builder()
            .follow(&feed("flat:1"), &feed("user:1"), Some(0))
            .unwrap();
        let default = builder()
            .follow(&feed("flat:1"), &feed("user:1"), None)
            .unwrap();

        let zero_body = zero.body.unwrap();
        let default_body = default.body.unwrap();
        assert_eq!(zero_body["activity_copy_limit"], 0);
        assert!(default_body.get("activity_copy_limit").is_none());
        assert_eq!(zero_body["target"], "user:1");
        assert_eq!(zero.path, "feed/flat/1/follows/");

        let target_token = streamfeed_core::SignedToken::new(
            default_body["target_token"].as_str().unwrap(),
        );
        assert_eq!(inspect(&target_token).unwrap().feed_id, "user1");
    }

    #[test]
    fn unfollow_keep_history_is_a_query_flag() {
        let keep = builder()
            .unfollow(&feed("flat:1"), &feed("user:1"), true)
            .unwrap();
        assert_eq!(keep.path, "feed/flat/1/follows/user:1/");
        assert_eq!(keep.query["keep_history"], "true");

        let drop = builder()
            .unfollow(&feed("flat:1"), &feed("user:1"), false)
            .unwrap();
        assert!(drop.query.is_empty());
    }

    #[test]
    fn following_filter_shapes() {
        let targets = [feed("user:42"), feed("user:43")];
        let filtered = builder()
            .following(&feed("flat:1"), 0, 10, Some(&targets))
            .unwrap();
        assert_eq!(filtered.path, "feed/flat/1/follows/");
        assert_eq!(filtered.query["filter"], "user:42,user:43");

        let empty = builder().following(&feed("flat:1"), 0, 10, Some(&[])).unwrap();
        assert_eq!(empty.query["filter"], "");

        let none = builder().following(&feed("flat:1"), 0, 10, None).unwrap();
        assert!(!none.query.contains_key("filter"));
    }

    #[test]
    fn followers_path_and_paging() {
        let request = builder().followers(&feed("user:1"), 5, 20).unwrap();
        assert_eq!(request.path, "feed/user/1/followers/");
        assert_eq!(request.query["offset"], "5");
        assert_eq!(request.query["limit"], "20");
    }

    #[test]
    fn target_update_body_only_carries_supplied_lists() {
        let update = TargetUpdate::diff([], [feed("flat:x")]);
        let request = builder()
            .update_activity_to_targets(&feed("user:1"), "fid1", "2026-01-01T00:00:00", &update)
            .unwrap();
        assert_eq!(request.path, "feed_targets/user/1/activity_to_targets/");
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["foreign_id"], "fid1");
        assert_eq!(body["removed_targets"], json!(["flat:x"]));
        assert!(body.get("added_targets").is_none());
        assert!(body.get("new_targets").is_none());
        assert_eq!(
            claims(&request),
            ("write".into(), "user1".into(), "feed_targets".into())
        );
    }

    #[test]
    fn target_update_validation() {
        let mixed = TargetUpdate {
            new_targets: Some(vec![feed("flat:1")]),
            added_targets: vec![feed("flat:2")],
            removed_targets: Vec::new(),
        };
        assert!(mixed.validate().is_err());
        assert!(TargetUpdate::default().validate().is_err());
        assert!(TargetUpdate::diff([feed("flat:1")], [feed("flat:1")]).validate().is_err());
        assert!(TargetUpdate::replace([feed("flat:1")]).validate().is_ok());
        assert!(TargetUpdate::replace([]).validate().is_ok());
    }

    #[test]
    fn update_activities_uses_activities_resource_token() {
        let activity = Activity::new("1", "tweet", "1")
            .with_foreign_id("fid")
            .with_time("2026-01-01T00:00:00");
        let request = builder().update_activities(&[activity]).unwrap().unwrap();
        assert_eq!(request.path, "activities/");
        assert_eq!(claims(&request), ("*".into(), "*".into(), "activities".into()));

        assert!(builder().update_activities(&[]).unwrap().is_none());
    }

    #[test]
    fn lookups_by_id_and_foreign_id() {
        let by_id = builder()
            .get_activities_by_id(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(by_id.path, "activity/");
        assert_eq!(by_id.query["ids"], "a,b");

        let by_fid = builder()
            .get_activities_by_foreign_id(&[
                ForeignIdTime::new("like:1", "2026-01-01T00:00:00"),
                ForeignIdTime::new("like:2", "2026-01-02T00:00:00"),
            ])
            .unwrap();
        assert_eq!(by_fid.query["foreign_ids"], "like:1,like:2");
        assert_eq!(by_fid.query["timestamps"], "2026-01-01T00:00:00,2026-01-02T00:00:00");

        assert!(builder().get_activities_by_id(&[]).is_err());
        assert!(builder().get_activities_by_foreign_id(&[]).is_err());
    }

    #[test]
    fn partial_update_carries_dotted_paths() {
        let mut set = Map::new();
        set.insert("product.price".into(), json!(19.99));
        set.insert("shares".into(), json!({"facebook": "...", "twitter": "..."}));
        let unset = vec!["daily_likes".to_string(), "popularity".to_string()];

        let request = builder()
            .partial_update(&ActivityRef::id("54a60c1e"), &set, &unset)
            .unwrap();
        let body = request.body.unwrap();
        assert_eq!(body["id"], "54a60c1e");
        assert_eq!(body["set"]["product.price"], 19.99);
        assert_eq!(body["unset"], json!(["daily_likes", "popularity"]));
    }

    #[test]
    fn partial_update_keeps_dotted_keys_literal() {
        let mut set = Map::new();
        set.insert("foo.bar".into(), json!(999));
        let unset = vec!["foo.qux".to_string()];

        let request = builder()
            .partial_update(&ActivityRef::id("54a60c1e"), &set, &unset)
            .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "activity/");
        assert!(request.query.is_empty());
        assert_eq!(
            request.body.unwrap(),
            json!({
                "id": "54a60c1e",
                "set": {"foo.bar": 999},
                "unset": ["foo.qux"],
            })
        );
    }

    #[test]
    fn partial_update_by_foreign_id_and_empty_change() {
        let request = builder()
            .partial_update(
                &ActivityRef::foreign_id("product:123", "2016-11-10T13:20:00"),
                &Map::new(),
                &[],
            )
            .unwrap();
        let body = request.body.unwrap();
        assert_eq!(body["foreign_id"], "product:123");
        assert_eq!(body["time"], "2016-11-10T13:20:00");
        assert_eq!(body["set"], json!({}));
        assert_eq!(body["unset"], json!([]));
        assert!(body.get("id").is_none());
    }
}
