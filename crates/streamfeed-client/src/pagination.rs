// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-string encoding of [`PaginationQuery`] and next-page extraction.
//!
//! Every present field becomes exactly one query parameter. `mark_read` and
//! `mark_seen` encode as `true` for "the whole page" and as a comma-joined id
//! list for explicit ids, so the two cases never collide. An empty id list is
//! not sent.

use std::collections::BTreeMap;

use streamfeed_core::{ApiResponse, FeedRef, MarkRead, PaginationQuery, StreamError};
use url::Url;

/// Writes the present fields of `query` into `params`.
pub fn encode(query: &PaginationQuery, params: &mut BTreeMap<String, String>) {
    let mut put = |key: &str, value: String| {
        params.insert(key.to_string(), value);
    };

    if let Some(offset) = query.offset {
        put("offset", offset.to_string());
    }
    if let Some(limit) = query.limit {
        put("limit", limit.to_string());
    }
    if let Some(id) = &query.id_gt {
        put("id_gt", id.clone());
    }
    if let Some(id) = &query.id_lt {
        put("id_lt", id.clone());
    }
    if let Some(id) = &query.id_gte {
        put("id_gte", id.clone());
    }
    if let Some(id) = &query.id_lte {
        put("id_lte", id.clone());
    }
    if let Some(mark) = query.mark_read.as_ref().and_then(encode_mark) {
        put("mark_read", mark);
    }
    if let Some(mark) = query.mark_seen.as_ref().and_then(encode_mark) {
        put("mark_seen", mark);
    }
    if let Some(ranking) = &query.ranking {
        put("ranking", ranking.clone());
    }
    if let Some(filter) = &query.filter {
        let joined = filter
            .iter()
            .map(FeedRef::wire_id)
            .collect::<Vec<_>>()
            .join(",");
        put("filter", joined);
    }
}

/// An empty id list marks nothing and is left out.
fn encode_mark(mark: &MarkRead) -> Option<String> {
    match mark {
        MarkRead::All => Some("true".to_string()),
        MarkRead::Ids(ids) if ids.is_empty() => None,
        MarkRead::Ids(ids) => Some(ids.join(",")),
    }
}

fn decode_mark(raw: &str) -> MarkRead {
    if raw.eq_ignore_ascii_case("true") {
        MarkRead::All
    } else {
        MarkRead::Ids(split_list(raw))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the query string of a `next` URL back into a [`PaginationQuery`].
///
/// Accepts both absolute URLs and the service's root-relative form
/// (`/api/v1.0/feed/user/1/?id_lt=...`). Unknown parameters are ignored.
pub fn parse_next_url(next: &str) -> Result<PaginationQuery, StreamError> {
    let url = match Url::parse(next) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .and_then(|base| base.join(next))
            .map_err(|e| StreamError::invalid(format!("invalid next url `{next}`: {e}")))?,
        Err(e) => return Err(StreamError::invalid(format!("invalid next url `{next}`: {e}"))),
    };

    let mut query = PaginationQuery::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "offset" => query.offset = Some(parse_number(&key, &value)?),
            "limit" => query.limit = Some(parse_number(&key, &value)?),
            "id_gt" => query.id_gt = Some(value.into_owned()),
            "id_lt" => query.id_lt = Some(value.into_owned()),
            "id_gte" => query.id_gte = Some(value.into_owned()),
            "id_lte" => query.id_lte = Some(value.into_owned()),
            "mark_read" => query.mark_read = Some(decode_mark(&value)),
            "mark_seen" => query.mark_seen = Some(decode_mark(&value)),
            "ranking" => query.ranking = Some(value.into_owned()),
            "filter" => {
                let feeds = split_list(&value)
                    .iter()
                    .map(|id| FeedRef::parse(id))
                    .collect::<Result<Vec<_>, _>>()?;
                query.filter = Some(feeds);
            }
            _ => {}
        }
    }
    Ok(query)
}

fn parse_number(key: &str, value: &str) -> Result<u32, StreamError> {
    value
        .parse()
        .map_err(|_| StreamError::invalid(format!("`{key}` in next url is not a number: {value}")))
}

/// The query for the page after `response`, if the service reported one.
pub fn next_page(response: &ApiResponse) -> Result<Option<PaginationQuery>, StreamError> {
    response.next_url().map(parse_next_url).transpose()
}
