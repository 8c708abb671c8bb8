// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed click-tracking URLs for the analytics redirect endpoint.

use serde_json::{Map, Value};
use streamfeed_auth::TokenSigner;
use streamfeed_core::StreamError;
use url::Url;

/// Builds redirect URLs against one analytics endpoint.
#[derive(Debug, Clone)]
pub struct RedirectUrlBuilder {
    endpoint: Url,
    api_key: String,
}

impl RedirectUrlBuilder {
    /// `endpoint` is the full redirect URL, e.g.
    /// `https://analytics.stream-io-api.com/analytics/v1.0/redirect/`.
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self, StreamError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            StreamError::Config(format!("invalid analytics endpoint `{endpoint}`: {e}"))
        })?;
        Ok(Self {
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Returns a URL that records `events` and then redirects to `target_url`.
    ///
    /// The target and the JSON-encoded events are each escaped exactly once.
    pub fn build(
        &self,
        signer: &TokenSigner,
        target_url: &str,
        events: &[Map<String, Value>],
    ) -> Result<Url, StreamError> {
        Url::parse(target_url)
            .map_err(|e| StreamError::invalid(format!("invalid target url `{target_url}`: {e}")))?;

        let token = signer.application_token()?;
        let events = serde_json::to_string(events)?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("api_key", &self.api_key)
            .append_pair("url", target_url)
            .append_pair("auth_type", "jwt")
            .append_pair("authorization", token.as_str())
            .append_pair("events", &events);
        tracing::debug!(target_url, "built redirect url");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;
    use streamfeed_core::SignedToken;

    fn builder() -> RedirectUrlBuilder {
        RedirectUrlBuilder::new(
            "https://analytics.stream-io-api.com/analytics/v1.0/redirect/",
            "key",
        )
        .unwrap()
    }

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("test-secret"))
    }

    fn events() -> Vec<Map<String, Value>> {
        let impression = json!({
            "content_list": ["tweet:1", "tweet:2"],
            "feed_id": "user:global",
            "user_id": "tommaso",
        });
        let engagement = json!({
            "content": "tweet:2",
            "label": "click",
            "position": 1,
            "feed_id": "user:global",
            "user_id": "tommaso",
        });
        [impression, engagement]
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    }

    #[test]
    fn query_round_trips_to_original_values() {
        let url = builder()
            .build(&signer(), "http://google.com/?a=b&c=d", &events())
            .unwrap();
        assert_eq!(url.path(), "/analytics/v1.0/redirect/");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("api_key"), "key");
        assert_eq!(get("url"), "http://google.com/?a=b&c=d");
        assert_eq!(get("auth_type"), "jwt");

        let decoded: Vec<Value> = serde_json::from_str(&get("events")).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1]["label"], "click");

        let claims = streamfeed_auth::inspect(&SignedToken::new(get("authorization"))).unwrap();
        assert_eq!(claims.action, "*");
    }

    #[test]
    fn target_is_escaped_exactly_once() {
        let url = builder()
            .build(&signer(), "http://google.com/?a=b&c=d", &[])
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("url=http%3A%2F%2Fgoogle.com%2F%3Fa%3Db%26c%3Dd"), "{query}");
        assert!(!query.contains("%253A"), "{query}");
        assert!(query.contains("events=%5B%5D"), "{query}");
    }

    #[test]
    fn invalid_target_is_rejected() {
        let err = builder().build(&signer(), "not a url", &[]).unwrap_err();
        assert!(matches!(err, StreamError::InvalidArgument(_)));
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        assert!(matches!(
            RedirectUrlBuilder::new("::", "key"),
            Err(StreamError::Config(_))
        ));
    }
}
