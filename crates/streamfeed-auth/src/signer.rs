// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HS256 token signing with the shared API secret.
//!
//! Tokens are compact JWTs (`header.claims.signature`, base64url without
//! padding). Signing is deterministic: the same secret and claim set always
//! produce the same token, so no network round trip is ever needed.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use streamfeed_core::{FeedRef, SignedToken, StreamError};
use tracing::trace;

use crate::claims::{Action, Resource, TokenClaims, TokenKind};

/// Signs every token kind with one immutable secret.
///
/// Holds no mutable state and can be shared across tasks freely.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Signs the claim set of `kind`.
    pub fn sign(&self, kind: &TokenKind) -> Result<SignedToken, StreamError> {
        self.sign_claims(&kind.claims())
    }

    /// Signs an explicit claim set.
    pub fn sign_claims(&self, claims: &TokenClaims) -> Result<SignedToken, StreamError> {
        trace!(
            action = %claims.action,
            feed_id = %claims.feed_id,
            resource = %claims.resource,
            "signing token"
        );
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(SignedToken::new)
            .map_err(|e| StreamError::Signing(format!("failed to encode token: {e}")))
    }

    /// Token granting `action` on every resource of `feed`.
    pub fn feed_token(&self, feed: &FeedRef, action: Action) -> Result<SignedToken, StreamError> {
        self.sign(&TokenKind::feed(feed.clone(), action))
    }

    /// Read-only token for `feed`.
    pub fn readonly_token(&self, feed: &FeedRef) -> Result<SignedToken, StreamError> {
        self.sign(&TokenKind::Readonly(feed.clone()))
    }

    /// Token for one resource of one feed.
    pub fn feed_resource_token(
        &self,
        feed: &FeedRef,
        resource: Resource,
        action: Action,
    ) -> Result<SignedToken, StreamError> {
        self.sign(&TokenKind::FeedResource {
            feed: feed.clone(),
            resource,
            action,
        })
    }

    /// Token for an application-wide resource such as `activities`.
    pub fn resource_token(
        &self,
        resource: Resource,
        action: Action,
    ) -> Result<SignedToken, StreamError> {
        self.sign(&TokenKind::resource(resource, action))
    }

    /// Token for endpoints that span the whole application.
    pub fn application_token(&self) -> Result<SignedToken, StreamError> {
        self.sign(&TokenKind::Application)
    }

    /// Verifies the signature of `token` and returns its claims.
    pub fn verify(&self, token: &SignedToken) -> Result<TokenClaims, StreamError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        jsonwebtoken::decode::<TokenClaims>(token.as_str(), &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| StreamError::Signing(format!("token verification failed: {e}")))
    }
}

/// Decodes the claims segment of a token without checking its signature.
pub fn inspect(token: &SignedToken) -> Result<TokenClaims, StreamError> {
    let mut segments = token.as_str().split('.');
    let (Some(_header), Some(claims), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(StreamError::invalid("token must have exactly three segments"));
    };

    let raw = URL_SAFE_NO_PAD
        .decode(claims)
        .map_err(|e| StreamError::invalid(format!("token claims are not base64url: {e}")))?;
    Ok(serde_json::from_slice(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const READONLY_PREFIX: &str =
        "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJhY3Rpb24iOiJyZWFkI";

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("test-secret".to_string()))
    }

    fn user1() -> FeedRef {
        FeedRef::new("user", "1").unwrap()
    }

    #[test]
    fn readonly_token_has_stable_prefix() {
        let token = signer().readonly_token(&user1()).unwrap();
        assert!(token.as_str().starts_with(READONLY_PREFIX), "got: {}", token.as_str());
    }

    #[test]
    fn readonly_token_matches_known_value() {
        let token = signer().readonly_token(&user1()).unwrap();
        assert_eq!(
            token.as_str(),
            "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9\
             .eyJhY3Rpb24iOiJyZWFkIiwiZmVlZF9pZCI6InVzZXIxIiwicmVzb3VyY2UiOiIqIn0\
             .zkDck3QT3nfAJCm9OKiHkKlffx20MXNX-gb0wR1kRrg"
        );
    }

    #[test]
    fn application_token_matches_known_value() {
        let token = signer().application_token().unwrap();
        assert_eq!(
            token.as_str(),
            "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9\
             .eyJhY3Rpb24iOiIqIiwiZmVlZF9pZCI6IioiLCJyZXNvdXJjZSI6IioifQ\
             .H-ecZ0X-rHghJYWi3nKcQG-csdPtDP-u_Mm9FqkGCNQ"
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let a = signer().readonly_token(&user1()).unwrap();
        let b = signer().readonly_token(&user1()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_secrets_give_different_signatures() {
        let other = TokenSigner::new(&SecretString::from("other-secret".to_string()));
        let a = signer().readonly_token(&user1()).unwrap();
        let b = other.readonly_token(&user1()).unwrap();
        assert_ne!(a, b);
        assert!(b.as_str().starts_with(READONLY_PREFIX));
    }

    #[test]
    fn inspect_reads_claims_without_secret() {
        let token = signer().readonly_token(&user1()).unwrap();
        let claims = inspect(&token).unwrap();
        assert_eq!(claims.action, "read");
        assert_eq!(claims.feed_id, "user1");
        assert_eq!(claims.resource, "*");
    }

    #[test]
    fn inspect_rejects_malformed_tokens() {
        assert!(inspect(&SignedToken::new("only.two")).is_err());
        assert!(inspect(&SignedToken::new("a.b.c.d")).is_err());
        assert!(inspect(&SignedToken::new("a.!!!.c")).is_err());
    }

    #[test]
    fn verify_round_trips_every_kind() {
        let signer = signer();
        let kinds = [
            TokenKind::feed(user1(), Action::All),
            TokenKind::Readonly(user1()),
            TokenKind::FeedResource {
                feed: user1(),
                resource: Resource::FeedTargets,
                action: Action::Write,
            },
            TokenKind::resource(Resource::Activities, Action::All),
            TokenKind::Application,
        ];
        for kind in kinds {
            let token = signer.sign(&kind).unwrap();
            assert_eq!(signer.verify(&token).unwrap(), kind.claims());
        }
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let other = TokenSigner::new(&SecretString::from("other-secret".to_string()));
        let token = other.application_token().unwrap();
        assert!(matches!(signer().verify(&token), Err(StreamError::Signing(_))));
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("test-secret"));
    }
}
