//! Bearer credential verification
//!
//! Tokens are issued by an external identity provider. This module only
//! verifies them and turns the claims into an [`Identity`]. Request handlers
//! receive the result through the extractors in [`session`].

mod author;
mod session;

pub use author::{Author, AuthorKind, ANONYMOUS};
pub use session::{RequireIdentity, Session};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user id (`sub` claim)
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<Identity>;
}

/// HS256 verifier sharing a secret with the identity provider
pub struct Hs256Verifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
}

impl Hs256Verifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token the way the identity provider does
    pub fn issue(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

#[async_trait]
impl TokenVerifier for Hs256Verifier {
    async fn verify(&self, token: &str) -> Option<Identity> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Some(Identity {
                id: data.claims.sub,
                email: data.claims.email.filter(|e| !e.trim().is_empty()),
            }),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}

/// Pull the credential out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` as well as a bare token.
pub fn credential_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case("bearer") => return None,
        None => value,
    };
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_verify() {
        let verifier = Hs256Verifier::new("secret");
        let token = verifier
            .issue("user-1", Some("a@x.com"), Duration::hours(1))
            .unwrap();

        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.email.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_rejects_foreign_and_expired_tokens() {
        let verifier = Hs256Verifier::new("secret");
        let other = Hs256Verifier::new("other-secret");

        let foreign = other.issue("user-1", None, Duration::hours(1)).unwrap();
        assert!(verifier.verify(&foreign).await.is_none());

        let expired = verifier.issue("user-1", None, Duration::hours(-2)).unwrap();
        assert!(verifier.verify(&expired).await.is_none());

        assert!(verifier.verify("garbage").await.is_none());
    }

    #[test]
    fn test_credential_from_header() {
        assert_eq!(credential_from_header("Bearer abc.def"), Some("abc.def"));
        assert_eq!(credential_from_header("bearer  abc.def "), Some("abc.def"));
        assert_eq!(credential_from_header("abc.def"), Some("abc.def"));
        assert_eq!(credential_from_header("Basic dXNlcg=="), None);
        assert_eq!(credential_from_header("Bearer "), None);
        assert_eq!(credential_from_header(""), None);
    }
}
