//! Comment attribution

use serde::{Deserialize, Serialize};

use super::Identity;

/// Identifier stored when nothing better is known
pub const ANONYMOUS: &str = "Anonymous";

/// Who wrote a comment, tagged with how much we trust it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// Verified through a bearer credential
    Authenticated { user_id: String, email: Option<String> },
    /// Email typed in by an unauthenticated caller
    Claimed(String),
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    Authenticated,
    Claimed,
    Anonymous,
}

impl AuthorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorKind::Authenticated => "authenticated",
            AuthorKind::Claimed => "claimed",
            AuthorKind::Anonymous => "anonymous",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "authenticated" => AuthorKind::Authenticated,
            "claimed" => AuthorKind::Claimed,
            _ => AuthorKind::Anonymous,
        }
    }
}

impl Author {
    /// Authenticated identity wins, then a caller-supplied email, then anonymous
    pub fn resolve(identity: Option<&Identity>, claimed_email: Option<&str>) -> Self {
        if let Some(identity) = identity {
            return Author::Authenticated {
                user_id: identity.id.clone(),
                email: identity.email.clone(),
            };
        }

        match claimed_email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => Author::Claimed(email.to_string()),
            None => Author::Anonymous,
        }
    }

    pub fn kind(&self) -> AuthorKind {
        match self {
            Author::Authenticated { .. } => AuthorKind::Authenticated,
            Author::Claimed(_) => AuthorKind::Claimed,
            Author::Anonymous => AuthorKind::Anonymous,
        }
    }

    /// Display string persisted with the comment
    pub fn identifier(&self) -> &str {
        match self {
            Author::Authenticated { user_id, email } => email.as_deref().unwrap_or(user_id.as_str()),
            Author::Claimed(email) => email,
            Author::Anonymous => ANONYMOUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>) -> Identity {
        Identity {
            id: "user-1".to_string(),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_authenticated_beats_claimed() {
        let id = identity(Some("a@x.com"));
        let author = Author::resolve(Some(&id), Some("spoof@x.com"));
        assert_eq!(author.kind(), AuthorKind::Authenticated);
        assert_eq!(author.identifier(), "a@x.com");
    }

    #[test]
    fn test_authenticated_without_email_uses_id() {
        let id = identity(None);
        assert_eq!(Author::resolve(Some(&id), None).identifier(), "user-1");
    }

    #[test]
    fn test_claimed_and_anonymous_fallback() {
        let claimed = Author::resolve(None, Some("  b@x.com "));
        assert_eq!(claimed, Author::Claimed("b@x.com".to_string()));
        assert_eq!(claimed.kind(), AuthorKind::Claimed);

        assert_eq!(Author::resolve(None, Some("   ")), Author::Anonymous);
        assert_eq!(Author::resolve(None, None).identifier(), ANONYMOUS);
    }

    #[test]
    fn test_kind_db_round_trip() {
        for kind in [AuthorKind::Authenticated, AuthorKind::Claimed, AuthorKind::Anonymous] {
            assert_eq!(AuthorKind::from_db(kind.as_str()), kind);
        }
    }
}
