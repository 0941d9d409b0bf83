//! Comment types

use serde::{Deserialize, Serialize};

use crate::auth::AuthorKind;

/// Longest stored comment, in characters
pub const MAX_COMMENT_CHARS: usize = 1000;

/// A stored comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub document_id: String,
    pub author_identifier: String,
    pub author_kind: AuthorKind,
    pub text: String,
    pub parent_comment_id: Option<String>,
    pub created_at: String,
}

/// A comment with its parent expanded one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub parent_comment: Option<Comment>,
}

/// Trim and cap comment text. `None` when nothing is left.
pub fn sanitize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_COMMENT_CHARS).collect())
}

/// Row shape of a comment joined with its parent
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: String,
    pub document_id: String,
    pub author_identifier: String,
    pub author_kind: String,
    pub text: String,
    pub parent_comment_id: Option<String>,
    pub created_at: String,
    pub parent_id: Option<String>,
    pub parent_document_id: Option<String>,
    pub parent_author_identifier: Option<String>,
    pub parent_author_kind: Option<String>,
    pub parent_text: Option<String>,
    pub parent_parent_comment_id: Option<String>,
    pub parent_created_at: Option<String>,
}

impl CommentRow {
    pub fn into_view(self) -> CommentView {
        let parent_comment = match (
            self.parent_id,
            self.parent_document_id,
            self.parent_author_identifier,
            self.parent_text,
            self.parent_created_at,
        ) {
            (Some(id), Some(document_id), Some(author_identifier), Some(text), Some(created_at)) => {
                Some(Comment {
                    id,
                    document_id,
                    author_identifier,
                    author_kind: AuthorKind::from_db(self.parent_author_kind.as_deref().unwrap_or_default()),
                    text,
                    parent_comment_id: self.parent_parent_comment_id,
                    created_at,
                })
            }
            _ => None,
        };

        CommentView {
            comment: Comment {
                id: self.id,
                document_id: self.document_id,
                author_identifier: self.author_identifier,
                author_kind: AuthorKind::from_db(&self.author_kind),
                text: self.text,
                parent_comment_id: self.parent_comment_id,
                created_at: self.created_at,
            },
            parent_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  nice doc \n"), Some("nice doc".to_string()));
        assert_eq!(sanitize_text(" \t\n "), None);
        assert_eq!(sanitize_text(""), None);

        let long = "é".repeat(5000);
        assert_eq!(sanitize_text(&long).unwrap().chars().count(), MAX_COMMENT_CHARS);
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = CommentView {
            comment: Comment {
                id: "c1".to_string(),
                document_id: "d1".to_string(),
                author_identifier: "Anonymous".to_string(),
                author_kind: AuthorKind::Anonymous,
                text: "hi".to_string(),
                parent_comment_id: None,
                created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            },
            parent_comment: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["authorIdentifier"], "Anonymous");
        assert_eq!(json["authorKind"], "anonymous");
        assert!(json["parentComment"].is_null());
    }
}
