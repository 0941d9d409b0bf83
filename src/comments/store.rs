//! SQLite storage for comments

use sqlx::SqlitePool;

use super::types::{sanitize_text, CommentRow, CommentView};
use crate::auth::Author;
use crate::db::timestamp_now;
use crate::documents::DocumentRegistry;
use crate::error::{AppError, Result};
use crate::ids::{generate_id, parse_id};

const SELECT_WITH_PARENT: &str = r#"
    SELECT c.id, c.document_id, c.author_identifier, c.author_kind, c.text,
           c.parent_comment_id, c.created_at,
           p.id AS parent_id,
           p.document_id AS parent_document_id,
           p.author_identifier AS parent_author_identifier,
           p.author_kind AS parent_author_kind,
           p.text AS parent_text,
           p.parent_comment_id AS parent_parent_comment_id,
           p.created_at AS parent_created_at
    FROM comments c
    LEFT JOIN comments p ON p.id = c.parent_comment_id
"#;

/// Repository for comment persistence
pub struct CommentStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentStore<'a> {
    /// Create a new store
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a comment, optionally as a reply to `parent_comment_id`
    pub async fn add(
        &self,
        document_id: &str,
        author: &Author,
        text: &str,
        parent_comment_id: Option<&str>,
    ) -> Result<CommentView> {
        let text = match sanitize_text(text) {
            Some(text) if !document_id.trim().is_empty() => text,
            _ => {
                return Err(AppError::Validation(
                    "Document ID and text are required".to_string(),
                ))
            }
        };
        let document_id = parse_id(document_id, "document id")?;
        let parent_comment_id = parent_comment_id
            .filter(|id| !id.trim().is_empty())
            .map(|id| parse_id(id, "parent comment id"))
            .transpose()?;

        if DocumentRegistry::new(self.pool).get(&document_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Document not found: {}", document_id)));
        }

        if let Some(parent_id) = &parent_comment_id {
            let parent = self
                .get(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Parent comment not found: {}", parent_id)))?;

            if parent.comment.document_id != document_id {
                return Err(AppError::Validation(
                    "Parent comment belongs to a different document".to_string(),
                ));
            }
        }

        let id = generate_id();

        sqlx::query(
            r#"
            INSERT INTO comments (id, document_id, author_identifier, author_kind, text, parent_comment_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&document_id)
        .bind(author.identifier())
        .bind(author.kind().as_str())
        .bind(&text)
        .bind(&parent_comment_id)
        .bind(timestamp_now())
        .execute(self.pool)
        .await?;

        tracing::info!(
            comment_id = %id,
            document_id = %document_id,
            author_kind = author.kind().as_str(),
            reply = parent_comment_id.is_some(),
            "Comment added"
        );

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created comment".to_string()))
    }

    /// Get a comment by ID, with its parent expanded
    pub async fn get(&self, id: &str) -> Result<Option<CommentView>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{} WHERE c.id = ?", SELECT_WITH_PARENT))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(CommentRow::into_view))
    }

    /// List a document's comments, newest first
    pub async fn list_for_document(&self, document_id: &str) -> Result<Vec<CommentView>> {
        let document_id = parse_id(document_id, "document id")?;

        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.document_id = ? ORDER BY c.created_at DESC, c.rowid DESC",
            SELECT_WITH_PARENT
        ))
        .bind(&document_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_view).collect())
    }
}
