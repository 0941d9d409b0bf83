//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Uploaded PDFs
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    file_name TEXT NOT NULL,
    file_blob_url TEXT NOT NULL,
    -- Minted on first share, reused afterwards
    share_token TEXT UNIQUE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(owner_id, created_at);

-- Invited emails, rowid order is insertion order
CREATE TABLE IF NOT EXISTS document_invites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id TEXT NOT NULL REFERENCES documents(id),
    email TEXT NOT NULL,
    invited_at TEXT NOT NULL,

    UNIQUE(document_id, email)
);

CREATE INDEX IF NOT EXISTS idx_invites_document ON document_invites(document_id);

-- Append-only comment threads
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    author_identifier TEXT NOT NULL,
    author_kind TEXT NOT NULL DEFAULT 'anonymous',
    text TEXT NOT NULL,
    parent_comment_id TEXT REFERENCES comments(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_document ON comments(document_id, created_at);
CREATE INDEX IF NOT EXISTS idx_comments_parent ON comments(parent_comment_id);
"#;
