//! Document persistence and sharing

use std::collections::HashMap;

use sqlx::SqlitePool;

use super::share::mint_share_token;
use super::types::{Document, DocumentRow};
use crate::db::timestamp_now;
use crate::error::{AppError, Result};
use crate::ids::{generate_id, parse_id};
use crate::notify::ShareMailer;

/// Repository for documents and their invite lists
pub struct DocumentRegistry<'a> {
    pool: &'a SqlitePool,
}

/// Trim, lowercase and de-duplicate invite emails, keeping first-seen order.
/// Blank entries are dropped; anything without an `@` is rejected.
pub fn normalize_emails(emails: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(emails.len());

    for raw in emails {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            continue;
        }
        if !email.contains('@') {
            return Err(AppError::Validation(format!("Invalid email address: {}", raw.trim())));
        }
        if !normalized.contains(&email) {
            normalized.push(email);
        }
    }

    Ok(normalized)
}

impl<'a> DocumentRegistry<'a> {
    /// Create a new registry
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a newly uploaded document
    pub async fn create(&self, owner_id: &str, file_name: &str, file_blob_url: &str) -> Result<Document> {
        let file_name = file_name.trim();
        let file_blob_url = file_blob_url.trim();

        if owner_id.trim().is_empty() {
            return Err(AppError::Validation("Owner is required".to_string()));
        }
        if file_name.is_empty() {
            return Err(AppError::Validation("File name is required".to_string()));
        }
        if file_blob_url.is_empty() {
            return Err(AppError::Validation("No file uploaded".to_string()));
        }

        let row = DocumentRow {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            file_name: file_name.to_string(),
            file_blob_url: file_blob_url.to_string(),
            share_token: None,
            created_at: timestamp_now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents (id, owner_id, file_name, file_blob_url, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.owner_id)
        .bind(&row.file_name)
        .bind(&row.file_blob_url)
        .bind(&row.created_at)
        .execute(self.pool)
        .await?;

        tracing::info!(document_id = %row.id, owner_id = %row.owner_id, "Document created");

        Ok(row.into_document(Vec::new()))
    }

    /// Get a document by ID
    pub async fn get(&self, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, owner_id, file_name, file_blob_url, share_token, created_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let invited = self.invites_for(&row.id).await?;
                Ok(Some(row.into_document(invited)))
            }
            None => Ok(None),
        }
    }

    /// List an owner's documents, newest first
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, owner_id, file_name, file_blob_url, share_token, created_at
            FROM documents
            WHERE owner_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        let invites: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT i.document_id, i.email
            FROM document_invites i
            JOIN documents d ON d.id = i.document_id
            WHERE d.owner_id = ?
            ORDER BY i.id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        let mut by_document: HashMap<String, Vec<String>> = HashMap::new();
        for (document_id, email) in invites {
            by_document.entry(document_id).or_default().push(email);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let invited = by_document.remove(&row.id).unwrap_or_default();
                row.into_document(invited)
            })
            .collect())
    }

    /// Share a document: invite `emails` and return the share token.
    ///
    /// The token is minted on the first share and reused afterwards. Invites
    /// are emailed in the background once the change is committed.
    pub async fn share(
        &self,
        mailer: &ShareMailer,
        owner_id: &str,
        document_id: &str,
        emails: &[String],
    ) -> Result<String> {
        let document_id = parse_id(document_id, "document id")?;
        let emails = normalize_emails(emails)?;

        let document = self
            .get(&document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", document_id)))?;

        if document.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Only the owner can share this document".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Only fills the column when it is still empty
        sqlx::query("UPDATE documents SET share_token = COALESCE(share_token, ?) WHERE id = ?")
            .bind(mint_share_token(&document_id))
            .bind(&document_id)
            .execute(&mut *tx)
            .await?;

        let invited_at = timestamp_now();
        for email in &emails {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO document_invites (document_id, email, invited_at)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&document_id)
            .bind(email)
            .bind(&invited_at)
            .execute(&mut *tx)
            .await?;
        }

        let (token,): (Option<String>,) =
            sqlx::query_as("SELECT share_token FROM documents WHERE id = ?")
                .bind(&document_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        let token = token.ok_or_else(|| {
            AppError::Internal(format!("Share token missing after update: {}", document_id))
        })?;

        tracing::info!(
            document_id = %document_id,
            invited = emails.len(),
            "Document shared"
        );

        mailer.dispatch(emails, &token);

        Ok(token)
    }

    async fn invites_for(&self, document_id: &str) -> Result<Vec<String>> {
        let emails: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM document_invites WHERE document_id = ? ORDER BY id ASC",
        )
        .bind(document_id)
        .fetch_all(self.pool)
        .await?;

        Ok(emails.into_iter().map(|(email,)| email).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::db::memory_pool;
    use crate::documents::parse_share_token;
    use crate::notify::testing::{FailingNotifier, RecordingNotifier};
    use crate::notify::LogNotifier;

    fn mailer() -> ShareMailer {
        ShareMailer::new(Arc::new(LogNotifier), "http://app.test")
    }

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_requires_name_and_url() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);

        assert!(matches!(
            registry.create("user-a", "report.pdf", "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            registry.create("user-a", "  ", "memory://pdfs/x.pdf").await,
            Err(AppError::Validation(_))
        ));
        assert!(registry.list_for_owner("user-a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);

        let first = registry.create("user-a", "one.pdf", "memory://1").await.unwrap();
        let other = registry.create("user-b", "theirs.pdf", "memory://2").await.unwrap();
        let second = registry.create("user-a", "two.pdf", "memory://3").await.unwrap();

        let listed = registry.list_for_owner("user-a").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(!ids.contains(&other.id.as_str()));
    }

    #[tokio::test]
    async fn test_share_missing_document() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);

        let result = registry
            .share(&mailer(), "user-a", "aaaaaaaaaaaaaaaaaaaaaaaa", &emails(&["b@x.com"]))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = registry
            .share(&mailer(), "user-a", "not-an-id", &emails(&["b@x.com"]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_share_by_non_owner_is_forbidden() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();

        let result = registry
            .share(&mailer(), "user-b", &document.id, &emails(&["c@x.com"]))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        // Nothing was written
        let stored = registry.get(&document.id).await.unwrap().unwrap();
        assert!(stored.share_token.is_none());
        assert!(stored.invited_identities.is_empty());
    }

    #[tokio::test]
    async fn test_reshare_reuses_token_and_dedupes_invites() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();

        let first = registry
            .share(&mailer(), "user-a", &document.id, &emails(&["b@x.com", "c@x.com"]))
            .await
            .unwrap();
        let second = registry
            .share(&mailer(), "user-a", &document.id, &emails(&["B@x.com ", "d@x.com"]))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(parse_share_token(&first).unwrap(), document.id);

        let stored = registry.get(&document.id).await.unwrap().unwrap();
        assert_eq!(stored.share_token.as_deref(), Some(first.as_str()));
        assert_eq!(stored.invited_identities, emails(&["b@x.com", "c@x.com", "d@x.com"]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_shares_keep_one_token_and_every_invite() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("share.db").display());
        let pool = crate::db::create_pool(&url).await.unwrap();
        let document = DocumentRegistry::new(&pool)
            .create("user-a", "report.pdf", "memory://1")
            .await
            .unwrap();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let pool = pool.clone();
                let document_id = document.id.clone();
                tokio::spawn(async move {
                    DocumentRegistry::new(&pool)
                        .share(&mailer(), "user-a", &document_id, &[format!("user{}@x.com", i)])
                        .await
                })
            })
            .collect();

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.unwrap().unwrap());
        }
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), 1);

        let stored = DocumentRegistry::new(&pool).get(&document.id).await.unwrap().unwrap();
        assert_eq!(stored.share_token.as_deref(), Some(tokens[0].as_str()));
        assert_eq!(stored.invited_identities.len(), 32);
        for i in 0..32 {
            assert!(stored.invited_identities.contains(&format!("user{}@x.com", i)));
        }
    }

    #[tokio::test]
    async fn test_share_rejects_invalid_email_before_writing() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();

        let result = registry
            .share(&mailer(), "user-a", &document.id, &emails(&["b@x.com", "nope"]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let stored = registry.get(&document.id).await.unwrap().unwrap();
        assert!(stored.share_token.is_none());
    }

    #[tokio::test]
    async fn test_share_sends_invites() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();

        let (notifier, mut rx) = RecordingNotifier::new();
        let mailer = ShareMailer::new(Arc::new(notifier), "http://app.test");

        let token = registry
            .share(&mailer, "user-a", &document.id, &emails(&["b@x.com"]))
            .await
            .unwrap();

        let invite = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(invite.to, "b@x.com");
        assert!(invite.body.ends_with(&format!("/shared/{}", token)));
    }

    #[tokio::test]
    async fn test_share_succeeds_when_notifier_fails() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();
        let mailer = ShareMailer::new(Arc::new(FailingNotifier), "http://app.test");

        let token = registry
            .share(&mailer, "user-a", &document.id, &emails(&["b@x.com"]))
            .await;
        assert!(token.is_ok());
    }

    #[test]
    fn test_normalize_emails() {
        let normalized = normalize_emails(&emails(&[" A@x.com", "", "a@x.com", "b@x.com"])).unwrap();
        assert_eq!(normalized, emails(&["a@x.com", "b@x.com"]));
        assert!(normalize_emails(&emails(&["plainaddress"])).is_err());
    }
}
