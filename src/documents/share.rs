//! Share token minting and resolution

use sqlx::SqlitePool;

use super::registry::DocumentRegistry;
use super::types::Document;
use crate::error::{AppError, Result};
use crate::ids::{is_valid_id, random_hex};

const TOKEN_SEPARATOR: char = '-';

/// Bytes of random suffix appended to the document id
const TOKEN_SUFFIX_BYTES: usize = 4;

/// `{document_id}-{random hex}`
pub fn mint_share_token(document_id: &str) -> String {
    format!(
        "{}{}{}",
        document_id,
        TOKEN_SEPARATOR,
        random_hex(TOKEN_SUFFIX_BYTES)
    )
}

/// Recover the document id from a share token.
///
/// Everything before the first separator is the id; the suffix is ignored.
pub fn parse_share_token(token: &str) -> Result<String> {
    let candidate = token
        .trim()
        .split(TOKEN_SEPARATOR)
        .next()
        .unwrap_or_default();

    if !is_valid_id(candidate) {
        return Err(AppError::Validation("Invalid share link".to_string()));
    }

    Ok(candidate.to_ascii_lowercase())
}

/// Resolves share tokens to documents
pub struct ShareResolver<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShareResolver<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Any well-formed token for an existing document grants read access;
    /// invite lists are not consulted.
    pub async fn resolve(&self, token: &str) -> Result<Document> {
        let document_id = parse_share_token(token)?;

        DocumentRegistry::new(self.pool)
            .get(&document_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shared document not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::memory_pool;
    use crate::notify::{LogNotifier, ShareMailer};

    #[test]
    fn test_minted_token_shape() {
        let token = mint_share_token("65f1c0ffee0123456789abcd");
        let (prefix, suffix) = token.split_once('-').unwrap();
        assert_eq!(prefix, "65f1c0ffee0123456789abcd");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_share_token() {
        assert_eq!(
            parse_share_token("65F1C0FFEE0123456789ABCD-deadbeef").unwrap(),
            "65f1c0ffee0123456789abcd"
        );
        assert_eq!(
            parse_share_token("65f1c0ffee0123456789abcd").unwrap(),
            "65f1c0ffee0123456789abcd"
        );
        assert!(matches!(
            parse_share_token("not-a-valid-id"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(parse_share_token(""), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let pool = memory_pool().await;
        let registry = DocumentRegistry::new(&pool);
        let mailer = ShareMailer::new(Arc::new(LogNotifier), "http://app.test");

        let document = registry.create("user-a", "report.pdf", "memory://1").await.unwrap();
        let token = registry
            .share(&mailer, "user-a", &document.id, &["b@x.com".to_string()])
            .await
            .unwrap();

        let resolved = ShareResolver::new(&pool).resolve(&token).await.unwrap();
        assert_eq!(resolved.id, document.id);
        assert_eq!(resolved.file_name, "report.pdf");
        assert_eq!(resolved.file_blob_url, "memory://1");
    }

    #[tokio::test]
    async fn test_resolve_errors() {
        let pool = memory_pool().await;
        let resolver = ShareResolver::new(&pool);

        assert!(matches!(
            resolver.resolve("not-a-valid-id").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolver.resolve("aaaaaaaaaaaaaaaaaaaaaaaa-deadbeef").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_suffix_is_not_checked() {
        let pool = memory_pool().await;
        let document = DocumentRegistry::new(&pool)
            .create("user-a", "report.pdf", "memory://1")
            .await
            .unwrap();

        // Never shared, arbitrary suffix: still resolves
        let forged = format!("{}-00000000", document.id);
        let resolved = ShareResolver::new(&pool).resolve(&forged).await.unwrap();
        assert_eq!(resolved.id, document.id);
    }
}
