//! Object storage for uploaded PDF bytes
//!
//! Supports MinIO, Cloudflare R2, Backblaze B2 and AWS S3 through
//! [`S3Client`], plus an in-process [`MemoryStore`] for local runs and tests.

mod memory;
mod s3_client;

pub use memory::MemoryStore;
pub use s3_client::S3Client;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;

use crate::error::StorageError;
use crate::ids::random_hex;

/// The only content type the store accepts
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a PDF and return its retrieval URL
    async fn put_pdf(
        &self,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, StorageError>;
}

/// Reject anything that is not declared as a PDF
pub fn ensure_pdf(content_type: &str) -> Result<(), StorageError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == PDF_CONTENT_TYPE {
        Ok(())
    } else {
        Err(StorageError::UnsupportedContentType(content_type.to_string()))
    }
}

/// Object key for an upload: `pdfs/{unix_millis}-{random hex}-{sanitized name}`
pub fn pdf_object_key(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = if sanitized.trim_matches('_').is_empty() {
        "document.pdf".to_string()
    } else {
        sanitized
    };

    format!(
        "pdfs/{}-{}-{}",
        Utc::now().timestamp_millis(),
        random_hex(4),
        sanitized
    )
}
