//! In-process object store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::RwLock;

use super::{ensure_pdf, pdf_object_key, ObjectStore};
use crate::error::StorageError;

/// Keeps uploads in memory; contents are lost on restart
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an object by the URL returned from `put_pdf`
    pub async fn get(&self, url: &str) -> Option<Bytes> {
        let key = url.strip_prefix("memory://")?;
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_pdf(
        &self,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, StorageError> {
        ensure_pdf(content_type)?;

        let key = pdf_object_key(file_name);
        self.objects.write().await.insert(key.clone(), data);

        Ok(format!("memory://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryStore::new();
        let url = store
            .put_pdf("a.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();

        assert!(url.starts_with("memory://pdfs/"));
        assert_eq!(store.get(&url).await.unwrap(), Bytes::from_static(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_same_name_uploads_do_not_overwrite() {
        let store = MemoryStore::new();
        let first = store
            .put_pdf("report.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4 one"))
            .await
            .unwrap();
        let second = store
            .put_pdf("report.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4 two"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(&first).await.unwrap(), Bytes::from_static(b"%PDF-1.4 one"));
        assert_eq!(store.get(&second).await.unwrap(), Bytes::from_static(b"%PDF-1.4 two"));
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let store = MemoryStore::new();
        let result = store
            .put_pdf("a.txt", "text/plain", Bytes::from_static(b"hello"))
            .await;

        assert!(result.is_err());
        assert_eq!(store.len().await, 0);
    }
}
