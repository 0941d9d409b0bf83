//! Document types

use serde::{Deserialize, Serialize};

/// Metadata record for one uploaded PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub file_name: String,
    pub file_blob_url: String,
    /// Invited emails in the order they were first invited
    pub invited_identities: Vec<String>,
    pub share_token: Option<String>,
    pub created_at: String,
}

/// Row shape of the `documents` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub id: String,
    pub owner_id: String,
    pub file_name: String,
    pub file_blob_url: String,
    pub share_token: Option<String>,
    pub created_at: String,
}

impl DocumentRow {
    pub fn into_document(self, invited_identities: Vec<String>) -> Document {
        Document {
            id: self.id,
            owner_id: self.owner_id,
            file_name: self.file_name,
            file_blob_url: self.file_blob_url,
            invited_identities,
            share_token: self.share_token,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let document = Document {
            id: "65f1c0ffee0123456789abcd".to_string(),
            owner_id: "user-1".to_string(),
            file_name: "report.pdf".to_string(),
            file_blob_url: "memory://pdfs/report.pdf".to_string(),
            invited_identities: vec!["b@x.com".to_string()],
            share_token: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["ownerId"], "user-1");
        assert_eq!(json["fileBlobUrl"], "memory://pdfs/report.pdf");
        assert_eq!(json["invitedIdentities"][0], "b@x.com");
        assert!(json["shareToken"].is_null());
    }
}
