//! PDF API routes
//!
//! Endpoints:
//! - POST /api/pdf/upload - Upload a PDF (multipart field `pdf`)
//! - GET /api/pdf - List the caller's documents
//! - POST /api/pdf/share - Invite people and get the share link
//! - GET /api/pdf/shared/:link - Resolve a share link

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::RequireIdentity;
use crate::documents::{Document, DocumentRegistry, ShareResolver};
use super::extract::{JsonBody, MultipartBody};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::ensure_pdf;

/// Create the PDF router
pub fn router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        .route("/share", post(share_document))
        .route("/shared/:link", get(get_shared_document))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[serde(alias = "pdfId")]
    pub document_id: String,
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedDocumentResponse {
    pub document: Document,
}

/// Upload a new PDF
async fn upload_document(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    MultipartBody(mut multipart): MultipartBody,
) -> Result<(StatusCode, Json<Document>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "pdf" && name != "file" {
            tracing::debug!("Skipping multipart field '{}'", name);
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_default();

        ensure_pdf(&content_type)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if file_name.trim().is_empty() {
            return Err(AppError::Validation("File name is required".to_string()));
        }

        let size = data.len();
        let file_blob_url = state
            .object_store()
            .put_pdf(&file_name, &content_type, data)
            .await?;

        let document = DocumentRegistry::new(state.db())
            .create(&identity.id, &file_name, &file_blob_url)
            .await?;

        tracing::info!(document_id = %document.id, size, "PDF uploaded: '{}'", document.file_name);

        return Ok((StatusCode::CREATED, Json(document)));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// List the caller's documents, newest first
async fn list_documents(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<Vec<Document>>> {
    let documents = DocumentRegistry::new(state.db())
        .list_for_owner(&identity.id)
        .await?;
    Ok(Json(documents))
}

/// Share a document with a list of emails
async fn share_document(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    JsonBody(request): JsonBody<ShareRequest>,
) -> Result<Json<ShareResponse>> {
    let link = DocumentRegistry::new(state.db())
        .share(state.mailer(), &identity.id, &request.document_id, &request.emails)
        .await?;
    Ok(Json(ShareResponse { link }))
}

/// Resolve a share link; no credentials needed
async fn get_shared_document(
    State(state): State<AppState>,
    Path(link): Path<String>,
) -> Result<Json<SharedDocumentResponse>> {
    let document = ShareResolver::new(state.db()).resolve(&link).await?;
    Ok(Json(SharedDocumentResponse { document }))
}
