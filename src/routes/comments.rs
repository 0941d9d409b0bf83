//! Comment API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::extract::JsonBody;
use crate::auth::{Author, Session};
use crate::comments::{CommentStore, CommentView};
use crate::error::Result;
use crate::state::AppState;

/// Create the comments router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_comment))
        .route("/:document_id", get(list_comments))
}

/// Request body for posting a comment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[serde(default, alias = "pdfId")]
    pub document_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "parentComment")]
    pub parent_comment_id: Option<String>,
    /// Used for attribution only when the caller is not authenticated
    pub email: Option<String>,
}

/// Add a comment; authentication is optional
async fn add_comment(
    State(state): State<AppState>,
    Session(identity): Session,
    JsonBody(request): JsonBody<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>)> {
    let author = Author::resolve(identity.as_ref(), request.email.as_deref());

    let comment = CommentStore::new(state.db())
        .add(
            &request.document_id,
            &author,
            &request.text,
            request.parent_comment_id.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List comments for a document, newest first
async fn list_comments(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Vec<CommentView>>> {
    let comments = CommentStore::new(state.db())
        .list_for_document(&document_id)
        .await?;
    Ok(Json(comments))
}
