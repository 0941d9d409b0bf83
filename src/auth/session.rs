//! Per-request session extractors
//!
//! The caller's identity is read from the `Authorization` header on every
//! request and handed to handlers explicitly.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{credential_from_header, Identity};
use crate::error::AppError;
use crate::state::AppState;

/// Optional identity. A credential that is present but invalid is rejected
/// rather than treated as anonymous.
#[derive(Debug, Clone)]
pub struct Session(pub Option<Identity>);

/// Identity required; missing credentials are a 401
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Session(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(credential_from_header)
            .ok_or_else(|| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

        match state.verifier().verify(token).await {
            Some(identity) => Ok(Session(Some(identity))),
            None => Err(AppError::Unauthorized("Invalid or expired token".to_string())),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Session(identity) = Session::from_request_parts(parts, state).await?;
        identity
            .map(RequireIdentity)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
