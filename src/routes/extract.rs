//! Body extractors whose rejections use the API error format

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body; malformed or missing bodies become `400 validation_error`
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Multipart body with the same rejection handling as [`JsonBody`]
pub struct MultipartBody(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for MultipartBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(Self(multipart))
    }
}
