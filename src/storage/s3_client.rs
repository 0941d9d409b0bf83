//! S3-compatible storage client
//!
//! Wraps the AWS SDK for S3-compatible storage access.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client,
};
use axum::body::Bytes;

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::{ensure_pdf, pdf_object_key, ObjectStore};

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3Client {
    /// Create a new S3 client from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "pdf-share",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and other S3-compatible services
            .build();

        let client = Client::from_conf(s3_config);

        // Test connection by checking if bucket exists
        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        let public_url = config
            .public_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", config.endpoint.trim_end_matches('/'), bucket));

        Ok(Self {
            client,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Retrieval URL for an object key
    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.public_url, key)
    }

    /// Upload an object
    pub async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                if message.contains("NoSuchBucket") {
                    StorageError::BucketNotFound(self.bucket.clone())
                } else if message.contains("AccessDenied") || message.contains("403") {
                    StorageError::AccessDenied(format!("put {}", key))
                } else {
                    StorageError::SdkError(format!("Failed to put object {}: {}", key, message))
                }
            })?;

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_pdf(
        &self,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, StorageError> {
        ensure_pdf(content_type)?;

        let key = pdf_object_key(file_name);
        let size = data.len();
        self.put_object(&key, data, content_type).await?;

        tracing::debug!(key = %key, size, "Stored PDF object");
        Ok(self.object_url(&key))
    }
}

fn object_url(base: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", base, encoded.join("/"))
}
