use crate::traits::{ObjectStorage, PresignedPut, StorageError, StorageResult};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Result as ObjectResult;
use std::collections::BTreeMap;
use std::time::Duration;

/// S3-compatible storage implementation
///
/// Credentials (access key pair) come from the environment via
/// `AmazonS3Builder::from_env()`; bucket, region, and the optional custom
/// endpoint are explicit so S3-compatible providers (MinIO, Cloudflare R2,
/// DigitalOcean Spaces) work with the same code path.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "https://<account>.r2.cloudflarestorage.com")
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> StorageResult<PresignedPut> {
        if storage_key.starts_with('/') || storage_key.contains("..") {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }

        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::PUT, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 presigned PUT signing failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        // Signature is query-based; Content-Type is not part of the signed
        // scope, so echoing it back is informational for the client PUT.
        let mut headers = BTreeMap::new();
        if let Some(ct) = content_type {
            headers.insert("content-type".to_string(), ct.to_string());
        }

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            expires_in_secs = expires_in.as_secs(),
            "S3 presigned PUT issued"
        );

        Ok(PresignedPut { url, headers })
    }
}
