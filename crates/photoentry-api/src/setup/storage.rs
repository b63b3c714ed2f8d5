//! Storage setup and initialization

use anyhow::Result;
use photoentry_core::Config;
use photoentry_storage::{ObjectStorage, S3Storage};
use std::sync::Arc;

/// Setup the S3-compatible storage backend used for presigned PUT credentials.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        endpoint = ?config.s3_endpoint(),
        "Initializing object storage..."
    );

    let storage = S3Storage::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(String::from),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize S3 storage: {}", e))?;

    Ok(Arc::new(storage))
}
