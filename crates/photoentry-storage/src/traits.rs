//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must
//! implement, along with the storage error type.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A signed PUT credential for one object key.
#[derive(Debug, Clone)]
pub struct PresignedPut {
    /// URL the client PUTs the bytes to
    pub url: String,
    /// Headers the client must send verbatim with the PUT
    pub headers: BTreeMap<String, String>,
}

/// Object storage abstraction
///
/// The single capability the upload flow requires: mint a presigned PUT
/// credential with a short validity window. Backends never see object bytes;
/// uploads go directly from the browser to the store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Generate a presigned PUT credential for `storage_key`, valid for
    /// `expires_in`. `content_type`, when present, is echoed into the headers
    /// the client must send.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> StorageResult<PresignedPut>;
}
