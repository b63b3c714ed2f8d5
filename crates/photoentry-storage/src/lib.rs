//! Photoentry Storage Library
//!
//! This crate provides the object-storage abstraction used to mint presigned
//! PUT credentials for direct browser uploads, and the S3-compatible backend.
//! The core never reads object bytes back; the only capability required of a
//! backend is "sign a time-boxed PUT for (bucket, key)".
//!
//! # Storage key format
//!
//! Draft uploads live under `draft_photos/{session_id}/{uuid}_{filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module.

pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use keys::draft_photo_key;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, PresignedPut, StorageError, StorageResult};
