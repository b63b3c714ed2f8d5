//! Database repositories for data access layer
//!
//! This module contains all repository implementations for database
//! operations. Each repository owns one domain entity: upload sessions,
//! draft photos, and submissions (including the atomic commit).

pub mod draft;
pub mod session;
pub mod submission;

pub use draft::DraftRepository;
pub use session::SessionRepository;
pub use submission::{AdminListQuery, CommitFields, SubmissionRepository};
