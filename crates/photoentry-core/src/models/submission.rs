use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Review status of a committed submission. Set to `submitted` at creation;
/// `approved` / `rejected` transitions are admin-side and out of core scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Approved,
    Rejected,
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Submission record
#[derive(Debug, Clone, sqlx::FromRow, Serialize, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub session_id: Uuid,
    pub work_title: String,
    pub episode: String,
    pub name_kanji: String,
    pub name_kana: String,
    pub pen_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub agreed_terms: i32,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Photo record, one per committed draft
#[derive(Debug, Clone, sqlx::FromRow, Serialize, ToSchema)]
pub struct Photo {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub draft_photo_id: Uuid,
    pub original_filename: String,
    pub shoot_date: Option<String>,
    pub shoot_location: Option<String>,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Photo variant record; only the `original` kind is produced in-core.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, ToSchema)]
pub struct PhotoVariant {
    pub id: Uuid,
    pub photo_id: Uuid,
    pub kind: String,
    pub storage_key: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub is_ready: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-photo overrides supplied at commit time, keyed by slot.
/// `draft_photo_id`, when present, pins the override to a specific draft row
/// and is verified against the session before anything is written.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PhotoMetaInput {
    pub sort_order: i32,
    pub draft_photo_id: Option<Uuid>,
    pub shoot_date: Option<String>,
    pub shoot_location: Option<String>,
    pub caption: Option<String>,
}

/// Request body for committing a session into a submission
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CommitSubmissionRequest {
    pub session_id: Uuid,
    pub work_title: String,
    pub episode: String,
    pub name_kanji: String,
    pub name_kana: String,
    pub email: String,
    pub phone: String,
    /// Must be 1; the commit is rejected before any write otherwise
    pub agreed_terms: i64,
    pub pen_name: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<PhotoMetaInput>>,
}

/// One committed photo in the response, in slot order
#[derive(Debug, Serialize, ToSchema)]
pub struct CommittedPhoto {
    pub photo_id: Uuid,
    pub slot: i32,
}

/// Response after a successful commit
#[derive(Debug, Serialize, ToSchema)]
pub struct CommitSubmissionResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub created_at_ms: i64,
    pub photos: Vec<CommittedPhoto>,
}

/// Admin listing: one submission with its active photos aggregated
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub photos: Vec<Photo>,
}

/// Admin listing pagination envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Admin listing response
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSubmissionsResponse {
    pub data: Vec<AdminSubmission>,
    pub pagination: Pagination,
}
