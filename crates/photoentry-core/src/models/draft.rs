use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Draft photo status: `draft` until the session commits, `final` afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Final,
}

impl Display for DraftStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DraftStatus::Draft => write!(f, "draft"),
            DraftStatus::Final => write!(f, "final"),
        }
    }
}

/// Draft photo record, one per (session, slot)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftPhoto {
    pub id: Uuid,
    pub session_id: Uuid,
    pub storage_key: String,
    pub original_filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub slot: i32,
    pub rotation: Option<i32>,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written on every grant; a repeat grant for the same slot overwrites
/// the previous draft's key, filename, content type, size, and rotation.
#[derive(Debug, Clone)]
pub struct NewDraftPhoto {
    pub session_id: Uuid,
    pub storage_key: String,
    pub original_filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub slot: i32,
    pub rotation: Option<i32>,
}

/// Query parameters for the upload-grant endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadGrantParams {
    pub session_id: Uuid,
    pub slot: i32,
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub rotation: Option<i32>,
}

/// Response containing presigned PUT credentials for one draft slot
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadGrantResponse {
    /// Presigned URL for direct PUT upload
    pub url: String,
    /// Object key the credential is bound to
    pub key: String,
    /// Always "PUT"
    pub method: String,
    /// Headers the client must send verbatim with the PUT
    pub headers: BTreeMap<String, String>,
    /// Credential validity window in seconds
    pub expires_in: u64,
    /// Draft row registered (or overwritten) for this grant
    pub draft_id: Uuid,
}
