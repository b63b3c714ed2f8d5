use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use photoentry_core::constants::UPLOAD_GRANT_EXPIRES_IN_SECS;
use photoentry_core::models::{
    NewDraftPhoto, SessionState, UploadGrantParams, UploadGrantResponse,
};
use photoentry_core::validation::{
    required_trimmed, validate_rotation, validate_size_bytes, validate_slot,
};
use photoentry_core::AppError;
use photoentry_storage::draft_photo_key;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Issue a presigned PUT credential for one draft slot and register the draft.
///
/// Expiry is enforced at this boundary: a session found open but past its
/// deadline is transitioned to `expired` and the grant is refused, rather than
/// handing out a credential for a dead session.
#[utoipa::path(
    get,
    path = "/api/upload-grant",
    tag = "uploads",
    params(
        ("session_id" = Uuid, Query, description = "Upload session ID"),
        ("slot" = i32, Query, description = "Photo slot, 0..4"),
        ("filename" = String, Query, description = "Original filename"),
        ("content_type" = Option<String>, Query, description = "MIME type"),
        ("size_bytes" = Option<i64>, Query, description = "File size in bytes"),
        ("rotation" = Option<i32>, Query, description = "Rotation hint: 0, 90, 180, 270")
    ),
    responses(
        (status = 200, description = "Presigned PUT credential", body = UploadGrantResponse),
        (status = 400, description = "Invalid slot, rotation, or size", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session not open", body = ErrorResponse),
        (status = 410, description = "Session expired", body = ErrorResponse),
        (status = 500, description = "Signing or store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, params),
    fields(
        session_id = %params.session_id,
        slot = params.slot,
        operation = "issue_upload_grant"
    )
)]
pub async fn issue_upload_grant(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadGrantParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filename = required_trimmed("filename", &params.filename)?.to_string();
    validate_slot(params.slot)?;
    if let Some(rotation) = params.rotation {
        validate_rotation(rotation)?;
    }
    if let Some(size_bytes) = params.size_bytes {
        validate_size_bytes(size_bytes)?;
    }

    let session = state
        .sessions
        .get(params.session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let now = state.clock.now();
    match session.state {
        SessionState::Open if session.is_stale(now) => {
            state
                .sessions
                .mark_expired_if_open(params.session_id, now)
                .await?;
            return Err(AppError::Expired("Upload session expired".to_string()).into());
        }
        SessionState::Open => {}
        SessionState::Expired => {
            return Err(AppError::Expired("Upload session expired".to_string()).into());
        }
        SessionState::Committed => {
            return Err(AppError::Conflict(
                "Session is not open (already committed)".to_string(),
            )
            .into());
        }
    }

    let key = draft_photo_key(params.session_id, &filename);
    let presigned = state
        .storage
        .presigned_put_url(
            &key,
            params.content_type.as_deref(),
            Duration::from_secs(UPLOAD_GRANT_EXPIRES_IN_SECS),
        )
        .await?;

    let draft_id = state
        .drafts
        .upsert(
            &NewDraftPhoto {
                session_id: params.session_id,
                storage_key: key.clone(),
                original_filename: filename,
                content_type: params.content_type.clone(),
                size_bytes: params.size_bytes,
                slot: params.slot,
                rotation: params.rotation,
            },
            now,
        )
        .await?;

    tracing::info!(
        session_id = %params.session_id,
        slot = params.slot,
        draft_id = %draft_id,
        key = %key,
        "Upload grant issued"
    );

    Ok(Json(UploadGrantResponse {
        url: presigned.url,
        key,
        method: "PUT".to_string(),
        headers: presigned.headers,
        expires_in: UPLOAD_GRANT_EXPIRES_IN_SECS,
        draft_id,
    }))
}
