use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use photoentry_core::constants::MAX_PHOTOS;
use photoentry_core::models::{
    CommitSubmissionRequest, CommitSubmissionResponse, DraftPhoto, DraftStatus, PhotoMetaInput,
    SessionState, SubmissionStatus,
};
use photoentry_core::validation::{
    required_trimmed, validate_email, validate_shoot_date, validate_slot,
};
use photoentry_core::AppError;
use photoentry_db::CommitFields;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Commit a session: promote its drafts into a submission and close it.
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "submissions",
    request_body = CommitSubmissionRequest,
    responses(
        (status = 201, description = "Submission created", body = CommitSubmissionResponse),
        (status = 400, description = "Invalid or missing fields", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session not open or draft mismatch", body = ErrorResponse),
        (status = 410, description = "Session expired", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(session_id = %request.session_id, operation = "commit_submission")
)]
pub async fn commit_submission(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CommitSubmissionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Steps 1-6 are read-only; the store is first written inside the
    // repository transaction, so any failure up to there leaves no trace.
    let (fields, overrides) = validate_commit_payload(&request)?;

    let session = state
        .sessions
        .get(request.session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let now = state.clock.now();
    match session.state {
        SessionState::Open if session.is_stale(now) => {
            state
                .sessions
                .mark_expired_if_open(request.session_id, now)
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

    let drafts = state.drafts.list_for_session(request.session_id).await?;
    if drafts.is_empty() {
        return Err(AppError::Validation(
            "No photos found. Please upload photos first.".to_string(),
        )
        .into());
    }
    if drafts.len() > MAX_PHOTOS {
        return Err(
            AppError::Validation(format!("Too many photos (max {})", MAX_PHOTOS)).into(),
        );
    }

    verify_draft_references(&drafts, &overrides)?;

    let (submission_id, photos) = state
        .submissions
        .commit_session(request.session_id, &fields, &drafts, &overrides, now)
        .await?;

    tracing::info!(
        session_id = %request.session_id,
        submission_id = %submission_id,
        photo_count = photos.len(),
        "Session committed"
    );

    Ok((
        StatusCode::CREATED,
        Json(CommitSubmissionResponse {
            submission_id,
            status: SubmissionStatus::Submitted,
            created_at_ms: now.timestamp_millis(),
            photos,
        }),
    ))
}

/// Validate the commit payload without touching the store. Fails with the
/// first offending field; returns the trimmed fields and the per-slot
/// overrides (last entry wins on a repeated slot, matching the upload flow).
fn validate_commit_payload(
    request: &CommitSubmissionRequest,
) -> Result<(CommitFields, BTreeMap<i32, PhotoMetaInput>), AppError> {
    let work_title = required_trimmed("work_title", &request.work_title)?.to_string();
    let episode = required_trimmed("episode", &request.episode)?.to_string();
    let name_kanji = required_trimmed("name_kanji", &request.name_kanji)?.to_string();
    let name_kana = required_trimmed("name_kana", &request.name_kana)?.to_string();
    let email = required_trimmed("email", &request.email)?.to_string();
    let phone = required_trimmed("phone", &request.phone)?.to_string();

    validate_email("email", &email)?;

    if request.agreed_terms != 1 {
        return Err(AppError::Validation(
            "You must agree to the terms.".to_string(),
        ));
    }

    let pen_name = request
        .pen_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut overrides = BTreeMap::new();
    if let Some(ref photos) = request.photos {
        for meta in photos {
            validate_slot(meta.sort_order)?;
            if let Some(ref date) = meta.shoot_date {
                validate_shoot_date("shoot_date", date)?;
            }
            overrides.insert(meta.sort_order, meta.clone());
        }
    }

    Ok((
        CommitFields {
            work_title,
            episode,
            name_kanji,
            name_kana,
            pen_name,
            email,
            phone,
        },
        overrides,
    ))
}

/// When the caller pins overrides to explicit draft ids, each referenced draft
/// must belong to this session's slot and still be uncommitted.
fn verify_draft_references(
    drafts: &[DraftPhoto],
    overrides: &BTreeMap<i32, PhotoMetaInput>,
) -> Result<(), AppError> {
    for (slot, meta) in overrides {
        let Some(draft_id) = meta.draft_photo_id else {
            continue;
        };
        let draft = drafts.iter().find(|d| d.slot == *slot);
        match draft {
            Some(d) if d.id == draft_id && d.status == DraftStatus::Draft => {}
            Some(d) if d.id != draft_id => {
                return Err(AppError::Conflict(format!(
                    "Draft {} does not belong to slot {} of this session",
                    draft_id, slot
                )));
            }
            Some(d) => {
                return Err(AppError::Conflict(format!(
                    "Draft {} is no longer in draft status",
                    d.id
                )));
            }
            None => {
                return Err(AppError::Conflict(format!(
                    "Draft {} does not belong to this session",
                    draft_id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn valid_request() -> CommitSubmissionRequest {
        CommitSubmissionRequest {
            session_id: Uuid::new_v4(),
            work_title: "桜とパンダ".to_string(),
            episode: "上野で見た思い出".to_string(),
            name_kanji: "山田 太郎".to_string(),
            name_kana: "やまだ たろう".to_string(),
            email: "yamada@example.com".to_string(),
            phone: "090-1234-5678".to_string(),
            agreed_terms: 1,
            pen_name: None,
            photos: None,
        }
    }

    fn draft(session_id: Uuid, slot: i32) -> DraftPhoto {
        let now = Utc::now();
        DraftPhoto {
            id: Uuid::new_v4(),
            session_id,
            storage_key: format!("draft_photos/{}/{}_a.jpg", session_id, Uuid::new_v4()),
            original_filename: "a.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            size_bytes: Some(123_456),
            slot,
            rotation: None,
            status: DraftStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn accepts_valid_payload_and_trims_fields() {
        let mut request = valid_request();
        request.work_title = "  桜とパンダ  ".to_string();
        request.pen_name = Some("   ".to_string());

        let (fields, overrides) = validate_commit_payload(&request).unwrap();
        assert_eq!(fields.work_title, "桜とパンダ");
        assert_eq!(fields.pen_name, None);
        assert!(overrides.is_empty());
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut request = valid_request();
        request.episode = "   ".to_string();

        let err = validate_commit_payload(&request).unwrap_err();
        assert!(err.to_string().contains("episode"));
    }

    #[test]
    fn rejects_unagreed_terms() {
        let mut request = valid_request();
        request.agreed_terms = 0;

        let err = validate_commit_payload(&request).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("agree"));
    }

    #[test]
    fn rejects_bad_email_shape() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();

        assert!(validate_commit_payload(&request).is_err());
    }

    #[test]
    fn rejects_bad_shoot_date_in_overrides() {
        let mut request = valid_request();
        request.photos = Some(vec![PhotoMetaInput {
            sort_order: 0,
            draft_photo_id: None,
            shoot_date: Some("03/07/2026".to_string()),
            shoot_location: None,
            caption: None,
        }]);

        assert!(validate_commit_payload(&request).is_err());
    }

    #[test]
    fn rejects_out_of_range_override_slot() {
        let mut request = valid_request();
        request.photos = Some(vec![PhotoMetaInput {
            sort_order: 5,
            draft_photo_id: None,
            shoot_date: None,
            shoot_location: None,
            caption: None,
        }]);

        assert!(validate_commit_payload(&request).is_err());
    }

    #[test]
    fn last_override_wins_for_repeated_slot() {
        let mut request = valid_request();
        request.photos = Some(vec![
            PhotoMetaInput {
                sort_order: 1,
                draft_photo_id: None,
                shoot_date: None,
                shoot_location: Some("上野公園".to_string()),
                caption: None,
            },
            PhotoMetaInput {
                sort_order: 1,
                draft_photo_id: None,
                shoot_date: None,
                shoot_location: Some("動物園".to_string()),
                caption: None,
            },
        ]);

        let (_, overrides) = validate_commit_payload(&request).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(
            overrides.get(&1).unwrap().shoot_location.as_deref(),
            Some("動物園")
        );
    }

    #[test]
    fn draft_reference_must_match_slot_owner() {
        let session_id = Uuid::new_v4();
        let drafts = vec![draft(session_id, 0)];
        let mut overrides = BTreeMap::new();
        overrides.insert(
            0,
            PhotoMetaInput {
                sort_order: 0,
                draft_photo_id: Some(Uuid::new_v4()),
                shoot_date: None,
                shoot_location: None,
                caption: None,
            },
        );

        let err = verify_draft_references(&drafts, &overrides).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn draft_reference_accepts_matching_draft() {
        let session_id = Uuid::new_v4();
        let drafts = vec![draft(session_id, 0)];
        let mut overrides = BTreeMap::new();
        overrides.insert(
            0,
            PhotoMetaInput {
                sort_order: 0,
                draft_photo_id: Some(drafts[0].id),
                shoot_date: None,
                shoot_location: None,
                caption: None,
            },
        );

        assert!(verify_draft_references(&drafts, &overrides).is_ok());
    }

    #[test]
    fn draft_reference_rejects_finalized_draft() {
        let session_id = Uuid::new_v4();
        let mut d = draft(session_id, 2);
        d.status = DraftStatus::Final;
        let draft_id = d.id;
        let drafts = vec![d];
        let mut overrides = BTreeMap::new();
        overrides.insert(
            2,
            PhotoMetaInput {
                sort_order: 2,
                draft_photo_id: Some(draft_id),
                shoot_date: None,
                shoot_location: None,
                caption: None,
            },
        );

        let err = verify_draft_references(&drafts, &overrides).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
