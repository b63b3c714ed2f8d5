use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use photoentry_core::constants::DEFAULT_SESSION_TTL_MS;
use photoentry_core::models::{CreateSessionRequest, CreateSessionResponse, SessionView};
use photoentry_core::validation::{validate_email, validate_ttl_ms};
use photoentry_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Create an upload session scoping a batch of draft uploads
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = CreateSessionResponse),
        (status = 400, description = "Invalid email or ttl_ms", body = ErrorResponse),
        (status = 415, description = "Non-JSON content type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_session"))]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(ref email) = email {
        validate_email("email", email)?;
    }

    let ttl_ms = match request.ttl_ms {
        Some(ttl) => {
            validate_ttl_ms(ttl)?;
            ttl
        }
        None => DEFAULT_SESSION_TTL_MS,
    };

    let now = state.clock.now();
    let session_id = Uuid::new_v4();
    let expires_at = now + Duration::milliseconds(ttl_ms);

    state
        .sessions
        .create(session_id, email, expires_at, now)
        .await?;

    tracing::info!(
        session_id = %session_id,
        ttl_ms = ttl_ms,
        "Upload session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            state: photoentry_core::models::SessionState::Open,
            expires_at_ms: expires_at.timestamp_millis(),
            created_at_ms: now.timestamp_millis(),
        }),
    ))
}

/// Get an upload session, with read-time expiry correction
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(session_id = %id, operation = "get_session"))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let session = state
        .sessions
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let now = state.clock.now();

    // The view reports `expired` as soon as the deadline passes; persisting the
    // transition is best-effort and must not fail the read.
    if session.is_stale(now) {
        if let Err(err) = state.sessions.mark_expired_if_open(id, now).await {
            tracing::warn!(
                session_id = %id,
                error = %err,
                "Failed to write back expired state"
            );
        }
    }

    Ok(Json(SessionView::from_record(&session, now)))
}
