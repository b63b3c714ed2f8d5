use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use photoentry_core::models::{AdminSubmission, AdminSubmissionsResponse, Pagination};
use photoentry_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// Paginated admin listing of submissions with their active photos
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    tag = "admin",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("status" = Option<String>, Query, description = "Filter by submission status")
    ),
    responses(
        (status = 200, description = "Submission listing", body = AdminSubmissionsResponse),
        (status = 401, description = "Invalid admin key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, params), fields(operation = "admin_list_submissions"))]
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    verify_admin_key(&headers, state.config.admin_key())?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (rows, total) = state
        .submissions
        .list_for_admin(&photoentry_db::AdminListQuery {
            page,
            limit,
            status: params.status,
        })
        .await?;

    let data = rows
        .into_iter()
        .map(|(submission, photos)| AdminSubmission { submission, photos })
        .collect();

    Ok(Json(AdminSubmissionsResponse {
        data,
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        },
    }))
}

/// Compare the caller's `x-admin-key` against the configured key in constant
/// time.
fn verify_admin_key(headers: &HeaderMap, admin_key: &str) -> Result<(), AppError> {
    let presented = headers
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let matches: bool = presented
        .as_bytes()
        .ct_eq(admin_key.as_bytes())
        .into();
    if matches {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "Unauthorized: Invalid Admin Key".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn admin_key_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert("x-admin-key", HeaderValue::from_static("right-key"));
        assert!(verify_admin_key(&headers, "right-key").is_ok());
        assert!(verify_admin_key(&headers, "other-key").is_err());
    }

    #[test]
    fn missing_admin_key_is_rejected() {
        let headers = HeaderMap::new();
        let err = verify_admin_key(&headers, "right-key").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
