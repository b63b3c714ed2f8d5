//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use photoentry_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photoentry API",
        version = "0.1.0",
        description = "Contest photo submission API: time-boxed upload sessions, presigned direct-to-storage uploads, and atomic draft-to-submission commits."
    ),
    paths(
        handlers::sessions::create_session,
        handlers::sessions::get_session,
        handlers::upload_grant::issue_upload_grant,
        handlers::submissions::commit_submission,
        handlers::admin::list_submissions,
    ),
    components(schemas(
        models::SessionState,
        models::CreateSessionRequest,
        models::CreateSessionResponse,
        models::SessionView,
        models::UploadGrantResponse,
        models::PhotoMetaInput,
        models::CommitSubmissionRequest,
        models::CommitSubmissionResponse,
        models::CommittedPhoto,
        models::SubmissionStatus,
        models::Submission,
        models::Photo,
        models::AdminSubmission,
        models::Pagination,
        models::AdminSubmissionsResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "sessions", description = "Upload session lifecycle"),
        (name = "uploads", description = "Presigned draft uploads"),
        (name = "submissions", description = "Session commit"),
        (name = "admin", description = "Read-only review surface")
    )
)]
pub struct ApiDoc;
