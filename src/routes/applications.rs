use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::application_dto::{
    AttachResumeRequest, AttachResumeResponse, StartApplicationRequest, StartApplicationResponse,
};
use crate::error::Result;
use crate::utils::validation::validate;
use crate::routes::extract::AppJson;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/applications/start",
    tag = "applications",
    request_body = StartApplicationRequest,
    responses(
        (status = 200, description = "Application created or already present", body = StartApplicationResponse),
        (status = 400, description = "Missing or malformed identifiers"),
        (status = 404, description = "Job opportunity not found"),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn start_application(
    State(state): State<AppState>,
    AppJson(payload): AppJson<StartApplicationRequest>,
) -> Result<Json<StartApplicationResponse>> {
    validate(&payload)?;
    let started = state
        .application_service
        .start(
            payload.candidate_id.as_deref(),
            payload.opportunity_id.as_deref(),
        )
        .await?;

    Ok(Json(StartApplicationResponse {
        application_id: started.application.id,
        status: started.application.status,
        message: started.message().to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/applications/{id}/resume",
    tag = "applications",
    params(("id" = String, Path, description = "Application ID")),
    request_body = AttachResumeRequest,
    responses(
        (status = 200, description = "Resume attached", body = AttachResumeResponse),
        (status = 400, description = "Invalid application id or payload"),
        (status = 404, description = "Application not found"),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn attach_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AttachResumeRequest>,
) -> Result<Json<AttachResumeResponse>> {
    validate(&payload)?;
    let application = state
        .application_service
        .attach_resume(Some(&id), payload.into())
        .await?;

    Ok(Json(AttachResumeResponse {
        success: true,
        message: "Resume uploaded successfully".to_string(),
        application,
    }))
}
