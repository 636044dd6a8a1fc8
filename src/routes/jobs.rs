use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::job_dto::{JobDetail, JobListResponse};
use crate::error::Result;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/jobs/{job_id}",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Job opportunity ID")),
    responses(
        (status = 200, description = "Job detail", body = JobDetail),
        (status = 400, description = "Malformed job id"),
        (status = 404, description = "Job not found or inactive"),
    ),
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetail>> {
    Ok(Json(state.job_service.get(&job_id).await?))
}

#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses(
        (status = 200, description = "Active jobs, newest first", body = JobListResponse),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<JobListResponse>> {
    let jobs = state.job_service.list().await?;
    Ok(Json(JobListResponse {
        success: true,
        jobs,
    }))
}
