use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};

use crate::dto::interview_dto::{
    CompleteInterviewRequest, CompleteInterviewResponse, CreateInterviewRequest,
    CreateInterviewResponse, CreateSessionRequest, CreateSessionResponse, StartAgentRequest,
    StartAgentResponse, UploadInterviewResponse, VideoSubmission,
};
use crate::error::{Error, Result};
use crate::models::interview::InterviewRecord;
use crate::utils::validation::parse_id;
use crate::routes::extract::AppJson;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/interviews/create",
    tag = "interviews",
    request_body = CreateInterviewRequest,
    responses(
        (status = 200, description = "Interview scheduled", body = CreateInterviewResponse),
        (status = 400, description = "Missing applicationId or jobId"),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn create_interview(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInterviewRequest>,
) -> Result<Json<CreateInterviewResponse>> {
    let record = state.interview_service.create_interview(payload).await?;
    Ok(Json(CreateInterviewResponse {
        success: true,
        interview_id: record.id,
        room_name: record.room_name.unwrap_or_default(),
        questions: record.questions,
    }))
}

#[utoipa::path(
    post,
    path = "/interviews/create-session",
    tag = "interviews",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Room and credentials issued", body = CreateSessionResponse),
        (status = 400, description = "Missing userId, jobId or jobTitle"),
        (status = 500, description = "Room transport not configured"),
    ),
)]
pub async fn create_session(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>> {
    let session = state.interview_service.create_session(payload)?;
    Ok(Json(CreateSessionResponse {
        success: true,
        session,
    }))
}

#[utoipa::path(
    post,
    path = "/interviews/start-agent",
    tag = "interviews",
    request_body = StartAgentRequest,
    responses(
        (status = 200, description = "Agent started or simulated", body = StartAgentResponse),
        (status = 400, description = "Missing roomName, token or systemPrompt"),
        (status = 500, description = "Agent runner failed"),
    ),
)]
pub async fn start_agent(
    State(state): State<AppState>,
    AppJson(payload): AppJson<StartAgentRequest>,
) -> Result<Json<StartAgentResponse>> {
    Ok(Json(state.interview_service.start_agent(payload).await?))
}

#[utoipa::path(
    post,
    path = "/interviews/upload",
    tag = "interviews",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields: video (file), jobId, userId, duration"),
    responses(
        (status = 200, description = "Recording stored", body = UploadInterviewResponse),
        (status = 400, description = "Missing video, jobId or userId"),
        (status = 500, description = "Media storage failure"),
    ),
)]
pub async fn upload_interview(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadInterviewResponse>> {
    let mut multipart = multipart?;
    let mut submission = VideoSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => submission.video = Some(field.bytes().await?),
            "jobId" => submission.job_id = Some(field.text().await?),
            "userId" => submission.user_id = Some(field.text().await?),
            "duration" => submission.duration = Some(field.text().await?),
            other => tracing::debug!(field = other, "ignoring upload field"),
        }
    }

    let record = state
        .interview_service
        .complete_with_video(submission)
        .await?;
    let video_url = record
        .video_url
        .ok_or_else(|| Error::Storage("stored interview has no video url".to_string()))?;

    Ok(Json(UploadInterviewResponse {
        success: true,
        interview_id: record.id,
        video_url,
    }))
}

#[utoipa::path(
    post,
    path = "/interviews/complete",
    tag = "interviews",
    request_body = CompleteInterviewRequest,
    responses(
        (status = 200, description = "Interview completed", body = CompleteInterviewResponse),
        (status = 400, description = "Missing jobId, userId or analysis"),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn complete_interview(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CompleteInterviewRequest>,
) -> Result<Json<CompleteInterviewResponse>> {
    let record = state
        .interview_service
        .complete_with_transcript(payload)
        .await?;

    Ok(Json(CompleteInterviewResponse {
        success: true,
        interview_id: record.id,
        overall_score: record.overall_score,
        analysis: record.analysis.unwrap_or_default(),
    }))
}

#[utoipa::path(
    get,
    path = "/interviews/{id}",
    tag = "interviews",
    params(("id" = String, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Stored interview", body = InterviewRecord),
        (status = 400, description = "Malformed interview id"),
        (status = 404, description = "Interview not found"),
    ),
)]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewRecord>> {
    let id = parse_id("interviewId", &id)?;
    Ok(Json(state.interview_service.find(id).await?))
}
