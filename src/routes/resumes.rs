use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::dto::resume_dto::{ParseResumeResponse, ResumeUpload};
use crate::error::Result;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/parse-resume",
    tag = "resumes",
    request_body(content = String, content_type = "multipart/form-data", description = "Field: file (PDF or plain text, up to 10MB)"),
    responses(
        (status = 200, description = "Structured resume with ATS score", body = ParseResumeResponse),
        (status = 400, description = "Missing, unsupported, oversized or unreadable file"),
        (status = 500, description = "Text extraction unavailable"),
    ),
)]
pub async fn parse_resume(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResumeResponse>> {
    let mut multipart = multipart?;
    let mut upload = ResumeUpload::default();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        upload.filename = field.file_name().map(str::to_string);
        upload.content_type = field.content_type().map(str::to_string);
        upload.bytes = Some(field.bytes().await?);
    }

    tracing::info!(
        filename = upload.filename.as_deref().unwrap_or_default(),
        "resume parsing requested"
    );
    let data = state.resume_service.parse_upload(upload).await?;

    Ok(Json(ParseResumeResponse {
        success: true,
        message: "Resume parsed successfully".to_string(),
        data,
    }))
}
