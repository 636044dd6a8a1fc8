use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::resume_service::ParsedResume;

/// The `file` part of a resume upload.
#[derive(Debug, Clone, Default)]
pub struct ResumeUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Option<Bytes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeParseData {
    /// First 500 characters of the extracted text.
    pub extracted_text: String,
    pub parsed_data: ParsedResume,
    pub ats_score: u32,
    pub filename: Option<String>,
    pub file_size: usize,
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeResponse {
    pub success: bool,
    pub message: String,
    pub data: ResumeParseData,
}
