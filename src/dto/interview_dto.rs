use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::{InterviewAnalysis, InterviewSession};
use crate::models::question::Question;
use crate::services::agent_service::AgentStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub application_id: Option<String>,
    pub job_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub resume_data: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewResponse {
    pub success: bool,
    pub interview_id: Uuid,
    pub room_name: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[validate(length(max = 128))]
    pub user_id: Option<String>,
    #[validate(length(max = 128))]
    pub job_id: Option<String>,
    #[validate(length(max = 200))]
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionResponse {
    pub success: bool,
    pub session: InterviewSession,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartAgentRequest {
    pub room_name: Option<String>,
    pub token: Option<String>,
    pub system_prompt: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub interview_config: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartAgentResponse {
    pub success: bool,
    pub message: String,
    pub room_name: String,
    pub agent_status: AgentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Fields collected from the multipart video upload.
#[derive(Debug, Clone, Default)]
pub struct VideoSubmission {
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub duration: Option<String>,
    pub video: Option<Bytes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadInterviewResponse {
    pub success: bool,
    pub interview_id: Uuid,
    pub video_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInterviewRequest {
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub transcript: Option<String>,
    pub analysis: Option<InterviewAnalysis>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInterviewResponse {
    pub success: bool,
    pub interview_id: Uuid,
    pub analysis: InterviewAnalysis,
    pub overall_score: f64,
}
