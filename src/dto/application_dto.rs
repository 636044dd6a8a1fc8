use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus, ResumeAttachment};

/// Presence of both ids is checked by the workflow so that a missing field
/// and a blank one produce the same error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartApplicationRequest {
    #[validate(length(max = 128))]
    pub candidate_id: Option<String>,
    pub opportunity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartApplicationResponse {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachResumeRequest {
    #[schema(value_type = Option<Object>)]
    pub resume_data: Option<JsonValue>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ats_score: Option<f64>,
    #[validate(length(min = 1, max = 255))]
    pub filename: Option<String>,
}

impl From<AttachResumeRequest> for ResumeAttachment {
    fn from(req: AttachResumeRequest) -> Self {
        Self {
            resume_data: req.resume_data,
            ats_score: req.ats_score,
            filename: req.filename,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachResumeResponse {
    pub success: bool,
    pub message: String,
    pub application: Application,
}
