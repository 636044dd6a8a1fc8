use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::{Recommendation, SkillProficiency};

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CandidateSearchQuery {
    /// Comma separated skill names.
    pub skills: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_score: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    pub interview_id: Uuid,
    pub user_id: Option<String>,
    pub job_id: Uuid,
    pub overall_score: f64,
    pub communication_rating: f64,
    pub recommendation: Option<Recommendation>,
    pub key_strengths: Vec<String>,
    pub skill_proficiencies: Vec<SkillProficiency>,
    pub summary: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillBreakdown {
    pub skill: String,
    pub candidate_count: usize,
    pub average_proficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub total_matches: usize,
    pub skill_breakdown: Vec<SkillBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchResponse {
    pub candidates: Vec<CandidateMatch>,
    pub search_method: String,
    pub summary: SearchSummary,
}
