use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::interview::InterviewAnalysis;

/// Denormalized view of a user's most recent interview results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProfileSkillSummary {
    pub user_id: String,
    pub skills: Vec<String>,
    pub communication_score: f64,
    pub recent_interview_score: f64,
    pub last_interview_at: DateTime<Utc>,
    pub interview_count: i32,
}

/// One interview's contribution to a profile summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSkillUpdate {
    pub user_id: String,
    pub skills: Vec<String>,
    pub communication_score: f64,
    pub recent_interview_score: f64,
    pub interviewed_at: DateTime<Utc>,
}

impl ProfileSkillUpdate {
    pub fn from_analysis(
        user_id: &str,
        analysis: &InterviewAnalysis,
        interviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            skills: analysis
                .technical_skills
                .iter()
                .map(|s| s.skill.clone())
                .collect(),
            communication_score: analysis.communication_score,
            recent_interview_score: analysis.overall_score,
            interviewed_at,
        }
    }
}
