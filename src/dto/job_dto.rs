use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::job::{JobOpportunity, JobSummary};
use crate::utils::time::relative_time;

const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: Uuid,
    pub title: String,
    pub company: CompanyRef,
    pub job_type: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub experience_level: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub salary_min: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub salary_max: Option<Decimal>,
    pub remote_allowed: bool,
    pub skills_required: Vec<String>,
    pub skills_preferred: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobOpportunity> for JobDetail {
    fn from(job: JobOpportunity) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company: CompanyRef {
                name: job
                    .company_name
                    .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            },
            // "full_time" -> "full-time"
            job_type: job
                .job_type
                .map(|t| t.replacen('_', "-", 1))
                .unwrap_or_else(|| "Full-time".to_string()),
            location: job.location.unwrap_or_else(|| "Remote".to_string()),
            description: job.description.unwrap_or_default(),
            requirements: job.requirements.unwrap_or_default(),
            experience_level: job.experience_level,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            remote_allowed: job.remote_allowed,
            skills_required: job.skills_required,
            skills_preferred: job.skills_preferred,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListItem {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub salary_min: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub salary_max: Option<Decimal>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub posted_time: String,
    pub is_active: bool,
    pub applications: i64,
}

impl JobListItem {
    pub fn from_summary(summary: JobSummary, now: DateTime<Utc>) -> Self {
        let job = summary.job;
        Self {
            posted_time: relative_time(job.created_at, now),
            id: job.id,
            title: job.title,
            company: job
                .company_name
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            location: job.location,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            job_type: job.job_type,
            experience_level: job.experience_level,
            is_active: job.is_active,
            applications: summary.application_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<JobListItem>,
}
