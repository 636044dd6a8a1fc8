use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOpportunity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub location: Option<String>,
    pub remote_allowed: bool,
    pub skills_required: Vec<String>,
    pub skills_preferred: Vec<String>,
    pub recruiter_id: Option<String>,
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Listing row: a job plus the number of applications it has received.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    #[sqlx(flatten)]
    pub job: JobOpportunity,
    pub application_count: i64,
}
