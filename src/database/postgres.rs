use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, InterviewRepository, InterviewSearch, JobRepository, ProfileRepository,
};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication, ResumeAttachment};
use crate::models::interview::{InterviewAnalysis, InterviewRecord, InterviewStatus, NewInterview};
use crate::models::job::{JobOpportunity, JobSummary};
use crate::models::profile::{ProfileSkillSummary, ProfileSkillUpdate};
use crate::models::question::Question;

const JOB_COLUMNS: &str = r#"
    j.id, j.title, j.description, j.requirements, j.job_type, j.experience_level,
    j.salary_min, j.salary_max, j.location, j.remote_allowed, j.skills_required,
    j.skills_preferred, j.recruiter_id, j.company_id, c.name AS company_name,
    j.is_active, j.created_at
"#;

const APPLICATION_COLUMNS: &str = "id, candidate_id, opportunity_id, recruiter_id, status, \
     resume_data, ats_score, resume_filename, created_at, updated_at";

const INTERVIEW_COLUMNS: &str = "id, application_id, job_id, user_id, room_name, questions, \
     status, transcript, analysis, video_url, duration, overall_score, recommendation, \
     created_at, updated_at";

/// Postgres-backed persistence gateway sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: Uuid,
    candidate_id: String,
    opportunity_id: Uuid,
    recruiter_id: Option<String>,
    status: String,
    resume_data: Option<JsonValue>,
    ats_score: Option<f64>,
    resume_filename: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            candidate_id: row.candidate_id,
            opportunity_id: row.opportunity_id,
            recruiter_id: row.recruiter_id,
            status: row.status.parse().map_err(Error::Storage)?,
            resume_data: row.resume_data,
            ats_score: row.ats_score,
            resume_filename: row.resume_filename,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct InterviewRow {
    id: Uuid,
    application_id: Option<Uuid>,
    job_id: Uuid,
    user_id: Option<String>,
    room_name: Option<String>,
    questions: Json<Vec<Question>>,
    status: String,
    transcript: Option<String>,
    analysis: Option<Json<InterviewAnalysis>>,
    video_url: Option<String>,
    duration: i32,
    overall_score: f64,
    recommendation: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for InterviewRecord {
    type Error = Error;

    fn try_from(row: InterviewRow) -> Result<Self> {
        let recommendation = row
            .recommendation
            .map(|r| r.parse().map_err(Error::Storage))
            .transpose()?;
        Ok(Self {
            id: row.id,
            application_id: row.application_id,
            job_id: row.job_id,
            user_id: row.user_id,
            room_name: row.room_name,
            questions: row.questions.0,
            status: row.status.parse::<InterviewStatus>().map_err(Error::Storage)?,
            transcript: row.transcript,
            analysis: row.analysis.map(|a| a.0),
            video_url: row.video_url,
            duration: row.duration,
            overall_score: row.overall_score,
            recommendation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_applications(row: Option<ApplicationRow>) -> Result<Option<Application>> {
    row.map(Application::try_from).transpose()
}

#[async_trait]
impl JobRepository for PgStore {
    #[instrument(skip(self))]
    async fn find_job(&self, id: Uuid) -> Result<Option<JobOpportunity>> {
        let query = format!(
            "SELECT {} FROM job_opportunities j \
             LEFT JOIN companies c ON c.id = j.company_id \
             WHERE j.id = $1",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, JobOpportunity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    #[instrument(skip(self))]
    async fn list_active_jobs(&self) -> Result<Vec<JobSummary>> {
        let query = format!(
            "SELECT {}, \
                (SELECT COUNT(*) FROM applications a WHERE a.opportunity_id = j.id) AS application_count \
             FROM job_opportunities j \
             LEFT JOIN companies c ON c.id = j.company_id \
             WHERE j.is_active = TRUE \
             ORDER BY j.created_at DESC",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, JobSummary>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    #[instrument(skip(self))]
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        map_applications(row)
    }

    #[instrument(skip(self))]
    async fn find_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE candidate_id = $1 AND opportunity_id = $2",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(candidate_id)
            .bind(opportunity_id)
            .fetch_optional(&self.pool)
            .await?;
        map_applications(row)
    }

    #[instrument(skip(self, new), fields(candidate_id = %new.candidate_id, opportunity_id = %new.opportunity_id))]
    async fn insert_application_if_absent(
        &self,
        new: &NewApplication,
    ) -> Result<(Application, bool)> {
        let insert = format!(
            "INSERT INTO applications (candidate_id, opportunity_id, recruiter_id, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (candidate_id, opportunity_id) DO NOTHING \
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let inserted = sqlx::query_as::<_, ApplicationRow>(&insert)
            .bind(&new.candidate_id)
            .bind(new.opportunity_id)
            .bind(&new.recruiter_id)
            .bind(ApplicationStatus::Draft.as_str())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = inserted {
            return Ok((row.try_into()?, true));
        }

        let existing = self
            .find_application_for_pair(&new.candidate_id, new.opportunity_id)
            .await?
            .ok_or_else(|| {
                Error::Storage("application conflict reported but no row found".to_string())
            })?;
        Ok((existing, false))
    }

    #[instrument(skip(self, resume))]
    async fn attach_resume(
        &self,
        id: Uuid,
        resume: &ResumeAttachment,
    ) -> Result<Option<Application>> {
        let query = format!(
            "UPDATE applications \
             SET resume_data = $2, ats_score = $3, resume_filename = $4, status = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .bind(&resume.resume_data)
            .bind(resume.ats_score)
            .bind(&resume.filename)
            .bind(ApplicationStatus::ResumeUploaded.as_str())
            .fetch_optional(&self.pool)
            .await?;
        map_applications(row)
    }

    #[instrument(skip(self))]
    async fn advance_application(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let query = format!(
            "UPDATE applications SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = ANY($3) \
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .bind(next.as_str())
            .bind(predecessor_names(next))
            .fetch_optional(&self.pool)
            .await?;
        map_applications(row)
    }

    #[instrument(skip(self))]
    async fn advance_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let query = format!(
            "UPDATE applications SET status = $3, updated_at = NOW() \
             WHERE candidate_id = $1 AND opportunity_id = $2 AND status = ANY($4) \
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(candidate_id)
            .bind(opportunity_id)
            .bind(next.as_str())
            .bind(predecessor_names(next))
            .fetch_optional(&self.pool)
            .await?;
        map_applications(row)
    }
}

fn predecessor_names(next: ApplicationStatus) -> Vec<String> {
    ApplicationStatus::predecessors_of(next)
        .into_iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

#[async_trait]
impl InterviewRepository for PgStore {
    #[instrument(skip(self, new), fields(job_id = %new.job_id, status = %new.status))]
    async fn insert_interview(&self, new: &NewInterview) -> Result<InterviewRecord> {
        let analysis = new.analysis.as_ref();
        let query = format!(
            "INSERT INTO interviews (\
                application_id, job_id, user_id, room_name, questions, status, transcript, \
                analysis, video_url, duration, overall_score, technical_skills, soft_skills, \
                communication_score, experience_match, culture_fit, recommendation\
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17) \
             RETURNING {}",
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(new.application_id)
            .bind(new.job_id)
            .bind(&new.user_id)
            .bind(&new.room_name)
            .bind(Json(&new.questions))
            .bind(new.status.as_str())
            .bind(&new.transcript)
            .bind(analysis.map(Json))
            .bind(&new.video_url)
            .bind(new.duration)
            .bind(new.overall_score())
            .bind(Json(analysis.map(|a| a.technical_skills.clone()).unwrap_or_default()))
            .bind(Json(analysis.map(|a| a.soft_skills.clone()).unwrap_or_default()))
            .bind(analysis.map(|a| a.communication_score).unwrap_or(0.0))
            .bind(analysis.map(|a| a.experience_match).unwrap_or(0.0))
            .bind(analysis.map(|a| a.culture_fit).unwrap_or(0.0))
            .bind(analysis.map(|a| a.recommendation.as_str()))
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_interview(&self, id: Uuid) -> Result<Option<InterviewRecord>> {
        let query = format!("SELECT {} FROM interviews WHERE id = $1", INTERVIEW_COLUMNS);
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(InterviewRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn search_completed_interviews(
        &self,
        search: &InterviewSearch,
    ) -> Result<Vec<InterviewRecord>> {
        let patterns: Vec<String> = search
            .skills
            .iter()
            .map(|s| format!("%{}%", escape_like(s.trim())))
            .collect();
        let query = format!(
            "SELECT {} FROM interviews \
             WHERE status = 'completed' AND overall_score >= $1 \
               AND (cardinality($2::text[]) = 0 OR EXISTS (\
                    SELECT 1 FROM jsonb_array_elements(technical_skills) s \
                    WHERE s->>'skill' ILIKE ANY($2::text[]) \
                      AND (s->>'proficiency')::float8 >= $4)) \
             ORDER BY overall_score DESC, created_at DESC \
             LIMIT $3",
            INTERVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(search.min_score)
            .bind(patterns)
            .bind(search.limit)
            .bind(search.min_proficiency)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(InterviewRecord::try_from).collect()
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    #[instrument(skip(self, update), fields(user_id = %update.user_id))]
    async fn upsert_profile_skills(
        &self,
        update: &ProfileSkillUpdate,
    ) -> Result<ProfileSkillSummary> {
        let summary = sqlx::query_as::<_, ProfileSkillSummary>(
            r#"
            INSERT INTO profile_skill_summaries (
                user_id, skills, communication_score, recent_interview_score,
                last_interview_at, interview_count, updated_at
            ) VALUES ($1, $2, $3, $4, $5, 1, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                skills = EXCLUDED.skills,
                communication_score = EXCLUDED.communication_score,
                recent_interview_score = EXCLUDED.recent_interview_score,
                last_interview_at = EXCLUDED.last_interview_at,
                interview_count = profile_skill_summaries.interview_count + 1,
                updated_at = NOW()
            RETURNING user_id, skills, communication_score, recent_interview_score,
                      last_interview_at, interview_count
            "#,
        )
        .bind(&update.user_id)
        .bind(&update.skills)
        .bind(update.communication_score)
        .bind(update.recent_interview_score)
        .bind(update.interviewed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn find_profile_skills(&self, user_id: &str) -> Result<Option<ProfileSkillSummary>> {
        let summary = sqlx::query_as::<_, ProfileSkillSummary>(
            r#"
            SELECT user_id, skills, communication_score, recent_interview_score,
                   last_interview_at, interview_count
            FROM profile_skill_summaries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }
}

/// Escapes `ILIKE` metacharacters so user input matches literally.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
