//! Persistence gateway.
//!
//! Workflows only see these traits. `PgStore` backs them with Postgres and
//! `MemoryStore` keeps everything in process for tests and local demos.
//! Single-row lookups return `Ok(None)` when the row is absent; callers decide
//! whether that is a `NotFound`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, NewApplication, ResumeAttachment};
use crate::models::interview::{InterviewRecord, NewInterview};
use crate::models::job::{JobOpportunity, JobSummary};
use crate::models::profile::{ProfileSkillSummary, ProfileSkillUpdate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_job(&self, id: Uuid) -> Result<Option<JobOpportunity>>;

    /// Active jobs, newest first, with their application counts.
    async fn list_active_jobs(&self) -> Result<Vec<JobSummary>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn find_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
    ) -> Result<Option<Application>>;

    /// Inserts a draft application unless one already exists for the
    /// (candidate, opportunity) pair. Returns the stored row and whether this
    /// call created it. Uniqueness is enforced by the store, so two concurrent
    /// callers both end up with the same row.
    async fn insert_application_if_absent(
        &self,
        new: &NewApplication,
    ) -> Result<(Application, bool)>;

    /// Overwrites the resume fields and sets status to `resume_uploaded`
    /// regardless of the current status.
    async fn attach_resume(
        &self,
        id: Uuid,
        resume: &ResumeAttachment,
    ) -> Result<Option<Application>>;

    /// Moves the application to `next` only if that is a forward move.
    /// Returns the updated row, or `None` when nothing changed.
    async fn advance_application(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>>;

    async fn advance_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSearch {
    pub min_score: f64,
    pub skills: Vec<String>,
    /// A technical skill only matches `skills` at or above this level.
    pub min_proficiency: f64,
    pub limit: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn insert_interview(&self, new: &NewInterview) -> Result<InterviewRecord>;

    async fn find_interview(&self, id: Uuid) -> Result<Option<InterviewRecord>>;

    /// Completed interviews scoring at least `min_score`, best first. When
    /// `skills` is non-empty only interviews with a technical skill containing
    /// one of them (case-insensitive, literal) at `min_proficiency` or above
    /// are returned.
    async fn search_completed_interviews(
        &self,
        query: &InterviewSearch,
    ) -> Result<Vec<InterviewRecord>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn upsert_profile_skills(
        &self,
        update: &ProfileSkillUpdate,
    ) -> Result<ProfileSkillSummary>;

    async fn find_profile_skills(&self, user_id: &str) -> Result<Option<ProfileSkillSummary>>;
}

/// Convenience bound for a single backend implementing the whole gateway.
pub trait Store:
    JobRepository + ApplicationRepository + InterviewRepository + ProfileRepository
{
}

impl<T> Store for T where
    T: JobRepository + ApplicationRepository + InterviewRepository + ProfileRepository
{
}
