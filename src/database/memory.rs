use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, InterviewRepository, InterviewSearch, JobRepository, ProfileRepository,
};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication, ResumeAttachment};
use crate::models::interview::{InterviewRecord, NewInterview};
use crate::models::job::{JobOpportunity, JobSummary};
use crate::models::profile::{ProfileSkillSummary, ProfileSkillUpdate};

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, JobOpportunity>,
    applications: HashMap<Uuid, Application>,
    interviews: Vec<InterviewRecord>,
    profiles: HashMap<String, ProfileSkillSummary>,
}

/// In-process persistence gateway with the same semantics as `PgStore`,
/// including the (candidate, opportunity) and room name uniqueness rules.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    /// Seeds a job; jobs are created outside the workflows.
    pub fn insert_job(&self, job: JobOpportunity) -> Result<()> {
        self.tables()?.jobs.insert(job.id, job);
        Ok(())
    }

    pub fn application_count(&self) -> Result<usize> {
        Ok(self.tables()?.applications.len())
    }

    pub fn interviews(&self) -> Result<Vec<InterviewRecord>> {
        Ok(self.tables()?.interviews.clone())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<JobOpportunity>> {
        Ok(self.tables()?.jobs.get(&id).cloned())
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobSummary>> {
        let tables = self.tables()?;
        let mut jobs: Vec<JobSummary> = tables
            .jobs
            .values()
            .filter(|j| j.is_active)
            .map(|job| JobSummary {
                application_count: tables
                    .applications
                    .values()
                    .filter(|a| a.opportunity_id == job.id)
                    .count() as i64,
                job: job.clone(),
            })
            .collect();
        jobs.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at));
        Ok(jobs)
    }
}

fn pair_matches(app: &Application, candidate_id: &str, opportunity_id: Uuid) -> bool {
    app.candidate_id == candidate_id && app.opportunity_id == opportunity_id
}

fn advance(app: &mut Application, next: ApplicationStatus) -> Option<Application> {
    if app.status.can_advance_to(next) {
        app.status = next;
        app.updated_at = Utc::now();
        Some(app.clone())
    } else {
        None
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables()?.applications.get(&id).cloned())
    }

    async fn find_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
    ) -> Result<Option<Application>> {
        Ok(self
            .tables()?
            .applications
            .values()
            .find(|a| pair_matches(a, candidate_id, opportunity_id))
            .cloned())
    }

    async fn insert_application_if_absent(
        &self,
        new: &NewApplication,
    ) -> Result<(Application, bool)> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables
            .applications
            .values()
            .find(|a| pair_matches(a, &new.candidate_id, new.opportunity_id))
        {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            candidate_id: new.candidate_id.clone(),
            opportunity_id: new.opportunity_id,
            recruiter_id: new.recruiter_id.clone(),
            status: ApplicationStatus::Draft,
            resume_data: None,
            ats_score: None,
            resume_filename: None,
            created_at: now,
            updated_at: now,
        };
        tables.applications.insert(application.id, application.clone());
        Ok((application, true))
    }

    async fn attach_resume(
        &self,
        id: Uuid,
        resume: &ResumeAttachment,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables()?;
        let Some(app) = tables.applications.get_mut(&id) else {
            return Ok(None);
        };
        app.resume_data = resume.resume_data.clone();
        app.ats_score = resume.ats_score;
        app.resume_filename = resume.filename.clone();
        app.status = ApplicationStatus::ResumeUploaded;
        app.updated_at = Utc::now();
        Ok(Some(app.clone()))
    }

    async fn advance_application(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables()?;
        Ok(tables
            .applications
            .get_mut(&id)
            .and_then(|app| advance(app, next)))
    }

    async fn advance_application_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables()?;
        Ok(tables
            .applications
            .values_mut()
            .find(|a| pair_matches(a, candidate_id, opportunity_id))
            .and_then(|app| advance(app, next)))
    }
}

#[async_trait]
impl InterviewRepository for MemoryStore {
    async fn insert_interview(&self, new: &NewInterview) -> Result<InterviewRecord> {
        let mut tables = self.tables()?;
        if let Some(room) = &new.room_name {
            if tables
                .interviews
                .iter()
                .any(|i| i.room_name.as_deref() == Some(room.as_str()))
            {
                return Err(Error::Storage(format!("room name already used: {}", room)));
            }
        }

        let now = Utc::now();
        let record = InterviewRecord {
            id: Uuid::new_v4(),
            application_id: new.application_id,
            job_id: new.job_id,
            user_id: new.user_id.clone(),
            room_name: new.room_name.clone(),
            questions: new.questions.clone(),
            status: new.status,
            transcript: new.transcript.clone(),
            analysis: new.analysis.clone(),
            video_url: new.video_url.clone(),
            duration: new.duration,
            overall_score: new.overall_score(),
            recommendation: new.analysis.as_ref().map(|a| a.recommendation),
            created_at: now,
            updated_at: now,
        };
        tables.interviews.push(record.clone());
        Ok(record)
    }

    async fn find_interview(&self, id: Uuid) -> Result<Option<InterviewRecord>> {
        Ok(self
            .tables()?
            .interviews
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn search_completed_interviews(
        &self,
        search: &InterviewSearch,
    ) -> Result<Vec<InterviewRecord>> {
        let wanted: Vec<String> = search.skills.iter().map(|s| s.trim().to_lowercase()).collect();
        let mut found: Vec<InterviewRecord> = self
            .tables()?
            .interviews
            .iter()
            .filter(|i| i.status == crate::models::interview::InterviewStatus::Completed)
            .filter(|i| i.overall_score >= search.min_score)
            .filter(|i| {
                wanted.is_empty()
                    || i.analysis.as_ref().is_some_and(|a| {
                        a.technical_skills.iter().any(|s| {
                            let skill = s.skill.to_lowercase();
                            s.proficiency >= search.min_proficiency
                                && wanted.iter().any(|w| skill.contains(w.as_str()))
                        })
                    })
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.overall_score
                .total_cmp(&a.overall_score)
                .then(b.created_at.cmp(&a.created_at))
        });
        found.truncate(search.limit.max(0) as usize);
        Ok(found)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn upsert_profile_skills(
        &self,
        update: &ProfileSkillUpdate,
    ) -> Result<ProfileSkillSummary> {
        let mut tables = self.tables()?;
        let count = tables
            .profiles
            .get(&update.user_id)
            .map(|p| p.interview_count)
            .unwrap_or(0);
        let summary = ProfileSkillSummary {
            user_id: update.user_id.clone(),
            skills: update.skills.clone(),
            communication_score: update.communication_score,
            recent_interview_score: update.recent_interview_score,
            last_interview_at: update.interviewed_at,
            interview_count: count + 1,
        };
        tables.profiles.insert(update.user_id.clone(), summary.clone());
        Ok(summary)
    }

    async fn find_profile_skills(&self, user_id: &str) -> Result<Option<ProfileSkillSummary>> {
        Ok(self.tables()?.profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_app(candidate: &str, opportunity_id: Uuid) -> NewApplication {
        NewApplication {
            candidate_id: candidate.to_string(),
            opportunity_id,
            recruiter_id: Some("rec-1".into()),
        }
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_one_row_per_pair() {
        let store = MemoryStore::new();
        let job = Uuid::new_v4();
        let (first, created) = store.insert_application_if_absent(&new_app("c1", job)).await.unwrap();
        assert!(created);
        let (second, created) = store.insert_application_if_absent(&new_app("c1", job)).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.application_count().unwrap(), 1);

        let (_, created) = store.insert_application_if_absent(&new_app("c2", job)).await.unwrap();
        assert!(created);
        assert_eq!(store.application_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn advance_never_regresses() {
        let store = MemoryStore::new();
        let (app, _) = store
            .insert_application_if_absent(&new_app("c1", Uuid::new_v4()))
            .await
            .unwrap();
        let moved = store
            .advance_application(app.id, ApplicationStatus::InterviewScheduled)
            .await
            .unwrap();
        assert_eq!(moved.unwrap().status, ApplicationStatus::InterviewScheduled);
        let back = store
            .advance_application(app.id, ApplicationStatus::ResumeUploaded)
            .await
            .unwrap();
        assert!(back.is_none());
        let stored = store.find_application(app.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::InterviewScheduled);
    }

    #[tokio::test]
    async fn duplicate_room_names_are_rejected() {
        let store = MemoryStore::new();
        let mut new = NewInterview::new(Uuid::new_v4(), crate::models::interview::InterviewStatus::Scheduled);
        new.room_name = Some("interview_a_1".into());
        store.insert_interview(&new).await.unwrap();
        let err = store.insert_interview(&new).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn profile_upsert_increments_interview_count() {
        let store = MemoryStore::new();
        let update = ProfileSkillUpdate {
            user_id: "u1".into(),
            skills: vec!["Rust".into()],
            communication_score: 80.0,
            recent_interview_score: 75.0,
            interviewed_at: Utc::now(),
        };
        store.upsert_profile_skills(&update).await.unwrap();
        let summary = store.upsert_profile_skills(&update).await.unwrap();
        assert_eq!(summary.interview_count, 2);
        assert_eq!(summary.skills, vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn skill_search_requires_proficient_match() {
        use crate::models::interview::{InterviewAnalysis, InterviewStatus, SkillProficiency};

        let store = MemoryStore::new();
        for (user, level) in [("weak", 10.0), ("strong", 75.0)] {
            let mut new = NewInterview::new(Uuid::new_v4(), InterviewStatus::Completed);
            new.user_id = Some(user.into());
            new.analysis = Some(InterviewAnalysis {
                overall_score: 90.0,
                technical_skills: vec![SkillProficiency {
                    skill: "Rust".into(),
                    proficiency: level,
                }],
                ..InterviewAnalysis::default()
            });
            store.insert_interview(&new).await.unwrap();
        }

        let found = store
            .search_completed_interviews(&InterviewSearch {
                min_score: 60.0,
                skills: vec!["rust".into()],
                min_proficiency: 60.0,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id.as_deref(), Some("strong"));
    }
}
