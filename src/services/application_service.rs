use std::sync::Arc;
use uuid::Uuid;

use crate::database::repository::{ApplicationRepository, JobRepository};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication, ResumeAttachment};
use crate::utils::validation::{require, require_id};

/// Result of `start`: the stored application and whether this call created it.
#[derive(Debug, Clone)]
pub struct StartedApplication {
    pub application: Application,
    pub created: bool,
}

impl StartedApplication {
    pub fn message(&self) -> &'static str {
        if self.created {
            "Application started successfully"
        } else {
            "Application already exists"
        }
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl ApplicationService {
    pub fn new(jobs: Arc<dyn JobRepository>, applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { jobs, applications }
    }

    /// Returns the candidate's application to the opportunity, creating a
    /// draft on first call.
    pub async fn start(
        &self,
        candidate_id: Option<&str>,
        opportunity_id: Option<&str>,
    ) -> Result<StartedApplication> {
        let candidate_id = require("candidateId", candidate_id)?;
        let opportunity_id = require_id("opportunityId", opportunity_id)?;

        let job = self
            .jobs
            .find_job(opportunity_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job opportunity not found".to_string()))?;

        if let Some(existing) = self
            .applications
            .find_application_for_pair(candidate_id, opportunity_id)
            .await?
        {
            return Ok(StartedApplication {
                application: existing,
                created: false,
            });
        }

        let (application, created) = self
            .applications
            .insert_application_if_absent(&NewApplication {
                candidate_id: candidate_id.to_string(),
                opportunity_id,
                recruiter_id: job.recruiter_id,
            })
            .await?;

        if created {
            tracing::info!(
                application_id = %application.id,
                candidate_id,
                %opportunity_id,
                "application started"
            );
        }

        Ok(StartedApplication {
            application,
            created,
        })
    }

    /// Overwrites the resume fields and moves the application to
    /// `resume_uploaded`, whatever its current status.
    pub async fn attach_resume(
        &self,
        application_id: Option<&str>,
        resume: ResumeAttachment,
    ) -> Result<Application> {
        let id = require_id("applicationId", application_id)?;

        let application = self
            .applications
            .attach_resume(id, &resume)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        tracing::info!(application_id = %id, "resume attached");
        Ok(application)
    }

    /// Forward-only status move. Returns `None` when the move would regress,
    /// repeat, or leave a terminal status, or when the application is unknown.
    pub async fn advance(&self, id: Uuid, next: ApplicationStatus) -> Result<Option<Application>> {
        let moved = self.applications.advance_application(id, next).await?;
        if moved.is_none() {
            tracing::debug!(application_id = %id, status = %next, "application status unchanged");
        }
        Ok(moved)
    }

    pub async fn advance_for_pair(
        &self,
        candidate_id: &str,
        opportunity_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        self.applications
            .advance_application_for_pair(candidate_id, opportunity_id, next)
            .await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Application>> {
        self.applications.find_application(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::{MockApplicationRepository, MockJobRepository};
    use chrono::Utc;

    fn job(id: Uuid) -> crate::models::job::JobOpportunity {
        crate::models::job::JobOpportunity {
            id,
            title: "Backend Engineer".into(),
            description: None,
            requirements: None,
            job_type: None,
            experience_level: None,
            salary_min: None,
            salary_max: None,
            location: None,
            remote_allowed: true,
            skills_required: vec![],
            skills_preferred: vec![],
            recruiter_id: Some("rec-9".into()),
            company_id: None,
            company_name: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn application(id: Uuid, status: ApplicationStatus) -> Application {
        Application {
            id,
            candidate_id: "c1".into(),
            opportunity_id: Uuid::new_v4(),
            recruiter_id: None,
            status,
            resume_data: None,
            ats_score: None,
            resume_filename: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn start_rejects_blank_candidate_without_touching_storage() {
        let service = ApplicationService::new(
            Arc::new(MockJobRepository::new()),
            Arc::new(MockApplicationRepository::new()),
        );
        let err = service
            .start(Some(" "), Some(&Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn start_on_unknown_job_is_not_found() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_job().returning(|_| Ok(None));
        let service = ApplicationService::new(Arc::new(jobs), Arc::new(MockApplicationRepository::new()));

        let err = service
            .start(Some("c1"), Some(&Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn start_inherits_recruiter_from_job() {
        let job_id = Uuid::new_v4();
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_job().returning(move |id| Ok(Some(job(id))));

        let mut apps = MockApplicationRepository::new();
        apps.expect_find_application_for_pair().returning(|_, _| Ok(None));
        apps.expect_insert_application_if_absent()
            .withf(|new| new.recruiter_id.as_deref() == Some("rec-9") && new.candidate_id == "c1")
            .times(1)
            .returning(|new| {
                let mut app = application(Uuid::new_v4(), ApplicationStatus::Draft);
                app.opportunity_id = new.opportunity_id;
                app.recruiter_id = new.recruiter_id.clone();
                Ok((app, true))
            });

        let service = ApplicationService::new(Arc::new(jobs), Arc::new(apps));
        let started = service
            .start(Some("c1"), Some(&job_id.to_string()))
            .await
            .unwrap();
        assert!(started.created);
        assert_eq!(started.message(), "Application started successfully");
        assert_eq!(started.application.status, ApplicationStatus::Draft);
    }

    #[tokio::test]
    async fn attach_resume_on_unknown_application_is_not_found() {
        let mut apps = MockApplicationRepository::new();
        apps.expect_attach_resume().returning(|_, _| Ok(None));
        let service = ApplicationService::new(Arc::new(MockJobRepository::new()), Arc::new(apps));

        let err = service
            .attach_resume(
                Some(&Uuid::new_v4().to_string()),
                ResumeAttachment {
                    resume_data: None,
                    ats_score: None,
                    filename: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
