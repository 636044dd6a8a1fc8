use std::sync::Arc;

use crate::database::repository::JobRepository;
use crate::dto::job_dto::{JobDetail, JobListItem};
use crate::error::{Error, Result};
use crate::utils::time::now;
use crate::utils::validation::parse_id;

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    /// Inactive jobs are reported as missing.
    pub async fn get(&self, job_id: &str) -> Result<JobDetail> {
        let id = parse_id("jobId", job_id)?;
        let job = self
            .jobs
            .find_job(id)
            .await?
            .filter(|job| job.is_active)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        Ok(JobDetail::from(job))
    }

    pub async fn list(&self) -> Result<Vec<JobListItem>> {
        let now = now();
        let jobs = self
            .jobs
            .list_active_jobs()
            .await?
            .into_iter()
            .map(|summary| JobListItem::from_summary(summary, now))
            .collect::<Vec<_>>();
        tracing::debug!(count = jobs.len(), "listed active jobs");
        Ok(jobs)
    }
}
