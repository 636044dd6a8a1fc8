use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::database::repository::ProfileRepository;
use crate::models::profile::ProfileSkillUpdate;

/// Keeps the denormalized profile skill summary in step with completed
/// interviews. Runs detached from the request that triggered it.
#[derive(Clone)]
pub struct ProfileSync {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileSync {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Upserts the summary on a background task. Failures are logged and
    /// dropped; the handle is only useful to tests.
    pub fn spawn(&self, update: ProfileSkillUpdate) -> JoinHandle<()> {
        let profiles = self.profiles.clone();
        tokio::spawn(async move {
            match profiles.upsert_profile_skills(&update).await {
                Ok(summary) => tracing::debug!(
                    user_id = %summary.user_id,
                    interviews = summary.interview_count,
                    "profile skills updated"
                ),
                Err(e) => tracing::warn!(
                    user_id = %update.user_id,
                    error = %e,
                    "profile skill sync failed"
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::MockProfileRepository;
    use crate::error::Error;
    use chrono::Utc;

    fn update() -> ProfileSkillUpdate {
        ProfileSkillUpdate {
            user_id: "u1".into(),
            skills: vec!["Rust".into()],
            communication_score: 70.0,
            recent_interview_score: 80.0,
            interviewed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sync_failure_is_swallowed() {
        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile_skills()
            .times(1)
            .returning(|_| Err(Error::Storage("down".into())));

        let sync = ProfileSync::new(Arc::new(repo));
        sync.spawn(update()).await.unwrap();
    }
}
