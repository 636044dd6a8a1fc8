pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::postgres::PgStore;
use crate::database::repository::Store;
use crate::error::Result;
use crate::services::{
    agent_service::launcher_from_config,
    application_service::ApplicationService,
    candidate_service::CandidateSearchService,
    interview_service::{InterviewDeps, InterviewService},
    job_service::JobService,
    media_storage::{LocalMediaStorage, MediaStorage},
    profile_service::ProfileSync,
    question_service::TemplateQuestionGenerator,
    resume_service::{resume_parser_from_config, ResumeService},
    token_service::TokenIssuer,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub token_issuer: TokenIssuer,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
    pub job_service: JobService,
    pub candidate_search: CandidateSearchService,
    pub resume_service: ResumeService,
}

impl AppState {
    /// Production wiring: Postgres gateway and local media storage.
    pub fn new(config: Config, pool: PgPool) -> Result<Self> {
        let media = Arc::new(LocalMediaStorage::new(
            &config.uploads_dir,
            &config.public_base_url,
        )?);
        Self::with_store(config, Arc::new(PgStore::new(pool)), media)
    }

    pub fn with_store<S>(config: Config, store: Arc<S>, media: Arc<dyn MediaStorage>) -> Result<Self>
    where
        S: Store + 'static,
    {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let token_issuer = TokenIssuer::new(&config.livekit);
        let agent = launcher_from_config(&config.agent, http_client.clone())?;
        let resume_service =
            ResumeService::new(resume_parser_from_config(&config.resume_ai, http_client));
        let application_service = ApplicationService::new(store.clone(), store.clone());
        let interview_service = InterviewService::new(InterviewDeps {
            jobs: store.clone(),
            interviews: store.clone(),
            applications: application_service.clone(),
            tokens: token_issuer.clone(),
            agent,
            media,
            questions: Arc::new(TemplateQuestionGenerator),
            profiles: ProfileSync::new(store.clone()),
        });
        let job_service = JobService::new(store.clone());
        let candidate_search = CandidateSearchService::new(store);

        Ok(Self {
            config: Arc::new(config),
            token_issuer,
            application_service,
            interview_service,
            job_service,
            candidate_search,
            resume_service,
        })
    }
}
