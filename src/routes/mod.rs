pub mod applications;
pub mod candidates;
pub mod extract;
pub mod health;
pub mod interviews;
pub mod jobs;
pub mod livekit;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::dto::{
    application_dto, candidate_dto, interview_dto, job_dto, livekit_dto, resume_dto,
};
use crate::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::models::{application, interview, question};
use crate::services::agent_service::AgentStatus;
use crate::services::resume_service::ParsedResume;
use crate::AppState;

/// Recordings are posted as a single multipart body.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        applications::start_application,
        applications::attach_resume,
        interviews::create_interview,
        interviews::create_session,
        interviews::start_agent,
        interviews::upload_interview,
        interviews::complete_interview,
        interviews::get_interview,
        jobs::get_job,
        jobs::list_jobs,
        livekit::issue_token,
        candidates::search_candidates,
        resumes::parse_resume,
        health::health,
    ),
    components(schemas(
        application_dto::StartApplicationRequest,
        application_dto::StartApplicationResponse,
        application_dto::AttachResumeRequest,
        application_dto::AttachResumeResponse,
        interview_dto::CreateInterviewRequest,
        interview_dto::CreateInterviewResponse,
        interview_dto::CreateSessionRequest,
        interview_dto::CreateSessionResponse,
        interview_dto::StartAgentRequest,
        interview_dto::StartAgentResponse,
        interview_dto::UploadInterviewResponse,
        interview_dto::CompleteInterviewRequest,
        interview_dto::CompleteInterviewResponse,
        job_dto::JobDetail,
        job_dto::CompanyRef,
        job_dto::JobListItem,
        job_dto::JobListResponse,
        livekit_dto::RoomTokenRequest,
        livekit_dto::RoomTokenResponse,
        candidate_dto::CandidateMatch,
        candidate_dto::SkillBreakdown,
        candidate_dto::SearchSummary,
        candidate_dto::CandidateSearchResponse,
        resume_dto::ResumeParseData,
        resume_dto::ParseResumeResponse,
        ParsedResume,
        application::Application,
        application::ApplicationStatus,
        interview::InterviewRecord,
        interview::InterviewStatus,
        interview::InterviewAnalysis,
        interview::InterviewConfig,
        interview::InterviewSession,
        interview::Recommendation,
        interview::SkillProficiency,
        interview::SoftSkillRating,
        question::Question,
        question::QuestionCategory,
        AgentStatus,
    )),
    tags(
        (name = "applications", description = "Candidate applications"),
        (name = "interviews", description = "Interview rooms, agents and results"),
        (name = "jobs", description = "Job catalogue"),
        (name = "livekit", description = "Room credentials"),
        (name = "candidates", description = "Candidate search"),
        (name = "resumes", description = "Resume parsing and scoring"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Every API route with its state applied. Cross-cutting layers (CORS,
/// tracing, static files) are added by the binary.
pub fn api_router(state: AppState) -> Router {
    let limiter = RateLimiter::per_second(state.config.public_rps);

    let api = Router::new()
        .route("/applications/start", post(applications::start_application))
        .route("/applications/:id/resume", put(applications::attach_resume))
        .route("/interviews/create", post(interviews::create_interview))
        .route("/interviews/create-session", post(interviews::create_session))
        .route("/interviews/start-agent", post(interviews::start_agent))
        .route("/interviews/upload", post(interviews::upload_interview))
        .route("/interviews/complete", post(interviews::complete_interview))
        .route("/interviews/:id", get(interviews::get_interview))
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:job_id", get(jobs::get_job))
        .route("/livekit/token", post(livekit::issue_token))
        .route("/candidates/search", get(candidates::search_candidates))
        .route("/parse-resume", post(resumes::parse_resume))
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
}
