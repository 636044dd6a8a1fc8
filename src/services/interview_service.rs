use std::sync::Arc;
use uuid::Uuid;

use crate::database::repository::{InterviewRepository, JobRepository};
use crate::dto::interview_dto::{
    CompleteInterviewRequest, CreateInterviewRequest, CreateSessionRequest, StartAgentRequest,
    StartAgentResponse, VideoSubmission,
};
use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::interview::{
    InterviewConfig, InterviewRecord, InterviewSession, InterviewStatus, NewInterview,
};
use crate::models::profile::ProfileSkillUpdate;
use crate::services::agent_service::{AgentLaunchRequest, AgentLauncher};
use crate::services::application_service::ApplicationService;
use crate::services::media_storage::MediaStorage;
use crate::services::profile_service::ProfileSync;
use crate::services::question_service::{JobContext, QuestionGenerator, ResumeProfile};
use crate::services::token_service::{TokenIssuer, TokenRequest, VideoGrant};
use crate::utils::time::now_millis;
use crate::utils::validation::{require, require_id, validate};

pub const AGENT_IDENTITY: &str = "ai_interviewer";
pub const AGENT_DISPLAY_NAME: &str = "AI Interviewer";
const VIDEO_CONTENT_TYPE: &str = "video/webm";

/// Collaborators of the interview workflow.
pub struct InterviewDeps {
    pub jobs: Arc<dyn JobRepository>,
    pub interviews: Arc<dyn InterviewRepository>,
    pub applications: ApplicationService,
    pub tokens: TokenIssuer,
    pub agent: Arc<dyn AgentLauncher>,
    pub media: Arc<dyn MediaStorage>,
    pub questions: Arc<dyn QuestionGenerator>,
    pub profiles: ProfileSync,
}

#[derive(Clone)]
pub struct InterviewService {
    jobs: Arc<dyn JobRepository>,
    interviews: Arc<dyn InterviewRepository>,
    applications: ApplicationService,
    tokens: TokenIssuer,
    agent: Arc<dyn AgentLauncher>,
    media: Arc<dyn MediaStorage>,
    questions: Arc<dyn QuestionGenerator>,
    profiles: ProfileSync,
}

impl InterviewService {
    pub fn new(deps: InterviewDeps) -> Self {
        Self {
            jobs: deps.jobs,
            interviews: deps.interviews,
            applications: deps.applications,
            tokens: deps.tokens,
            agent: deps.agent,
            media: deps.media,
            questions: deps.questions,
            profiles: deps.profiles,
        }
    }

    /// Generates the question set, reserves a room name and stores a
    /// `scheduled` interview for the application.
    pub async fn create_interview(&self, payload: CreateInterviewRequest) -> Result<InterviewRecord> {
        validate(&payload)?;
        let application_id = require_id("applicationId", payload.application_id.as_deref())?;
        let job_id = require_id("jobId", payload.job_id.as_deref())?;

        let application = self.applications.find(application_id).await?;
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .map(|job| JobContext {
                job_id: Some(job.id),
                title: Some(job.title),
                required_skills: job.skills_required,
            })
            .unwrap_or_else(|| JobContext {
                job_id: Some(job_id),
                ..JobContext::default()
            });

        let resume = ResumeProfile::from_value(payload.resume_data.as_ref());
        let questions = self.questions.generate(&job, &resume);
        let room_name = format!("interview_{}_{}", application_id, now_millis());

        let mut new = NewInterview::new(job_id, InterviewStatus::Scheduled);
        new.application_id = application.as_ref().map(|a| a.id);
        new.user_id = resume
            .candidate_id
            .clone()
            .or_else(|| application.as_ref().map(|a| a.candidate_id.clone()));
        new.room_name = Some(room_name);
        new.questions = questions;

        let record = self.interviews.insert_interview(&new).await?;

        if application.is_some() {
            if let Err(e) = self
                .applications
                .advance(application_id, ApplicationStatus::InterviewScheduled)
                .await
            {
                tracing::warn!(%application_id, error = %e, "could not advance application");
            }
        }

        tracing::info!(
            interview_id = %record.id,
            %application_id,
            room = record.room_name.as_deref().unwrap_or_default(),
            "interview scheduled"
        );
        Ok(record)
    }

    /// Mints the candidate and agent credentials for a fresh room.
    pub fn create_session(&self, payload: CreateSessionRequest) -> Result<InterviewSession> {
        validate(&payload)?;
        let user_id = require("userId", payload.user_id.as_deref())?;
        let job_id = require("jobId", payload.job_id.as_deref())?;
        let job_title = require("jobTitle", payload.job_title.as_deref())?;

        let ws_url = self.tokens.ws_url()?.to_string();
        let room_name = format!("interview_{}_{}_{}", job_id, user_id, now_millis());

        let participant = self.tokens.issue(&TokenRequest {
            identity: user_id.to_string(),
            name: Some(format!("Candidate_{}", user_id)),
            grant: VideoGrant::participant(&room_name),
        })?;
        let agent = self.tokens.issue(&TokenRequest {
            identity: AGENT_IDENTITY.to_string(),
            name: Some(AGENT_DISPLAY_NAME.to_string()),
            grant: VideoGrant::participant(&room_name),
        })?;

        let config = InterviewConfig {
            job_title: job_title.to_string(),
            job_description: payload.job_description.unwrap_or_default(),
            required_skills: payload.required_skills.unwrap_or_default(),
            experience_level: payload
                .experience_level
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| InterviewConfig::DEFAULT_EXPERIENCE_LEVEL.to_string()),
            company: payload.company.unwrap_or_default(),
            duration: InterviewConfig::DEFAULT_DURATION_MINUTES,
        };

        tracing::info!(room = %room_name, user_id, "interview session created");

        Ok(InterviewSession {
            id: Uuid::new_v4(),
            system_prompt: config.system_prompt(),
            room_name,
            participant_token: participant.jwt,
            agent_token: agent.jwt,
            ws_url,
            expires_at: participant.expires_at,
            status: InterviewStatus::Pending,
            transcript: String::new(),
            config,
        })
    }

    pub async fn start_agent(&self, payload: StartAgentRequest) -> Result<StartAgentResponse> {
        let room_name = require("roomName", payload.room_name.as_deref())?;
        let token = require("token", payload.token.as_deref())?;
        let system_prompt = require("systemPrompt", payload.system_prompt.as_deref())?;

        let ack = self
            .agent
            .launch(&AgentLaunchRequest {
                room_name: room_name.to_string(),
                token: token.to_string(),
                system_prompt: system_prompt.to_string(),
                interview_config: payload.interview_config.clone(),
            })
            .await?;

        Ok(StartAgentResponse {
            success: true,
            message: ack.message,
            room_name: room_name.to_string(),
            agent_status: ack.status,
            note: ack.note,
        })
    }

    /// Stores the recording and a `completed` interview pointing at it.
    pub async fn complete_with_video(&self, submission: VideoSubmission) -> Result<InterviewRecord> {
        let video = submission
            .video
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Validation("video is required".to_string()))?;
        let job_id = require_id("jobId", submission.job_id.as_deref())?;
        let user_id = require("userId", submission.user_id.as_deref())?;
        let duration = submission
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<i32>().ok())
            .unwrap_or(0);

        let key = format!("interviews/{}/{}_{}.webm", user_id, job_id, now_millis());
        let video_url = self.media.upload(&key, video, VIDEO_CONTENT_TYPE).await?;

        let mut new = NewInterview::new(job_id, InterviewStatus::Completed);
        new.user_id = Some(user_id.to_string());
        new.video_url = Some(video_url);
        new.duration = duration;

        let record = self.interviews.insert_interview(&new).await?;
        tracing::info!(interview_id = %record.id, user_id, %job_id, "interview video stored");
        Ok(record)
    }

    /// Stores transcript and analysis as a `completed` interview, then
    /// refreshes the profile summary in the background and closes the
    /// application.
    pub async fn complete_with_transcript(
        &self,
        payload: CompleteInterviewRequest,
    ) -> Result<InterviewRecord> {
        validate(&payload)?;
        let job_id = require_id("jobId", payload.job_id.as_deref())?;
        let user_id = require("userId", payload.user_id.as_deref())?;
        let analysis = payload
            .analysis
            .ok_or_else(|| Error::Validation("analysis is required".to_string()))?;

        let mut new = NewInterview::new(job_id, InterviewStatus::Completed);
        new.user_id = Some(user_id.to_string());
        new.transcript = payload.transcript;
        new.duration = payload.duration.unwrap_or(0);
        new.analysis = Some(analysis);

        let record = self.interviews.insert_interview(&new).await?;

        if let Some(analysis) = &record.analysis {
            self.profiles.spawn(ProfileSkillUpdate::from_analysis(
                user_id,
                analysis,
                record.created_at,
            ));
        }

        if let Err(e) = self
            .applications
            .advance_for_pair(user_id, job_id, ApplicationStatus::Completed)
            .await
        {
            tracing::warn!(user_id, %job_id, error = %e, "could not close application");
        }

        tracing::info!(
            interview_id = %record.id,
            user_id,
            score = record.overall_score,
            "interview completed"
        );
        Ok(record)
    }

    pub async fn find(&self, id: Uuid) -> Result<InterviewRecord> {
        self.interviews
            .find_interview(id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }
}
