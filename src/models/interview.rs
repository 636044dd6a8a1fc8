use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Pending => "pending",
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InterviewStatus::Pending),
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "in_progress" => Ok(InterviewStatus::InProgress),
            "completed" => Ok(InterviewStatus::Completed),
            other => Err(format!("unknown interview status: {}", other)),
        }
    }
}

/// Hiring recommendation attached to an analysis. The analysis producer may
/// use the finer grained `strong_hire`/`hire`/`no_hire` labels; they collapse
/// onto yes/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    #[serde(alias = "strong_hire", alias = "hire")]
    Yes,
    #[serde(alias = "no_hire")]
    No,
    #[default]
    Maybe,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Yes => "yes",
            Recommendation::No => "no",
            Recommendation::Maybe => "maybe",
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" | "strong_hire" | "hire" => Ok(Recommendation::Yes),
            "no" | "no_hire" => Ok(Recommendation::No),
            "maybe" => Ok(Recommendation::Maybe),
            other => Err(format!("unknown recommendation: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkillProficiency {
    pub skill: String,
    #[serde(default)]
    pub proficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SoftSkillRating {
    pub skill: String,
    #[serde(default)]
    pub rating: f64,
}

/// Structured result of an interview, produced by the agent or a reviewer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct InterviewAnalysis {
    pub overall_score: f64,
    pub technical_skills: Vec<SkillProficiency>,
    pub soft_skills: Vec<SoftSkillRating>,
    pub communication_score: f64,
    pub experience_match: f64,
    pub culture_fit: f64,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub summary: Option<String>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub job_id: Uuid,
    pub user_id: Option<String>,
    pub room_name: Option<String>,
    pub questions: Vec<Question>,
    pub status: InterviewStatus,
    pub transcript: Option<String>,
    pub analysis: Option<InterviewAnalysis>,
    pub video_url: Option<String>,
    pub duration: i32,
    pub overall_score: f64,
    pub recommendation: Option<Recommendation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for an interview record. Each workflow entry point fills the
/// subset it owns.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub application_id: Option<Uuid>,
    pub job_id: Uuid,
    pub user_id: Option<String>,
    pub room_name: Option<String>,
    pub questions: Vec<Question>,
    pub status: InterviewStatus,
    pub transcript: Option<String>,
    pub analysis: Option<InterviewAnalysis>,
    pub video_url: Option<String>,
    pub duration: i32,
}

impl NewInterview {
    pub fn new(job_id: Uuid, status: InterviewStatus) -> Self {
        Self {
            application_id: None,
            job_id,
            user_id: None,
            room_name: None,
            questions: Vec::new(),
            status,
            transcript: None,
            analysis: None,
            video_url: None,
            duration: 0,
        }
    }

    pub fn overall_score(&self) -> f64 {
        self.analysis.as_ref().map(|a| a.overall_score).unwrap_or(0.0)
    }
}

/// Job context attached to a live session and handed to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConfig {
    pub job_title: String,
    pub job_description: String,
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub company: String,
    /// Planned length in minutes.
    pub duration: u32,
}

impl InterviewConfig {
    pub const DEFAULT_EXPERIENCE_LEVEL: &'static str = "Mid";
    pub const DEFAULT_DURATION_MINUTES: u32 = 30;

    /// Instructions for the interviewer agent.
    pub fn system_prompt(&self) -> String {
        let skills = self.required_skills.join(", ");
        format!(
            "You are a professional AI interviewer conducting a {level} level interview for a {title} position at {company}.\n\
             \n\
             INTERVIEW GUIDELINES:\n\
             - Be conversational and engaging\n\
             - Ask follow-up questions based on responses\n\
             - Evaluate technical skills: {skills}\n\
             - Assess communication, problem-solving, and culture fit\n\
             - Keep questions relevant to the experience level\n\
             - Conduct approximately 5-7 questions over 15-20 minutes\n\
             - Be encouraging but maintain professionalism\n\
             \n\
             JOB CONTEXT:\n\
             Position: {title}\n\
             Company: {company}\n\
             Required Skills: {skills}\n\
             Experience Level: {level}\n\
             Description: {description}\n\
             \n\
             CONVERSATION FLOW:\n\
             1. Start with a warm greeting and brief introduction\n\
             2. Ask the candidate to introduce themselves\n\
             3. Explore their relevant experience and skills\n\
             4. Ask behavioral and technical questions\n\
             5. Conclude with next steps and thank them",
            level = self.experience_level,
            title = self.job_title,
            company = self.company,
            skills = skills,
            description = self.job_description,
        )
    }
}

/// A live interview room with the credentials for both participants. Not
/// persisted; the stored record is written on completion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub room_name: String,
    pub participant_token: String,
    pub agent_token: String,
    pub ws_url: String,
    pub expires_at: DateTime<Utc>,
    pub status: InterviewStatus,
    pub transcript: String,
    pub config: InterviewConfig,
    pub system_prompt: String,
}
