use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    ResumeUploaded,
    InterviewScheduled,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::ResumeUploaded => "resume_uploaded",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ApplicationStatus::Draft => 0,
            ApplicationStatus::ResumeUploaded => 1,
            ApplicationStatus::InterviewScheduled => 2,
            ApplicationStatus::Completed => 3,
            ApplicationStatus::Rejected => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Completed | ApplicationStatus::Rejected
        )
    }

    /// Whether a workflow step may move an application from `self` to `next`.
    pub fn can_advance_to(&self, next: ApplicationStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Statuses from which `next` is a forward move.
    pub fn predecessors_of(next: ApplicationStatus) -> Vec<ApplicationStatus> {
        [
            ApplicationStatus::Draft,
            ApplicationStatus::ResumeUploaded,
            ApplicationStatus::InterviewScheduled,
            ApplicationStatus::Completed,
            ApplicationStatus::Rejected,
        ]
        .into_iter()
        .filter(|s| s.can_advance_to(next))
        .collect()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ApplicationStatus::Draft),
            "resume_uploaded" => Ok(ApplicationStatus::ResumeUploaded),
            "interview_scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "completed" => Ok(ApplicationStatus::Completed),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub candidate_id: String,
    pub opportunity_id: Uuid,
    pub recruiter_id: Option<String>,
    pub status: ApplicationStatus,
    #[schema(value_type = Option<Object>)]
    pub resume_data: Option<JsonValue>,
    pub ats_score: Option<f64>,
    pub resume_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values needed to insert a fresh draft application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub candidate_id: String,
    pub opportunity_id: Uuid,
    pub recruiter_id: Option<String>,
}

/// Resume fields written by the resume step.
#[derive(Debug, Clone)]
pub struct ResumeAttachment {
    pub resume_data: Option<JsonValue>,
    pub ats_score: Option<f64>,
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        use ApplicationStatus::*;
        assert!(Draft.can_advance_to(ResumeUploaded));
        assert!(Draft.can_advance_to(InterviewScheduled));
        assert!(ResumeUploaded.can_advance_to(Completed));
        assert!(!InterviewScheduled.can_advance_to(ResumeUploaded));
        assert!(!InterviewScheduled.can_advance_to(InterviewScheduled));
        assert!(!Completed.can_advance_to(Rejected));
        assert!(!Rejected.can_advance_to(Completed));
    }

    #[test]
    fn predecessors_exclude_terminal_and_later_states() {
        let preds = ApplicationStatus::predecessors_of(ApplicationStatus::InterviewScheduled);
        assert_eq!(
            preds,
            vec![ApplicationStatus::Draft, ApplicationStatus::ResumeUploaded]
        );
    }

    #[test]
    fn status_round_trips_through_text() {
        for s in ["draft", "resume_uploaded", "interview_scheduled", "completed", "rejected"] {
            let parsed: ApplicationStatus = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }
}
