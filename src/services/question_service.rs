use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::question::{Question, QuestionCategory};

const FALLBACK_SKILL: &str = "your main technical skills";

/// What the generator knows about the job being interviewed for.
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    pub job_id: Option<Uuid>,
    pub title: Option<String>,
    pub required_skills: Vec<String>,
}

/// The parts of a parsed resume the generator looks at. Anything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeProfile {
    pub candidate_id: Option<String>,
    pub name: Option<String>,
    pub skills: Vec<String>,
}

impl ResumeProfile {
    /// Lenient read of an arbitrary resume payload. Malformed input yields an
    /// empty profile.
    pub fn from_value(value: Option<&JsonValue>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn top_skill(&self) -> Option<&str> {
        self.skills
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// Produces the ordered question list for a new interview.
pub trait QuestionGenerator: Send + Sync {
    fn generate(&self, job: &JobContext, resume: &ResumeProfile) -> Vec<Question>;
}

/// Static template keyed on the candidate's top listed skill.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateQuestionGenerator;

impl QuestionGenerator for TemplateQuestionGenerator {
    fn generate(&self, job: &JobContext, resume: &ResumeProfile) -> Vec<Question> {
        generate_questions(job, resume)
    }
}

/// One question per category, in `QuestionCategory::ALL` order.
pub fn generate_questions(_job: &JobContext, resume: &ResumeProfile) -> Vec<Question> {
    let skill = resume.top_skill().unwrap_or(FALLBACK_SKILL);

    QuestionCategory::ALL
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let text = match category {
                QuestionCategory::Technical => {
                    format!("Tell me about your experience with {}.", skill)
                }
                QuestionCategory::Experience => {
                    "Describe a challenging project you've worked on recently.".to_string()
                }
                QuestionCategory::Behavioral => {
                    "How do you handle working in a team environment?".to_string()
                }
                QuestionCategory::Motivation => {
                    "What interests you most about this role?".to_string()
                }
                QuestionCategory::Goals => {
                    "Where do you see your career heading in the next few years?".to_string()
                }
            };
            Question {
                id: format!("q{}", idx + 1),
                question: text,
                category: *category,
            }
        })
        .collect()
}
