use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single interview prompt. Generated once when the interview is created and
/// stored alongside it; never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub category: QuestionCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Technical,
    Experience,
    Behavioral,
    Motivation,
    Goals,
}

impl QuestionCategory {
    /// Order in which an interview walks through the categories.
    pub const ALL: [QuestionCategory; 5] = [
        QuestionCategory::Technical,
        QuestionCategory::Experience,
        QuestionCategory::Behavioral,
        QuestionCategory::Motivation,
        QuestionCategory::Goals,
    ];
}
