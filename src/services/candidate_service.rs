use std::sync::Arc;

use crate::database::repository::{InterviewRepository, InterviewSearch};
use crate::dto::candidate_dto::{
    CandidateMatch, CandidateSearchQuery, CandidateSearchResponse, SearchSummary, SkillBreakdown,
};
use crate::error::Result;
use crate::models::interview::InterviewRecord;
use crate::utils::validation::validate;

pub const DEFAULT_MIN_SCORE: f64 = 60.0;
pub const DEFAULT_LIMIT: i64 = 10;
/// Proficiency at which a technical skill counts as a match.
pub const PROFICIENT: f64 = 60.0;

/// Score and skill filter over completed interviews.
#[derive(Clone)]
pub struct CandidateSearchService {
    interviews: Arc<dyn InterviewRepository>,
}

impl CandidateSearchService {
    pub fn new(interviews: Arc<dyn InterviewRepository>) -> Self {
        Self { interviews }
    }

    pub async fn search(&self, query: CandidateSearchQuery) -> Result<CandidateSearchResponse> {
        validate(&query)?;
        let skills: Vec<String> = query
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let records = self
            .interviews
            .search_completed_interviews(&InterviewSearch {
                min_score: query.min_score.unwrap_or(DEFAULT_MIN_SCORE),
                skills: skills.clone(),
                min_proficiency: PROFICIENT,
                limit: query.limit.unwrap_or(DEFAULT_LIMIT),
            })
            .await?;

        let candidates: Vec<CandidateMatch> = records.into_iter().map(to_match).collect();
        let summary = SearchSummary {
            total_matches: candidates.len(),
            skill_breakdown: skills
                .iter()
                .map(|skill| breakdown(skill, &candidates))
                .collect(),
        };

        Ok(CandidateSearchResponse {
            candidates,
            search_method: "basic".to_string(),
            summary,
        })
    }
}

fn to_match(record: InterviewRecord) -> CandidateMatch {
    let analysis = record.analysis.unwrap_or_default();
    CandidateMatch {
        interview_id: record.id,
        user_id: record.user_id,
        job_id: record.job_id,
        overall_score: record.overall_score,
        communication_rating: analysis.communication_score,
        recommendation: record.recommendation,
        key_strengths: analysis.strengths,
        skill_proficiencies: analysis.technical_skills,
        summary: analysis.summary,
        completed_at: record.updated_at,
    }
}

fn breakdown(skill: &str, candidates: &[CandidateMatch]) -> SkillBreakdown {
    let needle = skill.to_lowercase();
    let levels: Vec<f64> = candidates
        .iter()
        .filter_map(|c| {
            c.skill_proficiencies
                .iter()
                .filter(|s| s.proficiency >= PROFICIENT && s.skill.to_lowercase().contains(&needle))
                .map(|s| s.proficiency)
                .reduce(f64::max)
        })
        .collect();

    let average_proficiency = if levels.is_empty() {
        0.0
    } else {
        levels.iter().sum::<f64>() / levels.len() as f64
    };

    SkillBreakdown {
        skill: skill.to_string(),
        candidate_count: levels.len(),
        average_proficiency,
    }
}
