pub mod agent_service;
pub mod application_service;
pub mod candidate_service;
pub mod interview_service;
pub mod job_service;
pub mod media_storage;
pub mod profile_service;
pub mod question_service;
pub mod resume_service;
pub mod token_service;
