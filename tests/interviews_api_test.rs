mod common;

use std::time::Duration;

use axum::http::StatusCode;
use hirehub_backend::config::LiveKitConfig;
use hirehub_backend::database::repository::{ApplicationRepository, ProfileRepository};
use hirehub_backend::models::application::ApplicationStatus;
use hirehub_backend::models::interview::InterviewStatus;
use hirehub_backend::services::token_service::RoomClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::json;
use uuid::Uuid;

use common::{
    get, seed_job, send_json, send_multipart, spawn_app, spawn_app_with, test_config,
    LIVEKIT_SECRET,
};

fn claims(jwt: &str) -> RoomClaims {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    decode::<RoomClaims>(
        jwt,
        &DecodingKey::from_secret(LIVEKIT_SECRET.as_bytes()),
        &validation,
    )
    .expect("valid token")
    .claims
}

#[tokio::test]
async fn create_interview_returns_five_ordered_questions() {
    let app = spawn_app();
    let job_id = seed_job(&app, true);
    let (_, started) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": "cand-1", "opportunityId": job_id }),
    )
    .await;
    let application_id = started["applicationId"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/create",
        json!({
            "applicationId": application_id,
            "jobId": job_id,
            "resumeData": { "candidateId": "cand-1", "skills": ["TypeScript", "React"] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["roomName"]
        .as_str()
        .unwrap()
        .starts_with(&format!("interview_{}_", application_id)));

    let questions = body["questions"].as_array().unwrap();
    let categories: Vec<&str> = questions
        .iter()
        .map(|q| q["category"].as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec!["technical", "experience", "behavioral", "motivation", "goals"]
    );
    assert_eq!(
        questions[0]["question"],
        "Tell me about your experience with TypeScript."
    );

    let stored = app.store.interviews().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, InterviewStatus::Scheduled);

    let id: Uuid = application_id.parse().unwrap();
    let application = app.store.find_application(id).await.unwrap().unwrap();
    assert_eq!(application.status, ApplicationStatus::InterviewScheduled);
}

#[tokio::test]
async fn create_interview_requires_ids() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/create",
        json!({ "jobId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(app.store.interviews().unwrap().is_empty());
}

#[tokio::test]
async fn session_tokens_target_one_room_for_two_hours() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/create-session",
        json!({
            "userId": "user_1",
            "jobId": "job_1",
            "jobTitle": "Frontend Engineer",
            "company": "Acme",
            "requiredSkills": ["React"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["session"];
    let room = session["roomName"].as_str().unwrap();
    assert!(room.starts_with("interview_job_1_user_1_"));
    assert_eq!(session["status"], "pending");
    assert_eq!(session["transcript"], "");
    assert_eq!(session["wsUrl"], "wss://rooms.test");
    assert_eq!(session["config"]["experienceLevel"], "Mid");
    assert_eq!(session["config"]["duration"], 30);
    assert!(session["systemPrompt"]
        .as_str()
        .unwrap()
        .contains("Frontend Engineer position at Acme"));

    let candidate = claims(session["participantToken"].as_str().unwrap());
    let agent = claims(session["agentToken"].as_str().unwrap());
    assert_eq!(candidate.video.room, room);
    assert_eq!(agent.video.room, room);
    assert_eq!(candidate.sub, "user_1");
    assert_eq!(agent.sub, "ai_interviewer");
    assert_eq!(agent.name.as_deref(), Some("AI Interviewer"));
    assert_eq!(candidate.exp - candidate.nbf, 7200);
    assert_eq!(agent.exp - agent.nbf, 7200);
}

#[tokio::test]
async fn session_without_job_title_is_rejected_before_configuration() {
    let mut config = test_config();
    config.livekit = LiveKitConfig::default();
    let app = spawn_app_with(config);

    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/create-session",
        json!({ "userId": "u", "jobId": "j" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/create-session",
        json!({ "userId": "u", "jobId": "j", "jobTitle": "Engineer" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "configuration_error");
    assert_eq!(body["error"], "Server configuration error");
}

#[tokio::test]
async fn simulated_agent_start_is_acknowledged() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/start-agent",
        json!({
            "roomName": "interview_job_1_user_1_1",
            "token": "agent-token",
            "systemPrompt": "You are an interviewer",
            "interviewConfig": { "jobTitle": "Engineer" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["agentStatus"], "simulated");
    assert_eq!(body["roomName"], "interview_job_1_user_1_1");
    assert!(body["note"].is_string());

    let (status, _) = send_json(
        &app,
        "POST",
        "/interviews/start-agent",
        json!({ "roomName": "r", "token": "t" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transcript_completion_persists_analysis() {
    let app = spawn_app();
    let job_id = seed_job(&app, true);
    send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": "user_9", "opportunityId": job_id }),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/complete",
        json!({
            "jobId": job_id,
            "userId": "user_9",
            "transcript": "Q: ... A: ...",
            "analysis": {
                "overall_score": 7,
                "recommendation": "maybe",
                "technical_skills": [{ "skill": "Rust", "proficiency": 70 }]
            },
            "duration": 900
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallScore"], 7.0);
    assert_eq!(body["analysis"]["recommendation"], "maybe");

    let stored = app.store.interviews().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, InterviewStatus::Completed);
    assert_eq!(stored[0].overall_score, 7.0);
    assert_eq!(stored[0].duration, 900);

    let application = app
        .store
        .find_application_for_pair("user_9", job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Completed);

    let mut profile = None;
    for _ in 0..20 {
        profile = app.store.find_profile_skills("user_9").await.unwrap();
        if profile.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let profile = profile.expect("profile synced");
    assert_eq!(profile.skills, vec!["Rust".to_string()]);
    assert_eq!(profile.recent_interview_score, 7.0);
}

#[tokio::test]
async fn transcript_without_analysis_is_rejected_and_not_stored() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/complete",
        json!({ "jobId": Uuid::new_v4(), "userId": "u", "transcript": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(app.store.interviews().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_recommendation_is_a_validation_error() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/interviews/complete",
        json!({
            "jobId": Uuid::new_v4(),
            "userId": "u",
            "analysis": { "overall_score": 8, "recommendation": "strong_yes" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(app.store.interviews().unwrap().is_empty());
}

#[tokio::test]
async fn upload_without_multipart_body_is_rejected() {
    let app = spawn_app();
    let (status, body) = send_json(&app, "POST", "/interviews/upload", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn video_upload_stores_recording() {
    let app = spawn_app();
    let job_id = Uuid::new_v4().to_string();

    let (status, body) = send_multipart(
        &app,
        "/interviews/upload",
        &[("jobId", job_id.as_str()), ("userId", "user_3"), ("duration", "125")],
        Some(&b"fake-webm"[..]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let url = body["videoUrl"].as_str().unwrap();
    let key = url.trim_start_matches("memory://interview-videos/");
    assert!(key.starts_with(&format!("interviews/user_3/{}_", job_id)));
    assert_eq!(app.media.object(key), Some(("video/webm".to_string(), 9)));

    let stored = app.store.interviews().unwrap();
    assert_eq!(stored[0].duration, 125);
    assert_eq!(stored[0].status, InterviewStatus::Completed);

    let (status, fetched) = get(&app, &format!("/interviews/{}", stored[0].id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["videoUrl"], url);
}

#[tokio::test]
async fn video_upload_failures() {
    let app = spawn_app();
    let job_id = Uuid::new_v4().to_string();

    let (status, _) = send_multipart(
        &app,
        "/interviews/upload",
        &[("jobId", job_id.as_str()), ("userId", "user_3")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.media.fail_uploads(true);
    let (status, body) = send_multipart(
        &app,
        "/interviews/upload",
        &[("jobId", job_id.as_str()), ("userId", "user_3")],
        Some(&b"bytes"[..]),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "storage_error");
    assert!(app.store.interviews().unwrap().is_empty());
}

#[tokio::test]
async fn room_token_endpoint() {
    let app = spawn_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/livekit/token",
        json!({ "identity": "viewer", "room": "lobby" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "wss://rooms.test");
    let c = claims(body["token"].as_str().unwrap());
    assert_eq!(c.video.room, "lobby");
    assert_eq!(c.sub, "viewer");

    let (status, _) = send_json(&app, "POST", "/livekit/token", json!({ "identity": "viewer" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
