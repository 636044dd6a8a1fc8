mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hirehub_backend::database::repository::ApplicationRepository;
use hirehub_backend::models::application::ApplicationStatus;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{seed_job, send_json, spawn_app};

#[tokio::test]
async fn starting_twice_returns_the_same_application() {
    let app = spawn_app();
    let job_id = seed_job(&app, true);
    let body = json!({ "candidateId": "cand-1", "opportunityId": job_id });

    let (status, first) = send_json(&app, "POST", "/applications/start", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "draft");
    assert_eq!(first["message"], "Application started successfully");

    let (status, second) = send_json(&app, "POST", "/applications/start", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], "Application already exists");
    assert_eq!(first["applicationId"], second["applicationId"]);
    assert_eq!(app.store.application_count().unwrap(), 1);
}

#[tokio::test]
async fn concurrent_starts_store_one_row() {
    let app = spawn_app();
    let job_id = seed_job(&app, true);
    let body = json!({ "candidateId": "cand-race", "opportunityId": job_id });

    let (a, b) = tokio::join!(
        send_json(&app, "POST", "/applications/start", body.clone()),
        send_json(&app, "POST", "/applications/start", body.clone()),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.1["applicationId"], b.1["applicationId"]);
    assert_eq!(app.store.application_count().unwrap(), 1);
}

#[tokio::test]
async fn start_validates_identifiers_and_job() {
    let app = spawn_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "opportunityId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": "c", "opportunityId": "not-a-uuid" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": "c", "opportunityId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(app.store.application_count().unwrap(), 0);
}

#[tokio::test]
async fn resume_upload_sets_status_regardless_of_prior_state() {
    let app = spawn_app();
    let job_id = seed_job(&app, true);
    let (_, started) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": "cand-2", "opportunityId": job_id }),
    )
    .await;
    let id: Uuid = serde_json::from_value(started["applicationId"].clone()).unwrap();

    app.store
        .advance_application(id, ApplicationStatus::InterviewScheduled)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/applications/{}/resume", id),
        json!({
            "resumeData": { "skills": ["Rust"], "candidateId": "cand-2" },
            "atsScore": 82.5,
            "filename": "cv.pdf"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["application"]["status"], "resume_uploaded");
    assert_eq!(body["application"]["atsScore"], 82.5);
    assert_eq!(body["application"]["resumeFilename"], "cv.pdf");
}

#[tokio::test]
async fn resume_upload_rejects_bad_ids() {
    let app = spawn_app();

    let (status, body) = send_json(
        &app,
        "PUT",
        "/applications/%20/resume",
        json!({ "filename": "cv.pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/applications/{}/resume", Uuid::new_v4()),
        json!({ "filename": "cv.pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = spawn_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/applications/start",
        json!({ "candidateId": 123, "opportunityId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["error"].is_string());

    let req = Request::builder()
        .method("POST")
        .uri("/applications/start")
        .body(Body::from(r#"{"candidateId":"c"}"#))
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.store.application_count().unwrap(), 0);
}
