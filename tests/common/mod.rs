#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use hirehub_backend::{
    config::{Config, LiveKitConfig},
    database::memory::MemoryStore,
    models::job::JobOpportunity,
    routes::api_router,
    services::media_storage::InMemoryMediaStorage,
    AppState,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

pub const LIVEKIT_SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub media: Arc<InMemoryMediaStorage>,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.livekit = LiveKitConfig {
        api_key: Some("APItest".into()),
        api_secret: Some(LIVEKIT_SECRET.into()),
        ws_url: Some("wss://rooms.test".into()),
    };
    config.agent.startup_delay = Duration::ZERO;
    config.public_rps = 1_000;
    config
}

pub fn spawn_app_with(config: Config) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(InMemoryMediaStorage::new());
    let state = AppState::with_store(config, store.clone(), media.clone()).expect("app state");
    TestApp {
        router: api_router(state),
        store,
        media,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn job(title: &str, active: bool, created_at: DateTime<Utc>) -> JobOpportunity {
    JobOpportunity {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: Some("Build things".into()),
        requirements: None,
        job_type: Some("full_time".into()),
        experience_level: Some("Senior".into()),
        salary_min: None,
        salary_max: None,
        location: None,
        remote_allowed: true,
        skills_required: vec!["Rust".into(), "PostgreSQL".into()],
        skills_preferred: vec![],
        recruiter_id: Some("recruiter-1".into()),
        company_id: None,
        company_name: Some("Acme".into()),
        is_active: active,
        created_at,
    }
}

pub fn seed_job(app: &TestApp, active: bool) -> Uuid {
    let job = job("Backend Engineer", active, Utc::now());
    let id = job.id;
    app.store.insert_job(job).expect("seed job");
    id
}

async fn read(router: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let res = router.clone().oneshot(req).await.expect("response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: JsonValue,
) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    read(&app.router, req).await
}

pub async fn get(app: &TestApp, uri: &str) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    read(&app.router, req).await
}

/// Multipart body with text fields and an optional `video` file part.
pub async fn send_multipart(
    app: &TestApp,
    uri: &str,
    fields: &[(&str, &str)],
    video: Option<&[u8]>,
) -> (StatusCode, JsonValue) {
    let file = video.map(|bytes| FilePart {
        field: "video",
        filename: "interview.webm",
        content_type: "video/webm",
        bytes,
    });
    send_multipart_file(app, uri, fields, file).await
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub async fn send_multipart_file(
    app: &TestApp,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> (StatusCode, JsonValue) {
    let boundary = "hirehub-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(part) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                part.field, part.filename, part.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");
    read(&app.router, req).await
}
