use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::ResumeAiConfig;
use crate::dto::resume_dto::{ResumeParseData, ResumeUpload};
use crate::error::{Error, Result};

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
const MIN_TEXT_CHARS: usize = 50;
const PROMPT_TEXT_CHARS: usize = 4000;
const PREVIEW_CHARS: usize = 500;

const PARSE_INSTRUCTIONS: &str = r#"You are a resume parsing expert. Extract structured information from the resume text and return a JSON object with these exact fields:
{
  "name": "Full name",
  "email": "Email address",
  "phone": "Phone number",
  "skills": ["skill1", "skill2", "skill3"],
  "experience": "Brief summary of work experience",
  "education": "Education background",
  "jobTitle": "Current or most recent job title",
  "location": "Location/address",
  "summary": "Professional summary"
}

If any field is not found, use null. Extract all technical skills you can find. For experience, provide a concise summary. Return only valid JSON, no additional text."#;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        match mime {
            "application/pdf" => Ok(ResumeFormat::Pdf),
            "text/plain" => Ok(ResumeFormat::PlainText),
            other => Err(Error::Validation(format!(
                "Unsupported file type: {}. Please upload a PDF or text file.",
                other
            ))),
        }
    }
}

/// Structured profile pulled out of resume text. Every field is optional
/// because the extractor reports `null` for whatever it cannot find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Completeness score out of 100: contact and background fields, skill
/// count, a substantial summary and a job title.
pub fn ats_score(resume: &ParsedResume) -> u32 {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());

    let mut score = 0;
    for field in [
        &resume.name,
        &resume.email,
        &resume.phone,
        &resume.experience,
        &resume.education,
    ] {
        if present(field) {
            score += 10;
        }
    }

    score += match resume.skills.len() {
        0 => 0,
        1..=2 => 10 + 5,
        3..=4 => 10 + 10,
        5..=9 => 10 + 15,
        _ => 10 + 20,
    };

    if resume
        .summary
        .as_deref()
        .is_some_and(|s| s.chars().count() > 50)
    {
        score += 10;
    }
    if present(&resume.job_title) {
        score += 10;
    }

    score.min(100)
}

/// Turns plain resume text into a [`ParsedResume`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<ParsedResume>;
}

/// Chat-completions backed parser.
#[derive(Clone)]
pub struct OpenAiResumeParser {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiResumeParser {
    pub fn new(client: Client, api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
        }
    }
}

#[async_trait]
impl ResumeParser for OpenAiResumeParser {
    async fn parse(&self, text: &str) -> Result<ParsedResume> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": PARSE_INSTRUCTIONS },
                { "role": "user", "content": format!("Parse this resume:\n\n{}", text) }
            ],
            "temperature": 0.1,
            "max_tokens": 1000
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(60))
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("resume parser unreachable: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "resume parser returned {}: {}",
                status, body
            )));
        }

        let body: JsonValue = res.json().await?;
        completion_content(&body)
    }
}

/// Reads the first choice's message as a [`ParsedResume`], tolerating a
/// fenced code block around the JSON.
fn completion_content(body: &JsonValue) -> Result<ParsedResume> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| Error::Upstream("Invalid completion response format".to_string()))?;

    let json = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(json)
        .map_err(|e| Error::Upstream(format!("resume parser returned invalid JSON: {}", e)))
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredResumeParser;

#[async_trait]
impl ResumeParser for UnconfiguredResumeParser {
    async fn parse(&self, _text: &str) -> Result<ParsedResume> {
        Err(Error::Config("OPENAI_API_KEY is not set".to_string()))
    }
}

pub fn resume_parser_from_config(config: &ResumeAiConfig, client: Client) -> Arc<dyn ResumeParser> {
    match &config.api_key {
        Some(key) => Arc::new(OpenAiResumeParser::new(
            client,
            key.clone(),
            &config.base_url,
            config.model.clone(),
        )),
        None => Arc::new(UnconfiguredResumeParser),
    }
}

/// Plain text of an uploaded resume. Short results are rejected since they
/// usually mean a scanned document.
pub async fn extract_text(format: ResumeFormat, bytes: &[u8]) -> Result<String> {
    let text = match format {
        ResumeFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        ResumeFormat::Pdf => pdf_to_text(bytes).await?,
    };

    if text.trim().chars().count() < MIN_TEXT_CHARS {
        let message = match format {
            ResumeFormat::Pdf => {
                "PDF appears to be empty or contains mostly images. Please upload a text-based PDF."
            }
            ResumeFormat::PlainText => "Text file appears to be empty or too short.",
        };
        return Err(Error::Validation(message.to_string()));
    }
    Ok(text)
}

async fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    let unreadable = || {
        Error::Validation(
            "Failed to parse PDF. The file may be corrupted or password-protected.".to_string(),
        )
    };

    let mut child = Command::new("pdftotext")
        .args(["-layout", "-", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Config(format!("pdftotext is not available: {}", e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(bytes).await.map_err(|_| unreadable())?;
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(unreadable());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Clone)]
pub struct ResumeService {
    parser: Arc<dyn ResumeParser>,
}

impl ResumeService {
    pub fn new(parser: Arc<dyn ResumeParser>) -> Self {
        Self { parser }
    }

    /// Extracts text, structures it and scores it. A failing parser yields an
    /// empty profile rather than an error.
    pub async fn parse_upload(&self, upload: ResumeUpload) -> Result<ResumeParseData> {
        let bytes = upload
            .bytes
            .ok_or_else(|| Error::Validation("No file uploaded".to_string()))?;
        let file_type = upload.content_type.unwrap_or_default();
        let format = ResumeFormat::from_content_type(&file_type)?;
        if bytes.len() > MAX_RESUME_BYTES {
            return Err(Error::Validation("File size must be less than 10MB.".to_string()));
        }

        let text = extract_text(format, &bytes).await?;
        info!(chars = text.len(), ?format, "resume text extracted");

        let parsed = match self.parser.parse(prefix(&text, PROMPT_TEXT_CHARS)).await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "resume parsing failed, returning empty profile");
                ParsedResume::default()
            }
        };
        if parsed.name.is_none() && parsed.email.is_none() {
            warn!("no contact details extracted from resume");
        }

        let ats_score = ats_score(&parsed);
        let preview = prefix(&text, PREVIEW_CHARS);
        let extracted_text = if preview.len() < text.len() {
            format!("{}...", preview)
        } else {
            text.clone()
        };

        Ok(ResumeParseData {
            extracted_text,
            parsed_data: parsed,
            ats_score,
            filename: upload.filename,
            file_size: bytes.len(),
            file_type,
        })
    }
}
