use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub livekit: LiveKitConfig,
    pub public_base_url: String,
    pub uploads_dir: String,
    pub agent: AgentConfig,
    pub resume_ai: ResumeAiConfig,
    pub public_rps: u32,
    pub log_format: LogFormat,
}

/// Room transport credentials. Every field is optional so that the server can
/// boot without them; requests that need them fail with a configuration error.
#[derive(Debug, Clone, Default)]
pub struct LiveKitConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub ws_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Simulated,
    Http,
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub mode: AgentMode,
    pub dispatch_url: Option<String>,
    pub startup_delay: Duration,
}

/// Chat-completions endpoint used to structure uploaded resumes. Without a
/// key, parsing degrades to an empty profile.
#[derive(Debug, Clone)]
pub struct ResumeAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ResumeAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let agent_mode = match get_env_or("AGENT_MODE", "simulated").as_str() {
            "simulated" => AgentMode::Simulated,
            "http" => AgentMode::Http,
            other => {
                return Err(Error::Config(format!(
                    "Invalid value for AGENT_MODE: {} (expected simulated or http)",
                    other
                )))
            }
        };
        let log_format = match get_env_or("LOG_FORMAT", "pretty").as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3000"),
            database_url: get_optional_env("DATABASE_URL"),
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            livekit: LiveKitConfig {
                api_key: get_optional_env("LIVEKIT_API_KEY"),
                api_secret: get_optional_env("LIVEKIT_API_SECRET"),
                ws_url: get_optional_env("LIVEKIT_URL"),
            },
            public_base_url: get_env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            uploads_dir: get_env_or("UPLOADS_DIR", "./uploads"),
            agent: AgentConfig {
                mode: agent_mode,
                dispatch_url: get_optional_env("AGENT_DISPATCH_URL"),
                startup_delay: Duration::from_millis(get_env_parse_or(
                    "AGENT_STARTUP_DELAY_MS",
                    1000,
                )?),
            },
            resume_ai: ResumeAiConfig {
                api_key: get_optional_env("OPENAI_API_KEY"),
                base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: get_env_or("RESUME_PARSE_MODEL", "gpt-3.5-turbo"),
            },
            public_rps: get_env_parse_or("PUBLIC_RPS", 100)?,
            log_format,
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| Error::Config("Missing environment variable: DATABASE_URL".to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            database_url: None,
            database_max_connections: 5,
            livekit: LiveKitConfig::default(),
            public_base_url: "http://localhost:3000".to_string(),
            uploads_dir: "./uploads".to_string(),
            agent: AgentConfig {
                mode: AgentMode::Simulated,
                dispatch_url: None,
                startup_delay: Duration::from_millis(1000),
            },
            resume_ai: ResumeAiConfig::default(),
            public_rps: 100,
            log_format: LogFormat::Pretty,
        }
    }
}

fn get_optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}
