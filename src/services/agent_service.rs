use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use utoipa::ToSchema;

use crate::config::{AgentConfig, AgentMode};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentLaunchRequest {
    pub room_name: String,
    pub token: String,
    pub system_prompt: String,
    pub interview_config: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// No agent joined; the launcher only pretended.
    Simulated,
    /// The request was handed to an external agent runner.
    Dispatched,
}

#[derive(Debug, Clone)]
pub struct AgentAck {
    pub status: AgentStatus,
    pub message: String,
    pub note: Option<String>,
}

/// Brings an interviewer agent into a room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentLauncher: Send + Sync {
    async fn launch(&self, request: &AgentLaunchRequest) -> Result<AgentAck>;
}

/// Waits a fixed delay and acknowledges without starting anything.
#[derive(Debug, Clone)]
pub struct SimulatedAgentLauncher {
    delay: Duration,
}

impl SimulatedAgentLauncher {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AgentLauncher for SimulatedAgentLauncher {
    async fn launch(&self, request: &AgentLaunchRequest) -> Result<AgentAck> {
        info!(room = %request.room_name, "Starting simulated interview agent");
        tokio::time::sleep(self.delay).await;
        info!(room = %request.room_name, "Simulated agent ready");

        Ok(AgentAck {
            status: AgentStatus::Simulated,
            message: "Interview agent simulation started".to_string(),
            note: Some(
                "Demo mode: no conversational agent joined the room. Set AGENT_MODE=http to dispatch a real agent."
                    .to_string(),
            ),
        })
    }
}

/// Posts launch requests to an external agent runner.
#[derive(Clone)]
pub struct HttpAgentLauncher {
    client: Client,
    dispatch_url: String,
}

impl HttpAgentLauncher {
    pub fn new(client: Client, dispatch_url: String) -> Self {
        Self {
            client,
            dispatch_url,
        }
    }
}

#[async_trait]
impl AgentLauncher for HttpAgentLauncher {
    async fn launch(&self, request: &AgentLaunchRequest) -> Result<AgentAck> {
        info!(room = %request.room_name, url = %self.dispatch_url, "Dispatching interview agent");
        let resp = self
            .client
            .post(&self.dispatch_url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("agent dispatch failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "agent runner returned {}: {}",
                status, body
            )));
        }

        Ok(AgentAck {
            status: AgentStatus::Dispatched,
            message: "Interview agent dispatched".to_string(),
            note: None,
        })
    }
}

/// Picks the launcher named by `AGENT_MODE`.
pub fn launcher_from_config(config: &AgentConfig, client: Client) -> Result<Arc<dyn AgentLauncher>> {
    match config.mode {
        AgentMode::Simulated => Ok(Arc::new(SimulatedAgentLauncher::new(config.startup_delay))),
        AgentMode::Http => {
            let url = config.dispatch_url.clone().ok_or_else(|| {
                Error::Config("AGENT_DISPATCH_URL is required when AGENT_MODE=http".to_string())
            })?;
            Ok(Arc::new(HttpAgentLauncher::new(client, url)))
        }
    }
}
