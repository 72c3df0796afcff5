//! HTTP collaborator for the OpenCore backend.
//!
//! One method per endpoint. Nothing is retried; callers treat every error
//! as a communication failure.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::attachments::mime_for;
use crate::chat::{ChatReply, ChatRequest};
use crate::error::{ClientError, Result};
use crate::graph::AgentGraphData;
use crate::heartbeat::HeartbeatStatus;
use crate::settings::SaveOutcome;

pub const API_AGENTS: &str = "/agents";
pub const API_HEARTBEAT: &str = "/heartbeat";
pub const API_CHAT: &str = "/chat";
pub const API_TRANSCRIBE: &str = "/transcribe";
pub const API_CONFIG: &str = "/config";
pub const API_AUTH_STATUS: &str = "/auth/status";

/// OAuth providers the backend can redirect to.
pub const LOGIN_PROVIDERS: &[&str] = &["google", "qwen"];

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and decode a JSON body, mapping non-2xx to `ClientError::Status`.
    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// `GET /agents`. A body with neither `graph` nor `agents` is an empty graph.
    pub async fn fetch_agents(&self) -> Result<AgentGraphData> {
        tracing::debug!("GET {API_AGENTS}");
        let body = self.send_json(self.client.get(self.url(API_AGENTS))).await?;
        Ok(AgentGraphData::from_response(&body).unwrap_or_default())
    }

    /// `GET /heartbeat`.
    pub async fn heartbeat(&self) -> Result<HeartbeatStatus> {
        let body = self.send_json(self.client.get(self.url(API_HEARTBEAT))).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `POST /heartbeat`: ask the backend to run its heartbeat now.
    pub async fn trigger_heartbeat(&self) -> Result<Value> {
        tracing::info!("POST {API_HEARTBEAT}");
        self.send_json(self.client.post(self.url(API_HEARTBEAT))).await
    }

    /// `POST /chat`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        tracing::info!(
            chars = request.message.len(),
            attachments = request.attachments.len(),
            "POST {API_CHAT}"
        );
        let body = self
            .send_json(self.client.post(self.url(API_CHAT)).json(request))
            .await?;
        Ok(ChatReply::from_value(&body))
    }

    /// `GET /config`.
    pub async fn get_config(&self) -> Result<Value> {
        self.send_json(self.client.get(self.url(API_CONFIG))).await
    }

    /// `POST /config`. A JSON error body is a rejection, not a failure.
    pub async fn save_config(&self, payload: &Value) -> Result<SaveOutcome> {
        let keys: Vec<&String> = payload.as_object().map(|o| o.keys().collect()).unwrap_or_default();
        tracing::info!(?keys, "POST {API_CONFIG}");
        let response = self.client.post(self.url(API_CONFIG)).json(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(SaveOutcome::from_value(&body)),
            Err(_) if !status.is_success() => Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// `GET /auth/status`.
    pub async fn auth_status(&self) -> Result<Value> {
        self.send_json(self.client.get(self.url(API_AUTH_STATUS))).await
    }

    /// URL that starts the redirect-based login for `provider`.
    pub fn login_url(&self, provider: &str) -> Option<String> {
        LOGIN_PROVIDERS
            .contains(&provider)
            .then(|| self.url(&format!("/auth/{provider}/login")))
    }

    /// `POST /transcribe` with the audio file as multipart part `audio`.
    pub async fn transcribe(&self, audio: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "recording.webm".to_string());
        tracing::info!(file = %file_name, bytes = bytes.len(), "POST {API_TRANSCRIBE}");
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(&file_name))?;
        let form = Form::new().part("audio", part);
        let body = self
            .send_json(self.client.post(self.url(API_TRANSCRIBE)).multipart(form))
            .await?;
        Ok(body
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
