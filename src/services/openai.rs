// src/services/openai.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::ai::{AiError, ModelClient, ModelRequest};
use crate::common::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<OpenAIError> for AiError {
    fn from(err: OpenAIError) -> Self {
        AiError::UpstreamFailure(err.to_string())
    }
}

const SYSTEM_PROMPT: &str = "You are the assistant inside a project management tool. \
Always reply with a single JSON object that matches the requested schema and nothing else.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Chat-completions client for the hosted model.
///
/// One request per call. Failures are returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct OpenAIService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAIService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, request: &ModelRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: Some(0.2),
            response_format: Some(serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.flow,
                    "schema": request.output_schema,
                    "strict": false
                }
            })),
        }
    }

    /// Send one chat completion and return the reply text
    pub async fn complete(&self, request: &ModelRequest) -> Result<String, OpenAIError> {
        let api_key = self.api_key.as_deref().ok_or(OpenAIError::NotConfigured)?;
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        debug!(flow = request.flow, model = %self.model, "Sending OpenAI request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| OpenAIError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "OpenAI API request failed");
            return Err(OpenAIError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenAIError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &body.usage {
            info!(
                flow = request.flow,
                model = %self.model,
                tokens_used = usage.total_tokens,
                "OpenAI completion finished"
            );
        }

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::InvalidResponse("No choices in response".to_string()))
    }
}

#[async_trait]
impl ModelClient for OpenAIService {
    async fn generate(&self, request: ModelRequest) -> Result<String, AiError> {
        Ok(self.complete(&request).await?)
    }
}
