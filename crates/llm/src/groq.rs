//! Groq chat-completions client.
//!
//! Speaks the OpenAI-compatible chat API that Groq serves. The client
//! owns a request timeout and retries once on transient failures
//! (connect errors, timeouts, 429, 5xx); any error after that is
//! terminal for the turn.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use aqua_agent_config::LlmSettings;
use aqua_agent_core::{GenerateRequest, LanguageModel, LlmError};

/// Groq-backed [`LanguageModel`].
pub struct GroqClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl GroqClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    async fn request_completion(&self, body: &ChatRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(content)
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            temperature: self.temperature,
            max_tokens: request.max_tokens.or(self.max_tokens),
        };

        match self.request_completion(&body).await {
            Ok(content) => Ok(content),
            Err(error) if is_transient(&error) => {
                tracing::warn!(%error, "transient completion failure, retrying once");
                self.request_completion(&body).await
            }
            Err(error) => Err(error),
        }
    }
}

fn is_transient(error: &LlmError) -> bool {
    match error {
        LlmError::Request(_) => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        LlmError::EmptyCompletion => false,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
