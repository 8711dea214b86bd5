// ABOUTME: Chat-completion collaborator interface for the deck-slides application
// ABOUTME: Defines the ChatCompleter trait and its HTTP implementation

use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{DeckError, Result};

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// A completion request: messages plus sampling temperature. The planner
/// samples warmer than the per-slide generator.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// External text-generation collaborator.
///
/// Implementations accept a role-tagged message list and return a text blob
/// expected to parse as JSON. Transport faults and collaborator-reported
/// errors surface as `CompletionFailed`; callers decide whether that is
/// fatal (planning) or retryable (slide generation).
pub trait ChatCompleter {
    fn complete_json(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Connection settings for the HTTP completer.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub timeout_ms: u64,
}

impl LlmConfig {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        timeout_ms: u64,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| {
            DeckError::ConfigError(format!("Invalid API base URL '{}': {}", base_url, err))
        })?;
        Ok(Self { api_key, base_url, model, timeout_ms })
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Chat-completion client for any OpenAI-style endpoint.
pub struct HttpCompleter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpCompleter {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(DeckError::FetchError)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

impl ChatCompleter for HttpCompleter {
    fn complete_json(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send {
        async move {
            let body = ChatRequestBody {
                model: &self.config.model,
                messages: &request.messages,
                temperature: request.temperature,
                response_format: ResponseFormat { kind: "json_object" },
            };

            debug!(
                "Requesting completion from {} ({} messages)",
                self.endpoint(),
                request.messages.len()
            );

            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await
                .map_err(DeckError::FetchError)?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(DeckError::CompletionFailed(format!(
                    "HTTP {}: {}",
                    status,
                    detail.chars().take(200).collect::<String>()
                )));
            }

            let parsed: ChatResponseBody = response.json().await.map_err(DeckError::FetchError)?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| {
                    DeckError::CompletionFailed("completion returned no choices".to_string())
                })
        }
    }
}
