use crate::responses::{ApiErrorResponse, ChatCompletionResponse};
use async_trait::async_trait;
use configuration::AzureOpenAiConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::LlmError;

/// The fixed prompt used by connectivity checks; any sane deployment can
/// answer it, so a failure points at credentials rather than the model.
pub const PROBE_PROMPT: &str = "Hello! What is 2+2?";

/// The role of a single chat message on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

/// The generic, abstract interface to a chat-completion model.
/// The pipeline agents depend on this trait, allowing the Azure-backed
/// implementation to be swapped for a scripted one in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the messages and returns the assistant's completion text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// The JSON body of a chat-completion request.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f64,
}

/// A concrete `ChatModel` backed by an Azure OpenAI deployment.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    url: String,
    temperature: f64,
}

impl AzureOpenAiClient {
    /// Builds a client from resolved credentials.
    ///
    /// The URL shape is fixed by the Azure REST surface:
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
    /// with the key carried in the `api-key` header.
    pub fn new(
        config: &AzureOpenAiConfig,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| LlmError::ClientBuild(format!("invalid api-key header: {e}")))?;
        key.set_sensitive(true);
        headers.insert("api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            url: completion_url(config),
            temperature,
        })
    }

    /// Sends the setup-verification prompt and returns the completion.
    pub async fn probe(&self) -> Result<String, LlmError> {
        self.complete(&[ChatMessage::user(PROBE_PROMPT)]).await
    }

    /// The endpoint this client will POST to (key not included).
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Renders the deployment's chat-completions URL.
pub fn completion_url(config: &AzureOpenAiConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment_name,
        config.api_version
    )
}

#[async_trait]
impl ChatModel for AzureOpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let payload = ChatCompletionRequest {
            messages,
            temperature: self.temperature,
        };

        tracing::debug!(url = %self.url, messages = messages.len(), "sending chat completion");
        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let completion: ChatCompletionResponse = serde_json::from_str(&text)
                .map_err(|e| LlmError::Deserialization(e.to_string()))?;
            return completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or(LlmError::EmptyCompletion);
        }

        // Non-2xx: try the Azure error envelope, fall back to the raw body.
        let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (status.as_str().to_string(), text),
        };

        if status == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Unauthorized { detail: message });
        }
        Err(LlmError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
