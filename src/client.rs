//! Remote completion client: one chat-completions request per dispatch.
//!
//! [`CompletionClient`] is the seam between the dispatcher and the network.
//! [`OpenAiClient`] speaks the OpenAI REST protocol with reqwest; tests plug
//! in scripted implementations to observe exactly what would be sent.
//!
//! HTTP failures are classified here, once, into [`RemoteError`] variants so
//! the dispatcher can map them to user-facing messages without looking at
//! status codes.

use crate::config::{AssistantConfig, Credential};
use crate::error::{AssistantError, RemoteError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

// ── Wire types ───────────────────────────────────────────────────────────

/// One message in a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A single-turn request carrying `prompt` as the only user message.
    pub fn single_turn(prompt: impl Into<String>, config: &AssistantConfig) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ── Client trait ─────────────────────────────────────────────────────────

/// Sends one completion request and returns the first choice's text,
/// untrimmed.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

/// reqwest-backed client for OpenAI-compatible chat-completions endpoints.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
}

impl OpenAiClient {
    /// Build a client for the endpoint in `config`.
    ///
    /// No request timeout is set; reqwest's default applies.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("contract-assistant/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AssistantError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: config.completions_url(),
        })
    }
}

impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<String, RemoteError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        debug!("Completion endpoint answered HTTP {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }
        parse_completion(&body)
    }
}

/// Map a non-success HTTP response to a [`RemoteError`].
pub fn classify_failure(status: u16, body: &str) -> RemoteError {
    let message = api_error_message(body).unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("HTTP {status}")
        } else {
            trimmed.to_string()
        }
    });

    match status {
        429 => RemoteError::RateLimited { message },
        401 => RemoteError::Authentication { message },
        _ => RemoteError::Api { status, message },
    }
}

/// Pull `error.message` out of an OpenAI error envelope.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

/// Extract the first choice's content from a success body.
pub fn parse_completion(body: &str) -> Result<String, RemoteError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(RemoteError::EmptyResponse)
}
