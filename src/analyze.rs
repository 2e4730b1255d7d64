//! Analysis dispatch: one prompt, one remote call, one displayable result.
//!
//! [`dispatch`] never returns `Err`. Every outcome, including a missing
//! credential and each class of remote failure, becomes an [`Analysis`]
//! whose [`Display`](std::fmt::Display) output is the text shown to the user.
//! The interaction surfaces therefore have a single rendering path for the
//! result area.

use crate::client::{ChatRequest, CompletionClient};
use crate::config::{AssistantConfig, Credential};
use crate::error::RemoteError;
use crate::prompts::{
    build_prompt, generic_failure_message, AUTH_FAILED_MESSAGE, CREDENTIAL_NOT_CONFIGURED,
    RATE_LIMIT_MESSAGE,
};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Analysis {
    /// The model's answer, whitespace-trimmed.
    Answer(String),
    /// No credential was configured; nothing was sent.
    MissingCredential,
    /// Rate or quota limit reached.
    RateLimited,
    /// The credential was rejected.
    AuthenticationFailed,
    /// Any other failure, with its description.
    Failed(String),
}

impl Analysis {
    pub fn is_answer(&self) -> bool {
        matches!(self, Analysis::Answer(_))
    }

    /// The text to display in the result area.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analysis::Answer(text) => f.write_str(text),
            Analysis::MissingCredential => f.write_str(CREDENTIAL_NOT_CONFIGURED),
            Analysis::RateLimited => f.write_str(RATE_LIMIT_MESSAGE),
            Analysis::AuthenticationFailed => f.write_str(AUTH_FAILED_MESSAGE),
            Analysis::Failed(detail) => f.write_str(&generic_failure_message(detail)),
        }
    }
}

impl From<RemoteError> for Analysis {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::RateLimited { .. } => Analysis::RateLimited,
            RemoteError::Authentication { .. } => Analysis::AuthenticationFailed,
            other => Analysis::Failed(other.to_string()),
        }
    }
}

/// Send `instruction` and the contract `text` to the model.
///
/// The prompt is `instruction + DOCUMENT_SEPARATOR + text`, passed through
/// without chunking or truncation. Exactly one request is issued when a
/// credential is present, and none otherwise.
pub async fn dispatch<C: CompletionClient>(
    client: &C,
    credential: Option<&Credential>,
    instruction: &str,
    text: &str,
    config: &AssistantConfig,
) -> Analysis {
    let Some(credential) = credential else {
        warn!("Dispatch refused: no API key configured");
        return Analysis::MissingCredential;
    };

    let prompt = build_prompt(instruction, text);
    let prompt_chars = prompt.chars().count();
    if let Some(ref cb) = config.progress {
        cb.on_dispatch_start(prompt_chars);
    }

    info!(
        "Dispatching analysis: model={}, prompt={} chars",
        config.model, prompt_chars
    );
    let start = Instant::now();
    let request = ChatRequest::single_turn(prompt, config);

    let analysis = match client.complete(credential, &request).await {
        Ok(content) => Analysis::Answer(content.trim().to_string()),
        Err(e) => {
            warn!("Completion request failed: {}", e);
            Analysis::from(e)
        }
    };

    info!(
        "Analysis finished in {}ms (answer: {})",
        start.elapsed().as_millis(),
        analysis.is_answer()
    );
    if let Some(ref cb) = config.progress {
        cb.on_dispatch_complete(analysis.is_answer());
    }
    analysis
}
