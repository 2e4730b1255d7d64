//! Configuration types for contract analysis.
//!
//! [`AssistantConfig`] holds the completion parameters and the endpoint. The
//! model, temperature and output cap are fixed for end users: the CLI and the
//! web page never expose them. Library callers and tests can still override
//! them through [`AssistantConfigBuilder`].
//!
//! [`Credential`] wraps the API key so it cannot leak through `Debug` output
//! or tracing fields.

use crate::error::AssistantError;
use crate::progress::ProgressHandle;
use std::fmt;

/// Default OpenAI REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for one analysis dispatch.
///
/// # Example
/// ```rust
/// use contract_assistant::AssistantConfig;
///
/// let config = AssistantConfig::builder()
///     .api_base("http://localhost:8080/v1")
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gpt-3.5-turbo");
/// ```
#[derive(Clone)]
pub struct AssistantConfig {
    /// Chat model identifier. Default: `gpt-3.5-turbo`.
    pub model: String,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1000.
    pub max_tokens: u32,

    /// Base URL of an OpenAI-compatible REST API, without trailing slash.
    pub api_base: String,

    /// Receives extraction and dispatch events.
    pub progress: Option<ProgressHandle>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            api_base: DEFAULT_API_BASE.to_string(),
            progress: None,
        }
    }
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn AnalysisProgress>"))
            .finish()
    }
}

impl AssistantConfig {
    /// Create a new builder for `AssistantConfig`.
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Builder for [`AssistantConfig`].
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into();
        self
    }

    pub fn progress(mut self, progress: ProgressHandle) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AssistantConfig, AssistantError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AssistantError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(AssistantError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if !(c.api_base.starts_with("http://") || c.api_base.starts_with("https://")) {
            return Err(AssistantError::InvalidConfig(format!(
                "api_base must be an http(s) URL, got '{}'",
                c.api_base
            )));
        }
        Ok(self.config)
    }
}

// ── Credential ───────────────────────────────────────────────────────────

/// An API key entered by the user for the current session.
///
/// Only constructible from a non-blank string, so holding a `Credential`
/// means a remote call may be attempted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap `key`, returning `None` when it is empty or whitespace only.
    /// Surrounding whitespace from copy-paste is stripped.
    ///
    /// Stricter than a plain emptiness check: a key of only spaces counts as
    /// missing and is never sent.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The raw secret, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
