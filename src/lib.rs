//! # contract-assistant
//!
//! Upload a contract PDF, extract its text and ask an OpenAI chat model to
//! summarise it, list its key points, flag potential risks or answer a
//! question about it.
//!
//! ## Flow
//!
//! ```text
//! API key ─┐
//!          ├─ 1. Input    hold the upload in memory, check %PDF
//! PDF ─────┤
//!          ├─ 2. Extract  concatenate per-page text (lopdf, spawn_blocking)
//!          ├─ 3. Prompt   instruction + separator + full text
//!          ├─ 4. Dispatch one chat-completions call, no retry
//!          └─ 5. Render   answer, or a fixed message per failure class
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contract_assistant::{
//!     dispatch, extract_text, AnalysisKind, AssistantConfig, Credential, OpenAiClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AssistantConfig::default();
//!     let client = OpenAiClient::new(&config)?;
//!     let key = Credential::new(std::env::var("OPENAI_API_KEY")?);
//!
//!     let extracted = extract_text(&std::fs::read("kontrak.pdf")?)?;
//!     let analysis = dispatch(
//!         &client,
//!         key.as_ref(),
//!         AnalysisKind::Summary.template(),
//!         &extracted.text,
//!         &config,
//!     )
//!     .await;
//!     println!("{analysis}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `web`   | via `cli` | axum single-page surface ([`web`]) |
//! | `cli`   | on      | `contract-assistant` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
#[cfg(feature = "web")]
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{dispatch, Analysis};
pub use client::{ChatMessage, ChatRequest, CompletionClient, OpenAiClient};
pub use config::{AssistantConfig, AssistantConfigBuilder, Credential};
pub use error::{AssistantError, RemoteError};
pub use pipeline::extract::{extract_text, extract_text_async, ExtractedText};
pub use pipeline::input::{read_local, Upload};
pub use progress::{AnalysisProgress, NoopProgress, ProgressHandle};
pub use prompts::{build_prompt, AnalysisKind, DOCUMENT_SEPARATOR};
pub use session::{evaluate, Action, Level, Notice, SessionInputs, SessionView};
