//! One top-to-bottom evaluation of the interaction flow.
//!
//! Every user action (upload, selection change, pressing *Analisis*) re-runs
//! [`evaluate`] with the full set of current inputs. The function decides
//! which steps run and collects what the surface should show; it holds no
//! state between calls. Both the web page and the CLI render a
//! [`SessionView`].
//!
//! ## Order of gates
//!
//! ```text
//! credential? ──no──▶ warning, stop
//!     │
//! new upload? ──yes─▶ extract ──err──▶ error, stop
//!     │                  │
//!     no                 ok ──▶ replaces carried text
//!     │
//! carried text? ──no──▶ stop (wait for upload)
//!     │
//! blank text? ──yes──▶ notice, stop
//!     │
//! action = analyze? ──no──▶ show analysis controls, stop
//!     │
//! question required but blank? ──yes──▶ warning, stop
//!     │
//! dispatch ──▶ result
//! ```

use crate::analyze::{dispatch, Analysis};
use crate::client::CompletionClient;
use crate::config::{AssistantConfig, Credential};
use crate::pipeline::extract::extract_text_async;
use crate::pipeline::input::Upload;
use crate::prompts::{
    extraction_failure_message, AnalysisKind, CREDENTIAL_MISSING_WARNING, EXTRACTION_SUCCESS,
    NO_TEXT_WARNING, QUESTION_MISSING_WARNING,
};
use serde::Serialize;
use tracing::{debug, info};

/// What triggered this evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Page load, upload or selection change.
    #[default]
    Refresh,
    /// The *Analisis* button was pressed.
    Analyze,
}

/// Everything the user has entered so far.
#[derive(Debug, Default)]
pub struct SessionInputs {
    pub credential: Option<Credential>,
    /// A file submitted with this action. Replaces `carried_text`.
    pub upload: Option<Upload>,
    /// Text extracted by an earlier action and carried by the surface.
    pub carried_text: Option<String>,
    pub analysis: AnalysisKind,
    pub question: String,
    pub action: Action,
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A one-line message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// What the surface should show after one evaluation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionView {
    pub notices: Vec<Notice>,
    /// Extracted text to carry into the next evaluation.
    pub document_text: Option<String>,
    /// Whether the analysis selection and action button are offered.
    pub show_analysis: bool,
    pub analysis: Option<Analysis>,
}

impl SessionView {
    fn notice(&mut self, level: Level, text: impl Into<String>) {
        self.notices.push(Notice::new(level, text));
    }

    /// `true` if any notice has the given level.
    pub fn has(&self, level: Level) -> bool {
        self.notices.iter().any(|n| n.level == level)
    }
}

/// Run the interaction flow once.
pub async fn evaluate<C: CompletionClient>(
    client: &C,
    config: &AssistantConfig,
    inputs: SessionInputs,
) -> SessionView {
    let mut view = SessionView::default();

    let Some(credential) = inputs.credential else {
        debug!("No API key; waiting for credential");
        view.notice(Level::Warning, CREDENTIAL_MISSING_WARNING);
        return view;
    };

    let text = match inputs.upload {
        Some(upload) => {
            info!(
                "Extracting '{}' ({} bytes)",
                upload.display_name(),
                upload.bytes.len()
            );
            if let Some(ref cb) = config.progress {
                cb.on_extraction_start(upload.bytes.len());
            }
            match extract_text_async(upload.bytes).await {
                Ok(extracted) => {
                    if let Some(ref cb) = config.progress {
                        cb.on_extraction_complete(extracted.page_count, extracted.text.len());
                    }
                    extracted.text
                }
                Err(e) => {
                    if let Some(ref cb) = config.progress {
                        cb.on_extraction_error(&e.to_string());
                    }
                    view.notice(Level::Error, extraction_failure_message(&e.to_string()));
                    return view;
                }
            }
        }
        None => match inputs.carried_text {
            Some(text) => text,
            None => return view,
        },
    };

    // Whitespace-only text (a scan with stray layout spaces) counts as no
    // text, not just the empty string.
    if text.trim().is_empty() {
        view.notice(Level::Warning, NO_TEXT_WARNING);
        return view;
    }

    view.notice(Level::Success, EXTRACTION_SUCCESS);
    view.show_analysis = true;

    if inputs.action == Action::Analyze {
        match inputs.analysis.instruction(&inputs.question) {
            Some(instruction) => {
                let analysis =
                    dispatch(client, Some(&credential), &instruction, &text, config).await;
                view.analysis = Some(analysis);
            }
            None => view.notice(Level::Warning, QUESTION_MISSING_WARNING),
        }
    }

    view.document_text = Some(text);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatRequest;
    use crate::error::RemoteError;
    use crate::prompts::{build_prompt, AnalysisKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionClient for CountingClient {
        async fn complete(
            &self,
            _credential: &Credential,
            request: &ChatRequest,
        ) -> Result<String, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo:{}", request.messages[0].content))
        }
    }

    fn inputs(text: &str, analysis: AnalysisKind, question: &str, action: Action) -> SessionInputs {
        SessionInputs {
            credential: Credential::new("sk-test"),
            upload: None,
            carried_text: Some(text.to_string()),
            analysis,
            question: question.to_string(),
            action,
        }
    }

    #[tokio::test]
    async fn missing_credential_stops_before_extraction() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            SessionInputs {
                upload: Some(Upload::new(None, b"not a pdf".to_vec())),
                action: Action::Analyze,
                ..Default::default()
            },
        )
        .await;

        assert_eq!(client.calls(), 0);
        assert_eq!(
            view.notices,
            vec![Notice::new(Level::Warning, CREDENTIAL_MISSING_WARNING)]
        );
        assert!(!view.show_analysis);
    }

    #[tokio::test]
    async fn invalid_upload_reports_error_and_never_dispatches() {
        let client = CountingClient::new();
        let mut input = inputs("old text", AnalysisKind::Summary, "", Action::Analyze);
        input.upload = Some(Upload::new(Some("a.docx".into()), b"PK\x03\x04".to_vec()));

        let view = evaluate(&client, &AssistantConfig::default(), input).await;

        assert_eq!(client.calls(), 0);
        assert!(view.has(Level::Error));
        assert!(view.notices[0]
            .text
            .starts_with("Terjadi kesalahan saat membaca file PDF:"));
        assert!(view.document_text.is_none());
        assert!(view.analysis.is_none());
    }

    #[tokio::test]
    async fn refresh_shows_controls_without_dispatch() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            inputs("Pasal 1", AnalysisKind::Summary, "", Action::Refresh),
        )
        .await;

        assert_eq!(client.calls(), 0);
        assert!(view.show_analysis);
        assert!(view.has(Level::Success));
        assert_eq!(view.document_text.as_deref(), Some("Pasal 1"));
    }

    #[tokio::test]
    async fn analyze_dispatches_template_plus_text() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            inputs("Pasal 1", AnalysisKind::PotentialRisks, "", Action::Analyze),
        )
        .await;

        assert_eq!(client.calls(), 1);
        let expected = build_prompt(AnalysisKind::PotentialRisks.template(), "Pasal 1");
        assert_eq!(
            view.analysis,
            Some(Analysis::Answer(format!("echo:{expected}")))
        );
    }

    #[tokio::test]
    async fn blank_question_warns_without_dispatch() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            inputs("Pasal 1", AnalysisKind::CustomQuestion, "  ", Action::Analyze),
        )
        .await;

        assert_eq!(client.calls(), 0);
        assert!(view
            .notices
            .contains(&Notice::new(Level::Warning, QUESTION_MISSING_WARNING)));
        assert!(view.analysis.is_none());
        assert!(view.show_analysis);
    }

    #[tokio::test]
    async fn custom_question_is_sent_as_instruction() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            inputs(
                "Pasal 1",
                AnalysisKind::CustomQuestion,
                "Kapan kontrak berakhir?",
                Action::Analyze,
            ),
        )
        .await;

        assert_eq!(client.calls(), 1);
        let expected = build_prompt("Kapan kontrak berakhir?", "Pasal 1");
        assert_eq!(
            view.analysis.map(|a| a.message()),
            Some(format!("echo:{expected}"))
        );
    }

    #[tokio::test]
    async fn blank_text_hides_analysis() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            inputs(" \n", AnalysisKind::Summary, "", Action::Analyze),
        )
        .await;

        assert_eq!(client.calls(), 0);
        assert!(!view.show_analysis);
        assert!(view.has(Level::Warning));
    }

    #[tokio::test]
    async fn nothing_uploaded_yet() {
        let client = CountingClient::new();
        let view = evaluate(
            &client,
            &AssistantConfig::default(),
            SessionInputs {
                credential: Credential::new("sk-test"),
                action: Action::Analyze,
                ..Default::default()
            },
        )
        .await;

        assert_eq!(client.calls(), 0);
        assert!(view.notices.is_empty());
        assert!(!view.show_analysis);
    }
}
