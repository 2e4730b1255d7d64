//! Single-page web surface built on axum.
//!
//! The page is one multipart form. Each submission carries every input (API
//! key, optional new upload, previously extracted text, selected analysis,
//! question and which button was pressed), runs [`session::evaluate`] once
//! and re-renders the whole page. Nothing is stored server-side: the
//! extracted text rides along in a hidden field and a new upload replaces it.
//!
//! Routes:
//!
//! | Method | Path      | Purpose                          |
//! |--------|-----------|----------------------------------|
//! | GET    | `/`       | empty page                       |
//! | POST   | `/`       | evaluate the submitted form      |
//! | GET    | `/health` | liveness check, returns `OK`     |

use crate::client::OpenAiClient;
use crate::config::{AssistantConfig, Credential};
use crate::pipeline::input::Upload;
use crate::prompts::{
    AnalysisKind, ANALYSIS_HEADER, ANALYSIS_SELECT_LABEL, ANALYZE_BUTTON, ANALYZING_SPINNER,
    APP_TITLE, CREDENTIAL_HEADER, CREDENTIAL_LABEL, EXTRACTING_SPINNER, QUESTION_LABEL,
    RESULT_HEADER, UPLOAD_LABEL,
};
use crate::session::{self, Action, Level, SessionInputs, SessionView};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Shared by all requests. Both fields are read-only.
#[derive(Clone)]
pub struct AppState {
    pub client: OpenAiClient,
    pub config: Arc<AssistantConfig>,
}

impl AppState {
    pub fn new(config: AssistantConfig) -> Result<Self, crate::AssistantError> {
        Ok(Self {
            client: OpenAiClient::new(&config)?,
            config: Arc::new(config),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(|| async { "OK" }))
        // Uploads are not size-limited.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Contract assistant listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
        })
        .await
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index() -> Html<String> {
    Html(render_page(&PageModel::default()))
}

async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, FormError> {
    let form = FormFields::read(multipart).await?;
    let page = PageModel {
        api_key: form.api_key.clone(),
        analysis: form.analysis,
        question: form.question.clone(),
        view: session::evaluate(&state.client, &state.config, form.into_inputs()).await,
    };
    Ok(Html(render_page(&page)))
}

/// A submission that could not be read as the expected form.
#[derive(Debug)]
pub struct FormError(String);

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0).into_response()
    }
}

#[derive(Debug, Default)]
struct FormFields {
    api_key: String,
    upload: Option<Upload>,
    document_text: Option<String>,
    analysis: AnalysisKind,
    question: String,
    action: Action,
}

impl FormFields {
    async fn read(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut form = FormFields::default();
        let bad = |e: axum::extract::multipart::MultipartError| {
            warn!("Rejected form submission: {}", e);
            FormError(format!("Invalid form submission: {e}"))
        };

        while let Some(field) = multipart.next_field().await.map_err(bad)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            if name == "document" {
                let filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(bad)?;
                // Browsers send an empty part when no file is chosen.
                if !bytes.is_empty() {
                    form.upload = Some(Upload::new(filename, bytes.to_vec()));
                }
                continue;
            }

            let value = field.text().await.map_err(bad)?;
            match name.as_str() {
                "api_key" => form.api_key = value,
                "document_text" if !value.is_empty() => {
                    form.document_text = Some(normalize_newlines(value))
                }
                "analysis" => form.analysis = value.parse().unwrap_or_default(),
                "question" => form.question = normalize_newlines(value),
                "action" if value == "analyze" => form.action = Action::Analyze,
                _ => {}
            }
        }
        Ok(form)
    }

    fn into_inputs(self) -> SessionInputs {
        SessionInputs {
            credential: Credential::new(&self.api_key),
            upload: self.upload,
            carried_text: self.document_text,
            analysis: self.analysis,
            question: self.question,
            action: self.action,
        }
    }
}

/// Browsers submit textarea line breaks as CRLF; restore the `\n` the page
/// was rendered with.
fn normalize_newlines(value: String) -> String {
    if value.contains('\r') {
        value.replace("\r\n", "\n")
    } else {
        value
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PageModel {
    api_key: String,
    analysis: AnalysisKind,
    question: String,
    view: SessionView,
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; color: #262730; }
aside { width: 18rem; background: #f0f2f6; padding: 1.5rem; }
main { flex: 1; padding: 2rem 3rem; max-width: 52rem; }
label { display: block; margin: 1rem 0 .3rem; font-size: .9rem; }
input[type=password], select, textarea { width: 100%; box-sizing: border-box; padding: .4rem; }
textarea { min-height: 6rem; }
button { margin-top: 1rem; padding: .4rem 1.2rem; }
.notice { padding: .6rem 1rem; border-radius: .4rem; margin: .6rem 0; }
.success { background: #dff5e3; }
.warning { background: #fff6d6; } .error { background: #ffe0e0; }
.result { white-space: pre-wrap; }
#spinner { font-style: italic; }
body.busy { cursor: progress; } body.busy button, body.busy input, body.busy select { pointer-events: none; opacity: .6; }
"#;

const SCRIPT: &str = r#"
function busy(e) {
  var s = document.getElementById('spinner');
  var analyzing = e.submitter && e.submitter.value === 'analyze';
  s.textContent = analyzing ? s.dataset.analyzing : s.dataset.extracting;
  s.hidden = false;
  document.body.classList.add('busy');
}
function toggleQuestion(sel) {
  var q = document.getElementById('question-box');
  if (q) { q.hidden = sel.value !== 'custom-question'; }
}
"#;

fn render_page(page: &PageModel) -> String {
    let view = &page.view;
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"id\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLE}</style><script>{SCRIPT}</script></head><body>\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\" onsubmit=\"busy(event)\" style=\"display:contents\">",
        title = encode_text(APP_TITLE),
    );

    // Sidebar: credential.
    let _ = write!(
        html,
        "<aside><h3>{header}</h3><label for=\"api_key\">{label}</label>\
         <input type=\"password\" id=\"api_key\" name=\"api_key\" value=\"{key}\" autocomplete=\"off\"></aside>",
        header = encode_text(CREDENTIAL_HEADER),
        label = encode_text(CREDENTIAL_LABEL),
        key = encode_double_quoted_attribute(&page.api_key),
    );

    let _ = write!(html, "<main><h1>{}</h1>", encode_text(APP_TITLE));

    // Upload control.
    let _ = write!(
        html,
        "<label for=\"document\">{label}</label>\
         <input type=\"file\" id=\"document\" name=\"document\" accept=\".pdf,application/pdf\" \
         onchange=\"this.form.requestSubmit(document.getElementById('upload-btn'))\">\
         <button type=\"submit\" id=\"upload-btn\" name=\"action\" value=\"extract\">Unggah</button>",
        label = encode_text(UPLOAD_LABEL),
    );

    let _ = write!(
        html,
        "<p id=\"spinner\" hidden data-extracting=\"{}\" data-analyzing=\"{}\"></p>",
        encode_double_quoted_attribute(EXTRACTING_SPINNER),
        encode_double_quoted_attribute(ANALYZING_SPINNER),
    );

    for notice in &view.notices {
        let class = match notice.level {
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        let _ = write!(
            html,
            "<div class=\"notice {class}\">{}</div>",
            encode_text(&notice.text)
        );
    }

    if view.show_analysis {
        if let Some(ref text) = view.document_text {
            // Parsers drop one newline right after <textarea>.
            let _ = write!(
                html,
                "<textarea name=\"document_text\" hidden>\n{}</textarea>",
                encode_text(text)
            );
        }

        let _ = write!(
            html,
            "<h2>{header}</h2><label for=\"analysis\">{label}</label>\
             <select id=\"analysis\" name=\"analysis\" onchange=\"toggleQuestion(this)\">",
            header = encode_text(ANALYSIS_HEADER),
            label = encode_text(ANALYSIS_SELECT_LABEL),
        );
        for kind in AnalysisKind::ALL {
            let selected = if kind == page.analysis { " selected" } else { "" };
            let _ = write!(
                html,
                "<option value=\"{}\"{selected}>{}</option>",
                kind.id(),
                encode_text(kind.label())
            );
        }
        html.push_str("</select>");

        let hidden = if page.analysis.needs_question() { "" } else { " hidden" };
        let _ = write!(
            html,
            "<div id=\"question-box\"{hidden}><label for=\"question\">{label}</label>\
             <textarea id=\"question\" name=\"question\">\n{question}</textarea></div>\
             <button type=\"submit\" name=\"action\" value=\"analyze\">{button}</button>",
            label = encode_text(QUESTION_LABEL),
            question = encode_text(&page.question),
            button = encode_text(ANALYZE_BUTTON),
        );
    }

    if let Some(ref analysis) = view.analysis {
        let _ = write!(
            html,
            "<h3>{}</h3><div class=\"result\">{}</div>",
            encode_text(RESULT_HEADER),
            encode_text(&analysis.message())
        );
    }

    html.push_str("</main></form></body></html>\n");
    html
}
