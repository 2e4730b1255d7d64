//! CLI binary for contract-assistant.
//!
//! `serve` starts the single-page web surface; `analyze` runs one interaction
//! from the terminal against a local PDF.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contract_assistant::prompts::{ANALYZING_SPINNER, EXTRACTING_SPINNER, RESULT_HEADER};
use contract_assistant::web::{self, AppState};
use contract_assistant::{
    evaluate, extract_text_async, read_local, Action, AnalysisKind, AnalysisProgress,
    AssistantConfig, Credential, Level, NoopProgress, OpenAiClient, ProgressHandle, SessionInputs,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Spinner driven by progress events ────────────────────────────────────────

/// Busy indicator for the two slow steps. Each step gets a fresh spinner
/// which is cleared as soon as the step finishes so notices and the result
/// print cleanly.
struct SpinnerProgress {
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(None),
        })
    }

    fn start(&self, msg: &'static str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Some(previous) = self.current.lock().unwrap_or_else(|e| e.into_inner()).replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn stop(&self) {
        if let Some(bar) = self.current.lock().unwrap_or_else(|e| e.into_inner()).take() {
            bar.finish_and_clear();
        }
    }
}

impl AnalysisProgress for SpinnerProgress {
    fn on_extraction_start(&self, _bytes: usize) {
        self.start(EXTRACTING_SPINNER);
    }

    fn on_extraction_complete(&self, _page_count: usize, _chars: usize) {
        self.stop();
    }

    fn on_extraction_error(&self, _error: &str) {
        self.stop();
    }

    fn on_dispatch_start(&self, _prompt_chars: usize) {
        self.start(ANALYZING_SPINNER);
    }

    fn on_dispatch_complete(&self, _success: bool) {
        self.stop();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the web page on http://127.0.0.1:8501
  contract-assistant serve

  # Summarise a contract from the terminal
  contract-assistant analyze kontrak.pdf

  # Flag potential risks
  contract-assistant analyze --analysis risks kontrak.pdf

  # Ask your own question
  contract-assistant analyze --analysis question \
      --question "Kapan kontrak ini berakhir?" kontrak.pdf

  # Only print the extracted text (no API key needed)
  contract-assistant analyze --extract-only kontrak.pdf

ANALYSES:
  summary          Ringkasan
  key-points       Poin Penting
  potential-risks  Risiko Potensial   (alias: risks)
  custom-question  Tanyakan Sesuai Kebutuhan   (alias: question)

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY    OpenAI API key used by `analyze`
  OPENAI_BASE_URL   OpenAI-compatible endpoint (default https://api.openai.com/v1)
  CONTRACT_BIND     Address for `serve`
  RUST_LOG          Tracing filter, overrides --verbose/--quiet
"#;

/// Analyse contract PDFs with an OpenAI chat model.
#[derive(Parser, Debug)]
#[command(
    name = "contract-assistant",
    version,
    about = "Analyse contract PDFs with an OpenAI chat model",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OpenAI-compatible API base URL.
    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = contract_assistant::config::DEFAULT_API_BASE)]
    api_base: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CONTRACT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, global = true, env = "CONTRACT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the single-page web interface.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "CONTRACT_BIND", default_value = "127.0.0.1:8501")]
        bind: SocketAddr,
    },

    /// Analyse one PDF from the terminal.
    Analyze {
        /// Contract PDF to analyse.
        file: PathBuf,

        /// summary, key-points, potential-risks or custom-question.
        #[arg(short, long, default_value = "summary")]
        analysis: AnalysisKind,

        /// Your question, for --analysis custom-question.
        #[arg(long, default_value = "")]
        question: String,

        /// OpenAI API key.
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the extracted text and stop.
        #[arg(long)]
        extract_only: bool,

        /// Print the session outcome as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Keep library INFO logs out of the way of the spinner unless asked.
    let interactive = matches!(cli.command, Command::Analyze { .. });
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || interactive {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve { bind } => {
            let config = AssistantConfig::builder()
                .api_base(&cli.api_base)
                .build()
                .context("Invalid configuration")?;
            let state = AppState::new(config).context("Failed to initialise HTTP client")?;
            if !cli.quiet {
                eprintln!("{} {}", cyan("◆"), bold(&format!("Serving on http://{bind}")));
            }
            web::serve(bind, state)
                .await
                .with_context(|| format!("Server on {bind} failed"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze {
            file,
            analysis,
            question,
            api_key,
            extract_only,
            json,
        } => {
            let upload = read_local(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            if extract_only {
                let extracted = extract_text_async(upload.bytes)
                    .await
                    .context("Failed to extract text")?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&extracted)
                            .context("Failed to serialise output")?
                    );
                } else {
                    write_stdout(&extracted.text)?;
                }
                return Ok(ExitCode::SUCCESS);
            }

            let progress: ProgressHandle = if cli.quiet || json {
                Arc::new(NoopProgress)
            } else {
                SpinnerProgress::new()
            };
            let config = AssistantConfig::builder()
                .api_base(&cli.api_base)
                .progress(progress)
                .build()
                .context("Invalid configuration")?;
            let client = OpenAiClient::new(&config).context("Failed to initialise HTTP client")?;

            let inputs = SessionInputs {
                credential: api_key.as_deref().and_then(Credential::new),
                upload: Some(upload),
                carried_text: None,
                analysis,
                question,
                action: Action::Analyze,
            };
            let view = evaluate(&client, &config, inputs).await;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&view).context("Failed to serialise output")?
                );
            } else {
                for notice in &view.notices {
                    if cli.quiet && !matches!(notice.level, Level::Warning | Level::Error) {
                        continue;
                    }
                    let mark = match notice.level {
                        Level::Success => green("✔"),
                        Level::Warning => yellow("⚠"),
                        Level::Error => red("✘"),
                    };
                    eprintln!("{mark} {}", notice.text);
                }
                if let Some(ref result) = view.analysis {
                    if !cli.quiet {
                        eprintln!("\n{}", bold(RESULT_HEADER));
                    }
                    write_stdout(&result.message())?;
                }
            }

            let ok = view.analysis.as_ref().is_some_and(|a| a.is_answer());
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Write `text` to stdout with a trailing newline.
fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}
