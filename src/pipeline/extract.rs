//! Text extraction: walk a PDF's pages and concatenate their text layers.
//!
//! ## Why spawn_blocking?
//!
//! Parsing and content-stream decoding are CPU-bound and can take seconds on
//! large contracts. [`extract_text_async`] moves the work onto Tokio's blocking
//! pool so the web server's worker threads keep serving other requests.
//!
//! ## Pages without text
//!
//! Scanned pages carry only an image and yield no text. They contribute an
//! empty string rather than failing the whole document; only a file that
//! cannot be opened or parsed at all is an error.
//!
//! ## Encrypted documents
//!
//! Documents encrypted only to restrict editing or printing are decrypted
//! with the empty user password and read normally. Anything that needs a real
//! password is rejected.

use crate::error::AssistantError;
use crate::pipeline::input::check_pdf_magic;
use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Text extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    /// Page texts concatenated in page order.
    pub text: String,
    /// Number of pages in the document.
    pub page_count: usize,
    /// 1-indexed page numbers that contributed no text.
    pub empty_pages: Vec<u32>,
}

impl ExtractedText {
    /// `true` when no page yielded any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extract the text layer of every page, in page order.
///
/// # Errors
/// - [`AssistantError::EmptyUpload`] / [`AssistantError::NotAPdf`] when the
///   bytes are not a PDF
/// - [`AssistantError::CorruptPdf`] when the document cannot be parsed
/// - [`AssistantError::PasswordRequired`] for encrypted documents that do not
///   open with an empty user password
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, AssistantError> {
    check_pdf_magic(bytes)?;

    let mut document = Document::load_mem(bytes).map_err(|e| AssistantError::CorruptPdf {
        detail: e.to_string(),
    })?;

    // Permission-only encryption opens with the empty user password.
    if document.is_encrypted() {
        document.decrypt("").map_err(|e| {
            debug!("Empty-password decryption failed: {}", e);
            AssistantError::PasswordRequired
        })?;
        debug!("Decrypted with the empty user password");
    }

    let pages = document.get_pages();
    let page_count = pages.len();
    debug!("PDF loaded: {} pages", page_count);

    let mut text = String::new();
    let mut empty_pages = Vec::new();

    // BTreeMap iteration is ascending page number.
    for &page_num in pages.keys() {
        match document.extract_text(&[page_num]) {
            Ok(page_text) => {
                if page_text.trim().is_empty() {
                    empty_pages.push(page_num);
                }
                text.push_str(&page_text);
            }
            Err(e) => {
                warn!("Page {}: no extractable text ({})", page_num, e);
                empty_pages.push(page_num);
            }
        }
    }

    info!(
        "Extracted {} chars from {} pages ({} without text)",
        text.chars().count(),
        page_count,
        empty_pages.len()
    );

    Ok(ExtractedText {
        text,
        page_count,
        empty_pages,
    })
}

/// Run [`extract_text`] on Tokio's blocking pool.
pub async fn extract_text_async(bytes: Vec<u8>) -> Result<ExtractedText, AssistantError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AssistantError::Internal(format!("Extraction task panicked: {}", e)))?
}
