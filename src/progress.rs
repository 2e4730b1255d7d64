//! Progress-callback trait for extraction and dispatch events.
//!
//! Inject an [`Arc<dyn AnalysisProgress>`] via
//! [`crate::config::AssistantConfigBuilder::progress`] to be told when the
//! slow steps of an interaction begin and end. The CLI uses it to drive its
//! busy spinner; the web surface relies on the browser's own indicator and
//! does not install one.
//!
//! # Example
//!
//! ```rust
//! use contract_assistant::{AnalysisProgress, AssistantConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingProgress {
//!     dispatches: AtomicUsize,
//! }
//!
//! impl AnalysisProgress for CountingProgress {
//!     fn on_dispatch_start(&self, _prompt_chars: usize) {
//!         self.dispatches.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = AssistantConfig::builder()
//!     .progress(Arc::new(CountingProgress { dispatches: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called as an interaction moves through extraction and dispatch.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// web surface evaluates interactions on the Tokio worker pool.
pub trait AnalysisProgress: Send + Sync {
    /// Called before a PDF upload is parsed.
    ///
    /// # Arguments
    /// * `bytes`: size of the upload
    fn on_extraction_start(&self, bytes: usize) {
        let _ = bytes;
    }

    /// Called when text extraction succeeds.
    ///
    /// # Arguments
    /// * `page_count`: pages in the document
    /// * `chars`: characters of extracted text
    fn on_extraction_complete(&self, page_count: usize, chars: usize) {
        let _ = (page_count, chars);
    }

    /// Called when text extraction fails.
    fn on_extraction_error(&self, error: &str) {
        let _ = error;
    }

    /// Called just before the completion request is sent.
    ///
    /// # Arguments
    /// * `prompt_chars`: characters in the combined prompt
    fn on_dispatch_start(&self, prompt_chars: usize) {
        let _ = prompt_chars;
    }

    /// Called when the dispatcher has a result, successful or not.
    ///
    /// # Arguments
    /// * `success`: `true` when the model returned an answer
    fn on_dispatch_complete(&self, success: bool) {
        let _ = success;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl AnalysisProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::AssistantConfig`].
pub type ProgressHandle = Arc<dyn AnalysisProgress>;
