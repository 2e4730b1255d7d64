//! Error types for the contract-assistant library.
//!
//! Two error types reflect two failure scopes:
//!
//! * [`AssistantError`]: the current upload or configuration cannot be used
//!   at all (not a PDF, corrupt file, bad config). Returned as `Err` from the
//!   extraction functions and from [`crate::config::AssistantConfigBuilder::build`].
//!
//! * [`RemoteError`]: a single call to the completion endpoint failed.
//!   [`crate::analyze::dispatch`] never propagates it; it classifies the error
//!   into an [`crate::analyze::Analysis`] variant whose message is shown to
//!   the user in place of an answer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop processing of the current upload.
#[derive(Debug, Error)]
pub enum AssistantError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The upload contained no bytes.
    #[error("The uploaded file is empty")]
    EmptyUpload,

    /// The bytes do not start with the `%PDF` signature.
    #[error("File is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document header, xref table or object graph could not be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// The document is encrypted; passwords are not supported.
    #[error("PDF is encrypted and cannot be read without a password")]
    PasswordRequired,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of one remote completion call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// HTTP 429: request rate or account quota exhausted.
    #[error("Rate limit or quota exceeded: {message}")]
    RateLimited { message: String },

    /// HTTP 401: the credential was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Any other non-success HTTP status.
    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("Connection error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// The response contained no choice with text content.
    #[error("The API response contained no completion choices")]
    EmptyResponse,
}
