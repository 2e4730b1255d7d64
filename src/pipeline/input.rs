//! Input resolution: turn an uploaded file or a local path into [`Upload`].
//!
//! Both surfaces end up with the same in-memory value. The web surface builds
//! it from a multipart part; the CLI reads a path from disk. The `%PDF` magic
//! check happens here so callers get a clear "not a PDF" error before the
//! parser ever sees the bytes.

use crate::error::AssistantError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDF files start with this signature.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// An uploaded document held in memory for one interaction.
#[derive(Clone)]
pub struct Upload {
    /// Original file name as reported by the client, if any.
    pub filename: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(filename: Option<String>, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// Name to show in logs and notices.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("upload.pdf")
    }
}

/// Check that `bytes` look like a PDF.
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), AssistantError> {
    if bytes.is_empty() {
        return Err(AssistantError::EmptyUpload);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        let magic = bytes.iter().take(PDF_MAGIC.len()).copied().collect();
        return Err(AssistantError::NotAPdf { magic });
    }
    Ok(())
}

/// Read a local file into an [`Upload`].
pub async fn read_local(path: impl AsRef<Path>) -> Result<Upload, AssistantError> {
    let path: PathBuf = path.as_ref().to_path_buf();

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AssistantError::FileNotFound { path: path.clone() },
        std::io::ErrorKind::PermissionDenied => {
            AssistantError::PermissionDenied { path: path.clone() }
        }
        _ => AssistantError::Internal(format!("Failed to read '{}': {}", path.display(), e)),
    })?;

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(Upload::new(filename, bytes))
}
