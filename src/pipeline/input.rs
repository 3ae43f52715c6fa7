//! Input resolution: validate the source document path and read its text.
//!
//! Validation happens up front so a missing document produces a typed
//! [`Md2PdfError::SourceNotFound`] before any work is done, rather than a
//! bare I/O error halfway through the pipeline.
//!
//! The file is decoded with `from_utf8_lossy`: Markdown sources in the wild
//! carry no encoding declaration, and replacing the odd invalid byte with
//! U+FFFD beats refusing an otherwise convertible document.

use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a source document path, validating existence and readability.
pub fn resolve_source(path_str: impl AsRef<Path>) -> Result<PathBuf, Md2PdfError> {
    let path = path_str.as_ref().to_path_buf();

    if !path.exists() {
        return Err(Md2PdfError::SourceNotFound { path });
    }

    // Check read permission by attempting to open.
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Md2PdfError::SourcePermissionDenied { path });
        }
        Err(_) => {
            return Err(Md2PdfError::SourceNotFound { path });
        }
    }

    debug!("Resolved source document: {}", path.display());
    Ok(path)
}

/// Read the source document as text.
pub fn read_source(path: &Path) -> Result<String, Md2PdfError> {
    let bytes = std::fs::read(path).map_err(|e| Md2PdfError::SourceRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
