//! Error types for the md2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2PdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing source document, renderer not found, rendering failed).
//!   Returned as `Err(Md2PdfError)` from the top-level `convert*` and
//!   `prepare*` functions.
//!
//! * [`ImageError`] — **Non-fatal**: a single image could not be inlined
//!   (file missing, unreadable) but the rest of the document is fine. Stored
//!   inside [`crate::output::ImageResult`] so callers can inspect partial
//!   success; the image element keeps its original `src` and the run
//!   continues to rendering.
//!
//! The separation matches the pipeline's two-tier failure policy: image
//! inlining is the only fault-tolerant step, everything else aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2pdf library.
///
/// Per-image failures use [`ImageError`] and are stored in
/// [`crate::output::ImageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// Source Markdown document was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the source document.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    SourcePermissionDenied { path: PathBuf },

    /// The source document exists but reading it failed.
    #[error("Failed to read Markdown file '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Renderer errors ───────────────────────────────────────────────────
    /// The configured wkhtmltopdf executable does not exist or could not
    /// be spawned.
    #[error(
        "Renderer executable not found: '{path}'\n\
         Install wkhtmltopdf or point --wkhtmltopdf (or MD2PDF_WKHTMLTOPDF) at it."
    )]
    RendererNotFound { path: PathBuf },

    /// The renderer process could not be started for a reason other than
    /// a missing executable.
    #[error("Failed to spawn renderer '{path}': {source}")]
    RendererSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but exited with a non-zero status.
    ///
    /// A partially written output file may remain on disk; no cleanup is
    /// attempted.
    #[error("Rendering failed (exit code {code:?})\n{stderr}")]
    RenderFailed { code: Option<i32>, stderr: String },

    /// The renderer did not finish within the configured timeout.
    #[error("Rendering timed out after {secs}s\nIncrease --render-timeout for large documents.")]
    RenderTimeout { secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image element.
///
/// Stored in [`crate::output::ImageResult`] when inlining an image fails.
/// The element keeps its original `src` attribute and the conversion
/// continues with the remaining images.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// The referenced file could not be opened or read.
    #[error("image '{src}': {detail}")]
    ReadFailed { src: String, detail: String },
}

impl ImageError {
    /// The `src` attribute value of the offending image element.
    pub fn src(&self) -> &str {
        match self {
            ImageError::ReadFailed { src, .. } => src,
        }
    }

    /// Human-readable failure detail (the underlying I/O error text).
    pub fn detail(&self) -> &str {
        match self {
            ImageError::ReadFailed { detail, .. } => detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_not_found_display() {
        let e = Md2PdfError::SourceNotFound {
            path: PathBuf::from("README.md"),
        };
        let msg = e.to_string();
        assert!(msg.contains("README.md"), "got: {msg}");
    }

    #[test]
    fn render_failed_display() {
        let e = Md2PdfError::RenderFailed {
            code: Some(1),
            stderr: "Error: network error".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Some(1)"));
        assert!(msg.contains("network error"));
    }

    #[test]
    fn render_timeout_display() {
        let e = Md2PdfError::RenderTimeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn image_error_display_and_accessors() {
        let e = ImageError::ReadFailed {
            src: "diagrams/arch.png".into(),
            detail: "No such file or directory (os error 2)".into(),
        };
        assert!(e.to_string().contains("diagrams/arch.png"));
        assert_eq!(e.src(), "diagrams/arch.png");
        assert!(e.detail().contains("os error 2"));
    }
}
