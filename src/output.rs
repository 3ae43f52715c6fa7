//! Output types: per-image results, run statistics, and the final artefacts.
//!
//! [`ImageResult`] carries an `error: Option<ImageError>` per image element so
//! callers can see exactly which references were inlined and which were left
//! untouched, instead of grepping the HTML for `data:` prefixes.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one `<img>` element that had a usable `src` attribute.
///
/// Elements with a missing or empty `src`, or an already-inlined `data:` URI,
/// are skipped entirely and counted in [`PreparedHtml::skipped_images`]
/// rather than recorded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// Position of the element among all `img` elements, document order,
    /// 0-indexed.
    pub index: usize,

    /// The original `src` attribute value.
    pub src: String,

    /// Size in bytes of the file that was inlined. 0 when inlining failed.
    pub inlined_bytes: usize,

    /// `Some` when the file could not be read; the element keeps its
    /// original `src` in that case.
    pub error: Option<ImageError>,
}

impl ImageResult {
    /// Whether this image was successfully rewritten to a data URI.
    pub fn is_inlined(&self) -> bool {
        self.error.is_none()
    }
}

/// The HTML document after Markdown conversion and image inlining, before
/// rendering. Returned by [`crate::prepare`] and [`crate::prepare_str`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedHtml {
    /// Final HTML, ready to hand to the renderer.
    pub html: String,

    /// One entry per image element whose `src` was treated as a file path.
    pub images: Vec<ImageResult>,

    /// Image elements skipped without an inlining attempt (no `src`, empty
    /// `src`, or an existing `data:` URI).
    pub skipped_images: usize,
}

impl PreparedHtml {
    /// Number of images successfully inlined.
    pub fn inlined_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_inlined()).count()
    }

    /// Number of images that failed to inline.
    pub fn failed_count(&self) -> usize {
        self.images.iter().filter(|i| !i.is_inlined()).count()
    }
}

/// Statistics about a completed conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total `img` elements found in the document.
    pub total_images: usize,
    /// Images rewritten to data URIs.
    pub inlined_images: usize,
    /// Images left untouched because their file could not be read.
    pub failed_images: usize,
    /// Images skipped without an attempt (no/empty src, `data:` URI).
    pub skipped_images: usize,
    /// Size of the source Markdown in bytes.
    pub markdown_bytes: usize,
    /// Size of the final HTML in bytes (after inlining).
    pub html_bytes: usize,
    /// Wall-clock duration of the whole pipeline in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock duration of the wkhtmltopdf invocation in milliseconds.
    pub render_duration_ms: u64,
}

/// Result of a complete Markdown-to-PDF conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the PDF was written.
    pub pdf_path: PathBuf,

    /// The final HTML that was handed to the renderer.
    pub html: String,

    /// Per-image inlining outcomes, document order.
    pub images: Vec<ImageResult>,

    /// Run statistics.
    pub stats: ConversionStats,
}
