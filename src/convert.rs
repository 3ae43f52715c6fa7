//! Conversion entry points.
//!
//! [`convert`] runs the full pipeline and writes a PDF. [`prepare`] stops
//! after image inlining and returns the HTML, which needs no external
//! renderer — useful for tests, previews, and callers that bring their own
//! rendering step. Both have strictly sequential semantics: each stage
//! completes before the next begins.

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use crate::output::{ConversionOutput, ConversionStats, PreparedHtml};
use crate::pipeline::{inline, input, markdown, render};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a Markdown file to a PDF at `output_path`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some images failed to inline
/// (check `output.stats.failed_images`).
///
/// # Errors
/// Returns `Err(Md2PdfError)` only for fatal errors:
/// - Source document missing or unreadable
/// - Renderer executable missing, failing, or timing out
pub async fn convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Resolve and read the source document ─────────────────────
    let source_path = input::resolve_source(input_path)?;
    let markdown_text = input::read_source(&source_path)?;
    let markdown_bytes = markdown_text.len();

    // ── Step 2: Convert Markdown to HTML ─────────────────────────────────
    let html = markdown::to_html(&markdown_text, config.flavor);

    // ── Step 3: Inline images ────────────────────────────────────────────
    let prepared = inline::inline_images(&html, config)?;
    let failed = prepared.failed_count();
    if failed > 0 {
        warn!("{} image(s) could not be inlined", failed);
    }

    // ── Step 4: Render to PDF ────────────────────────────────────────────
    let render_start = Instant::now();
    render::render_pdf(&prepared.html, output_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 5: Assemble stats ───────────────────────────────────────────
    let stats = ConversionStats {
        total_images: prepared.images.len() + prepared.skipped_images,
        inlined_images: prepared.inlined_count(),
        failed_images: failed,
        skipped_images: prepared.skipped_images,
        markdown_bytes,
        html_bytes: prepared.html.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
    };

    info!(
        "Conversion complete: {}/{} images inlined, {}ms total",
        stats.inlined_images, stats.total_images, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        pdf_path: output_path.to_path_buf(),
        html: prepared.html,
        images: prepared.images,
        stats,
    })
}

/// Run the pipeline up to and including image inlining, without rendering.
///
/// Needs no renderer executable, so it works anywhere the source document
/// and its images are readable.
pub async fn prepare(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PreparedHtml, Md2PdfError> {
    let source_path = input::resolve_source(input_path.as_ref())?;
    let markdown_text = input::read_source(&source_path)?;
    prepare_str(&markdown_text, config)
}

/// Like [`prepare`] but for Markdown already held in memory.
///
/// This is the recommended API when the document comes from a database or
/// network stream rather than a file on disk.
pub fn prepare_str(
    markdown_text: &str,
    config: &ConversionConfig,
) -> Result<PreparedHtml, Md2PdfError> {
    let html = markdown::to_html(markdown_text, config.flavor);
    inline::inline_images(&html, config)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2PdfError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_path, output_path, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepare_missing_source_fails() {
        let config = ConversionConfig::default();
        let result = prepare("/no/such/document.md", &config).await;
        assert!(matches!(result, Err(Md2PdfError::SourceNotFound { .. })));
    }

    #[tokio::test]
    async fn prepare_plain_document_matches_raw_conversion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plain.md");
        std::fs::write(&path, "# Title\n\nJust text.\n").expect("write");
        let config = ConversionConfig::default();

        let prepared = prepare(&path, &config).await.expect("prepare");
        let raw = crate::pipeline::markdown::to_html("# Title\n\nJust text.\n", config.flavor);
        assert_eq!(prepared.html, raw);
        assert!(prepared.images.is_empty());
    }

    #[test]
    fn prepare_str_inlines_referenced_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let img_path = dir.path().join("dot.gif");
        std::fs::write(&img_path, b"GIF89a\x01\x00\x01\x00").expect("write image");

        let md = format!("![dot]({})\n", img_path.display());
        let config = ConversionConfig::default();

        let prepared = prepare_str(&md, &config).expect("prepare");
        assert_eq!(prepared.images.len(), 1);
        assert!(prepared.images[0].is_inlined());
        assert!(prepared.html.contains("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn convert_with_bad_renderer_aborts_after_preparation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("doc.md");
        std::fs::write(&src, "# Doc\n").expect("write");
        let out = dir.path().join("out.pdf");
        let config = ConversionConfig::builder()
            .wkhtmltopdf("/definitely/not/a/real/wkhtmltopdf")
            .build()
            .expect("config");

        let result = convert(&src, &out, &config).await;
        assert!(matches!(result, Err(Md2PdfError::RendererNotFound { .. })));
        assert!(!out.exists(), "no PDF must be produced");
    }

    #[test]
    fn convert_sync_surfaces_same_error() {
        let config = ConversionConfig::default();
        let result = convert_sync("/no/such/document.md", "/tmp/out.pdf", &config);
        assert!(matches!(result, Err(Md2PdfError::SourceNotFound { .. })));
    }
}
