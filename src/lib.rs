//! # md2pdf
//!
//! Convert Markdown documents to PDF via wkhtmltopdf, inlining referenced
//! images as base64 data URIs so the output is fully self-contained.
//!
//! ## Why this crate?
//!
//! wkhtmltopdf resolves `<img>` references at render time, which breaks as
//! soon as the HTML is piped over stdin (relative paths have no base) or
//! local file access is disabled. Inlining every image as a `data:` URI
//! before rendering removes the renderer's filesystem and network access
//! from the equation entirely: what you hand it is what you get.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Input    read the source document (lossy UTF-8)
//!  ├─ 2. Convert  Markdown → HTML via pulldown-cmark
//!  ├─ 3. Inline   rewrite img src attributes to base64 data URIs
//!  └─ 4. Render   pipe HTML to wkhtmltopdf, PDF written to disk
//! ```
//!
//! Stages run strictly in sequence. Image inlining is the only
//! fault-tolerant stage: a file that cannot be read is logged and skipped,
//! everything else aborts the run with a typed [`Md2PdfError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("README.md", "output.pdf", &config).await?;
//!     eprintln!(
//!         "{} of {} images inlined, wrote {}",
//!         output.stats.inlined_images,
//!         output.stats.total_images,
//!         output.pdf_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, MarkdownFlavor, DEFAULT_WKHTMLTOPDF};
pub use convert::{convert, convert_sync, prepare, prepare_str};
pub use error::{ImageError, Md2PdfError};
pub use output::{ConversionOutput, ConversionStats, ImageResult, PreparedHtml};
