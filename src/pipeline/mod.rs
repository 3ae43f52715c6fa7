//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the rendering engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ markdown ──▶ inline ──▶ render
//! (path)    (cmark)      (base64)   (wkhtmltopdf)
//! ```
//!
//! 1. [`input`]    — validate the source path and read the document text
//! 2. [`markdown`] — convert Markdown to an HTML string (pulldown-cmark)
//! 3. [`inline`]   — rewrite each `img` src to a base64 data URI; the only
//!    stage with per-item error tolerance
//! 4. [`render`]   — pipe the final HTML to the external wkhtmltopdf process
//!    and wait for the PDF to be written

pub mod inline;
pub mod input;
pub mod markdown;
pub mod render;
