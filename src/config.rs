//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The original tool hardcoded the
//! renderer location and output path as literal constants; keeping every knob
//! in one struct instead makes the pipeline scriptable and lets two runs be
//! diffed by diffing their configs.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::Md2PdfError;
use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the wkhtmltopdf executable.
///
/// Matches the conventional install location on Linux/macOS. Override with
/// [`ConversionConfigBuilder::wkhtmltopdf`] or the `MD2PDF_WKHTMLTOPDF`
/// environment variable in the CLI.
pub const DEFAULT_WKHTMLTOPDF: &str = "/usr/local/bin/wkhtmltopdf";

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .wkhtmltopdf("/usr/bin/wkhtmltopdf")
///     .render_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Path to the wkhtmltopdf executable. Default: [`DEFAULT_WKHTMLTOPDF`].
    ///
    /// A bare command name (no path separator) is resolved through `PATH` by
    /// the OS at spawn time; an absolute path is used as-is.
    pub wkhtmltopdf: PathBuf,

    /// Extra arguments passed to the renderer before the input/output pair.
    /// Default: `["--quiet"]`.
    ///
    /// wkhtmltopdf prints page-loading progress to stderr by default;
    /// `--quiet` suppresses it so stderr carries only real errors. Use this
    /// field for page-setup flags like `--page-size A4` or `--margin-top`.
    pub renderer_args: Vec<String>,

    /// Maximum wall-clock seconds the renderer may run. Default: 120.
    ///
    /// wkhtmltopdf can hang indefinitely on malformed HTML or when a
    /// non-inlined resource reference triggers a network fetch. After the
    /// timeout the child process is killed and the run fails with
    /// [`Md2PdfError::RenderTimeout`].
    pub render_timeout_secs: u64,

    /// Markdown dialect used for the HTML conversion. Default: [`MarkdownFlavor::Gfm`].
    pub flavor: MarkdownFlavor,

    /// Directory against which relative image paths are resolved.
    ///
    /// `None` (the default) leaves relative paths untouched so they resolve
    /// against the process working directory, matching the original tool.
    /// Set this to the source document's directory to make image references
    /// position-independent.
    pub base_dir: Option<PathBuf>,

    /// Detect each image's MIME type from its magic bytes. Default: `false`.
    ///
    /// Off by default for compatibility: historically every inlined image was
    /// labelled `image/jpeg` in its data URI regardless of actual format, and
    /// downstream consumers may depend on that exact string. Turning this on
    /// labels PNG/GIF/WebP/BMP/SVG files correctly.
    pub detect_mime: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            wkhtmltopdf: PathBuf::from(DEFAULT_WKHTMLTOPDF),
            renderer_args: vec!["--quiet".to_string()],
            render_timeout_secs: 120,
            flavor: MarkdownFlavor::default(),
            base_dir: None,
            detect_mime: false,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn wkhtmltopdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wkhtmltopdf = path.into();
        self
    }

    pub fn renderer_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.renderer_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single renderer argument, keeping the existing ones.
    pub fn renderer_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.renderer_args.push(arg.into());
        self
    }

    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs.max(1);
        self
    }

    pub fn flavor(mut self, flavor: MarkdownFlavor) -> Self {
        self.config.flavor = flavor;
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    pub fn detect_mime(mut self, v: bool) -> Self {
        self.config.detect_mime = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        let c = &self.config;
        if c.wkhtmltopdf.as_os_str().is_empty() {
            return Err(Md2PdfError::InvalidConfig(
                "Renderer path must not be empty".into(),
            ));
        }
        if c.render_timeout_secs == 0 {
            return Err(Md2PdfError::InvalidConfig(
                "Render timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Markdown dialect used when converting the source document to HTML.
///
/// Two flavors exist because "standard Markdown-to-HTML conversion rules"
/// means different things to different documents: a README full of tables and
/// task lists needs the GitHub extensions, while strict CommonMark output is
/// easier to diff against other converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkdownFlavor {
    /// Strict CommonMark; no extensions.
    Commonmark,
    /// GitHub-flavored: tables, strikethrough, task lists, footnotes. (default)
    #[default]
    Gfm,
}

impl MarkdownFlavor {
    /// The pulldown-cmark option set for this flavor.
    pub fn options(&self) -> Options {
        match self {
            MarkdownFlavor::Commonmark => Options::empty(),
            MarkdownFlavor::Gfm => {
                Options::ENABLE_TABLES
                    | Options::ENABLE_STRIKETHROUGH
                    | Options::ENABLE_TASKLISTS
                    | Options::ENABLE_FOOTNOTES
            }
        }
    }
}
