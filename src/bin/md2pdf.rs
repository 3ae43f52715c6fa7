//! CLI binary for md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use md2pdf::{convert, prepare, ConversionConfig, MarkdownFlavor, DEFAULT_WKHTMLTOPDF};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion
  md2pdf README.md

  # Choose the output path
  md2pdf README.md -o docs/readme.pdf

  # Renderer installed somewhere unusual
  md2pdf --wkhtmltopdf /opt/wkhtmltox/bin/wkhtmltopdf README.md

  # Resolve relative image paths against the document's directory
  md2pdf --base-dir docs docs/guide.md -o guide.pdf

  # Inspect the prepared HTML without rendering (no wkhtmltopdf needed)
  md2pdf --html-only README.md > readme.html

  # Pass page-setup flags through to wkhtmltopdf
  md2pdf --renderer-arg --page-size --renderer-arg A4 README.md

  # Correct MIME labels instead of the historical fixed image/jpeg
  md2pdf --detect-mime README.md

ENVIRONMENT VARIABLES:
  MD2PDF_WKHTMLTOPDF      Path to the wkhtmltopdf executable
  MD2PDF_OUTPUT           Default output path
  MD2PDF_RENDER_TIMEOUT   Renderer timeout in seconds

SETUP:
  1. Install wkhtmltopdf:  https://wkhtmltopdf.org/downloads.html
  2. Convert:              md2pdf document.md -o document.pdf
"#;

/// Convert Markdown documents to PDF with images inlined as data URIs.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown documents to PDF with images inlined as data URIs",
    long_about = "Convert a Markdown document to PDF. The document is converted to HTML, \
every referenced image is embedded as a base64 data URI, and the result is rendered \
by an external wkhtmltopdf executable.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the source Markdown document.
    input: PathBuf,

    /// Write the PDF to this path.
    #[arg(short, long, env = "MD2PDF_OUTPUT", default_value = "output.pdf")]
    output: PathBuf,

    /// Path to the wkhtmltopdf executable.
    #[arg(long, env = "MD2PDF_WKHTMLTOPDF", default_value = DEFAULT_WKHTMLTOPDF)]
    wkhtmltopdf: PathBuf,

    /// Extra argument passed through to the renderer (repeatable).
    #[arg(long = "renderer-arg", value_name = "ARG")]
    renderer_args: Vec<String>,

    /// Renderer timeout in seconds.
    #[arg(long, env = "MD2PDF_RENDER_TIMEOUT", default_value_t = 120)]
    render_timeout: u64,

    /// Markdown dialect: gfm or commonmark.
    #[arg(long, env = "MD2PDF_FLAVOR", value_enum, default_value = "gfm")]
    flavor: FlavorArg,

    /// Directory for resolving relative image paths (default: working directory).
    #[arg(long, env = "MD2PDF_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Label data URIs with the MIME type sniffed from each file's magic
    /// bytes instead of the fixed image/jpeg.
    #[arg(long, env = "MD2PDF_DETECT_MIME")]
    detect_mime: bool,

    /// Print the prepared HTML to stdout and skip PDF rendering.
    #[arg(long)]
    html_only: bool,

    /// Output run statistics as JSON (to stdout) instead of the summary line.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FlavorArg {
    Gfm,
    Commonmark,
}

impl From<FlavorArg> for MarkdownFlavor {
    fn from(v: FlavorArg) -> Self {
        match v {
            FlavorArg::Gfm => MarkdownFlavor::Gfm,
            FlavorArg::Commonmark => MarkdownFlavor::Commonmark,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── HTML-only mode ───────────────────────────────────────────────────
    if cli.html_only {
        let prepared = prepare(&cli.input, &config)
            .await
            .context("HTML preparation failed")?;

        report_image_failures(&prepared.images);

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&prepared).context("Failed to serialise output")?
            );
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(prepared.html.as_bytes())
                .context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    // ── Full conversion ──────────────────────────────────────────────────
    let output = convert(&cli.input, &cli.output, &config)
        .await
        .context("Conversion failed")?;

    report_image_failures(&output.images);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} images inlined  {}ms  →  {}",
            if stats.failed_images == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.inlined_images,
            stats.total_images,
            stats.total_duration_ms,
            bold(&output.pdf_path.display().to_string()),
        );
        eprintln!(
            "   {} md  /  {} html  /  render {}ms",
            dim(&format!("{} B", stats.markdown_bytes)),
            dim(&format!("{} B", stats.html_bytes)),
            stats.render_duration_ms,
        );
    }

    Ok(())
}

/// Print one diagnostic line per failed image to stdout.
///
/// The format matches the original tool so scripts grepping for it keep
/// working.
fn report_image_failures(images: &[md2pdf::ImageResult]) {
    for image in images {
        if let Some(ref err) = image.error {
            println!("Error processing image {}: {}", err.src(), err.detail());
        }
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut renderer_args = vec!["--quiet".to_string()];
    renderer_args.extend(cli.renderer_args.iter().cloned());

    let mut builder = ConversionConfig::builder()
        .wkhtmltopdf(&cli.wkhtmltopdf)
        .renderer_args(renderer_args)
        .render_timeout_secs(cli.render_timeout)
        .flavor(cli.flavor.clone().into())
        .detect_mime(cli.detect_mime);

    if let Some(ref dir) = cli.base_dir {
        builder = builder.base_dir(dir);
    }

    builder.build().context("Invalid configuration")
}
