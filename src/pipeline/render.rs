//! PDF rendering: pipe the final HTML to an external wkhtmltopdf process.
//!
//! ## Why a subprocess?
//!
//! wkhtmltopdf is a native executable wrapping a full WebKit engine; there is
//! no stable library binding worth linking against. The boundary is therefore
//! modelled explicitly: command path, arguments, HTML on stdin, output path
//! as the final argument, stderr captured for diagnostics, and a hard
//! timeout after which the child is killed.
//!
//! ## Why read stderr concurrently?
//!
//! wkhtmltopdf writes progress and warnings to stderr. If the pipe fills up
//! while we are still blocked writing HTML to stdin, both processes deadlock.
//! A spawned task drains stderr for the whole lifetime of the child.

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info};

/// Render an HTML string to a PDF file at `output_path`.
///
/// Any existing file at `output_path` is overwritten. On failure a partially
/// written file may remain; no cleanup is attempted.
pub async fn render_pdf(
    html: &str,
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<(), Md2PdfError> {
    let renderer = &config.wkhtmltopdf;
    debug!(
        "Invoking renderer: {} {:?} - {}",
        renderer.display(),
        config.renderer_args,
        output_path.display()
    );

    // `-` tells wkhtmltopdf to read the HTML from stdin.
    let mut child = Command::new(renderer)
        .args(&config.renderer_args)
        .arg("-")
        .arg(output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Md2PdfError::RendererNotFound {
                    path: renderer.clone(),
                }
            } else {
                Md2PdfError::RendererSpawn {
                    path: renderer.clone(),
                    source: e,
                }
            }
        })?;

    // Drain stderr in the background so the child never blocks on a full pipe.
    let mut stderr_pipe = child.stderr.take();
    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(ref mut stderr) = stderr_pipe {
            stderr.read_to_string(&mut buf).await.ok();
        }
        buf
    });

    if let Some(mut stdin) = child.stdin.take() {
        // A write error here usually means the child already exited; the
        // exit-status check below reports the real cause.
        if let Err(e) = stdin.write_all(html.as_bytes()).await {
            debug!("Failed to write HTML to renderer stdin: {}", e);
        }
        // Dropping stdin closes the pipe, signalling end of input.
    }

    let timeout = Duration::from_secs(config.render_timeout_secs);
    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(result) => result.map_err(|e| {
            Md2PdfError::Internal(format!("Failed to wait on renderer: {e}"))
        })?,
        Err(_) => {
            child.kill().await.ok();
            return Err(Md2PdfError::RenderTimeout {
                secs: config.render_timeout_secs,
            });
        }
    };

    let stderr = stderr_task.await.unwrap_or_default();

    if !status.success() {
        return Err(Md2PdfError::RenderFailed {
            code: status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    if !stderr.trim().is_empty() {
        debug!("Renderer stderr: {}", stderr.trim());
    }
    info!("Wrote PDF: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    #[tokio::test]
    async fn nonexistent_renderer_is_typed_error() {
        let config = ConversionConfig::builder()
            .wkhtmltopdf("/definitely/not/a/real/wkhtmltopdf")
            .build()
            .expect("config");
        let out = std::env::temp_dir().join("md2pdf-never-written.pdf");

        let result = render_pdf("<p>hi</p>", &out, &config).await;
        assert!(matches!(
            result,
            Err(Md2PdfError::RendererNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn failing_renderer_reports_exit_code_and_stderr() {
        // `false` ignores its arguments and exits 1 without reading stdin,
        // standing in for a renderer that rejects its input.
        let config = ConversionConfig::builder()
            .wkhtmltopdf("/bin/false")
            .renderer_args(Vec::<String>::new())
            .build()
            .expect("config");
        let out = std::env::temp_dir().join("md2pdf-never-written.pdf");

        let result = render_pdf("<p>hi</p>", &out, &config).await;
        match result {
            Err(Md2PdfError::RenderFailed { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("expected RenderFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hung_renderer_times_out() {
        // A shell that sleeps without reading stdin stands in for a hung
        // renderer; the trailing input/output arguments become ignored
        // positional parameters.
        let config = ConversionConfig::builder()
            .wkhtmltopdf("/bin/sh")
            .renderer_args(["-c", "sleep 30"])
            .render_timeout_secs(1)
            .build()
            .expect("config");
        let out = std::env::temp_dir().join("md2pdf-never-written.pdf");

        let result = render_pdf("<p>hi</p>", &out, &config).await;
        assert!(matches!(result, Err(Md2PdfError::RenderTimeout { secs: 1 })));
    }
}
