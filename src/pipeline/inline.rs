//! Image inlining: rewrite each `img` element's `src` to a base64 data URI.
//!
//! ## Why a DOM pass instead of a regex?
//!
//! `src` attributes can appear in either quote style, in any attribute
//! position, and alongside `srcset`/`data-src` lookalikes. Parsing with
//! kuchiki (html5ever underneath) and rewriting attributes on the tree is
//! robust against all of that, and serialising the tree back guarantees
//! well-formed output for the renderer.
//!
//! ## Failure policy
//!
//! This is the only fault-tolerant stage of the pipeline. A file that cannot
//! be read is logged, recorded in the element's [`ImageResult`], and left
//! with its original `src`; every other image is still processed. One broken
//! reference never costs the whole document.
//!
//! ## The `image/jpeg` label
//!
//! By default every data URI is labelled `image/jpeg` regardless of the
//! file's real format. Renderers sniff the payload and ignore the label, and
//! existing consumers compare against the fixed string, so the historical
//! behaviour is kept. [`ConversionConfig::detect_mime`] opts into sniffing
//! the real type from the file's magic bytes.

use crate::config::ConversionConfig;
use crate::error::{ImageError, Md2PdfError};
use crate::output::{ImageResult, PreparedHtml};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use kuchiki::traits::TendrilSink;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Content type declared in data URIs when MIME detection is off.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// Inline every image reference in `html` as a base64 data URI.
///
/// Images are visited in document order. Elements with no `src`, an empty
/// `src`, or an existing `data:` URI are skipped silently. Read failures are
/// non-fatal: the element keeps its original `src` and the failure is
/// recorded in the returned [`ImageResult`].
///
/// A document containing no `img` elements is returned byte-for-byte
/// unchanged, so plain text documents round-trip without serialisation
/// side effects.
pub fn inline_images(
    html: &str,
    config: &ConversionConfig,
) -> Result<PreparedHtml, Md2PdfError> {
    let document = kuchiki::parse_html().one(html);

    let elements: Vec<_> = document
        .select("img")
        .map_err(|()| Md2PdfError::Internal("invalid img selector".into()))?
        .collect();

    if elements.is_empty() {
        debug!("No image elements found; HTML passed through unchanged");
        return Ok(PreparedHtml {
            html: html.to_string(),
            images: Vec::new(),
            skipped_images: 0,
        });
    }

    let mut images = Vec::with_capacity(elements.len());
    let mut skipped = 0usize;

    for (index, element) in elements.iter().enumerate() {
        let src = element
            .attributes
            .borrow()
            .get("src")
            .map(str::to_string);

        let src = match src {
            Some(s) if !s.is_empty() => s,
            _ => {
                debug!("Skipping image element {} with no usable src", index);
                skipped += 1;
                continue;
            }
        };

        // Already inlined; re-encoding a data URI as a file path would only
        // produce a spurious failure log.
        if src.starts_with("data:") {
            debug!("Skipping image element {} with existing data URI", index);
            skipped += 1;
            continue;
        }

        let path = resolve_src(&src, config.base_dir.as_deref());
        match std::fs::read(&path) {
            Ok(bytes) => {
                let mime = if config.detect_mime {
                    sniff_mime(&bytes)
                } else {
                    DEFAULT_MIME
                };
                let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
                element.attributes.borrow_mut().insert("src", data_uri);
                debug!("Inlined '{}' ({} bytes, {})", src, bytes.len(), mime);
                images.push(ImageResult {
                    index,
                    src,
                    inlined_bytes: bytes.len(),
                    error: None,
                });
            }
            Err(e) => {
                warn!("Failed to inline image '{}': {}", src, e);
                images.push(ImageResult {
                    index,
                    inlined_bytes: 0,
                    error: Some(ImageError::ReadFailed {
                        src: src.clone(),
                        detail: e.to_string(),
                    }),
                    src,
                });
            }
        }
    }

    let mut serialized = Vec::new();
    document
        .serialize(&mut serialized)
        .map_err(|e| Md2PdfError::Internal(format!("HTML serialisation failed: {e}")))?;

    Ok(PreparedHtml {
        html: String::from_utf8_lossy(&serialized).into_owned(),
        images,
        skipped_images: skipped,
    })
}

/// Resolve an `src` value to a filesystem path.
///
/// Relative paths are joined to `base_dir` when one is configured; otherwise
/// they are left as-is and resolve against the process working directory.
fn resolve_src(src: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(src);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Detect an image MIME type from the file's magic bytes.
///
/// Falls back to [`DEFAULT_MIME`] for unknown signatures, preserving the
/// historical label rather than inventing `application/octet-stream`.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"BM") {
        "image/bmp"
    } else if looks_like_svg(bytes) {
        "image/svg+xml"
    } else {
        DEFAULT_MIME
    }
}

/// SVG has no magic number; look for an `<svg` or XML prologue near the start.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;
    use base64::Engine as _;

    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    fn write_image(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).expect("write image");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn no_images_passes_through_unchanged() {
        let html = "<h1>Title</h1>\n<p>No images here.</p>\n";
        let config = ConversionConfig::default();
        let prepared = inline_images(html, &config).expect("inline");
        assert_eq!(prepared.html, html);
        assert!(prepared.images.is_empty());
        assert_eq!(prepared.skipped_images, 0);
    }

    #[test]
    fn valid_image_becomes_jpeg_data_uri() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = write_image(&dir, "pic.png", PNG_BYTES);
        let html = format!("<p><img src=\"{}\" alt=\"pic\"></p>", src);
        let config = ConversionConfig::default();

        let prepared = inline_images(&html, &config).expect("inline");
        assert_eq!(prepared.images.len(), 1);
        assert!(prepared.images[0].is_inlined());
        assert_eq!(prepared.images[0].inlined_bytes, PNG_BYTES.len());

        // Fixed label regardless of actual format.
        let prefix = "data:image/jpeg;base64,";
        let start = prepared.html.find(prefix).expect("data URI present");
        let rest = &prepared.html[start + prefix.len()..];
        let end = rest.find('"').expect("attribute closes");
        let decoded = STANDARD.decode(&rest[..end]).expect("valid base64");
        assert_eq!(decoded, PNG_BYTES);
    }

    #[test]
    fn detect_mime_labels_png_correctly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = write_image(&dir, "pic.png", PNG_BYTES);
        let html = format!("<img src=\"{}\">", src);
        let config = ConversionConfig::builder()
            .detect_mime(true)
            .build()
            .expect("config");

        let prepared = inline_images(&html, &config).expect("inline");
        assert!(prepared.html.contains("data:image/png;base64,"));
    }

    #[test]
    fn missing_file_keeps_original_src() {
        let html = "<img src=\"no/such/file.png\">";
        let config = ConversionConfig::default();

        let prepared = inline_images(html, &config).expect("inline");
        assert_eq!(prepared.images.len(), 1);
        assert!(!prepared.images[0].is_inlined());
        assert_eq!(prepared.images[0].src, "no/such/file.png");
        assert!(prepared.html.contains("src=\"no/such/file.png\""));
        assert!(!prepared.html.contains("data:"));
    }

    #[test]
    fn one_missing_file_does_not_affect_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = write_image(&dir, "first.png", PNG_BYTES);
        let last = write_image(&dir, "last.png", PNG_BYTES);
        let html = format!(
            "<img src=\"{}\"><img src=\"gone.png\"><img src=\"{}\">",
            first, last
        );
        let config = ConversionConfig::default();

        let prepared = inline_images(&html, &config).expect("inline");
        assert_eq!(prepared.images.len(), 3);
        assert!(prepared.images[0].is_inlined());
        assert!(!prepared.images[1].is_inlined());
        assert!(prepared.images[2].is_inlined());
        assert_eq!(prepared.html.matches("data:image/jpeg;base64,").count(), 2);
        assert!(prepared.html.contains("src=\"gone.png\""));
    }

    #[test]
    fn empty_and_missing_src_are_skipped() {
        let html = "<img src=\"\"><img alt=\"no src\"><p>text</p>";
        let config = ConversionConfig::default();

        let prepared = inline_images(html, &config).expect("inline");
        assert!(prepared.images.is_empty());
        assert_eq!(prepared.skipped_images, 2);
    }

    #[test]
    fn existing_data_uri_is_skipped() {
        let html = "<img src=\"data:image/png;base64,AAAA\">";
        let config = ConversionConfig::default();

        let prepared = inline_images(html, &config).expect("inline");
        assert!(prepared.images.is_empty());
        assert_eq!(prepared.skipped_images, 1);
        assert!(prepared.html.contains("data:image/png;base64,AAAA"));
    }

    #[test]
    fn relative_src_resolved_against_base_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_image(&dir, "rel.png", PNG_BYTES);
        let html = "<img src=\"rel.png\">";
        let config = ConversionConfig::builder()
            .base_dir(dir.path())
            .build()
            .expect("config");

        let prepared = inline_images(html, &config).expect("inline");
        assert_eq!(prepared.images.len(), 1);
        assert!(prepared.images[0].is_inlined());
    }

    #[test]
    fn resolve_src_leaves_absolute_paths() {
        let resolved = resolve_src("/abs/pic.png", Some(Path::new("/base")));
        assert_eq!(resolved, PathBuf::from("/abs/pic.png"));
        let resolved = resolve_src("rel.png", Some(Path::new("/base")));
        assert_eq!(resolved, PathBuf::from("/base/rel.png"));
        let resolved = resolve_src("rel.png", None);
        assert_eq!(resolved, PathBuf::from("rel.png"));
    }

    #[test]
    fn sniff_mime_known_signatures() {
        assert_eq!(sniff_mime(PNG_BYTES), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a..."), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"BM\x00\x00"), "image/bmp");
        assert_eq!(sniff_mime(b"<svg xmlns=\"x\">"), "image/svg+xml");
        assert_eq!(sniff_mime(b"not an image"), DEFAULT_MIME);
    }
}
