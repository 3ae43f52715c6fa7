//! Markdown-to-HTML conversion via pulldown-cmark.
//!
//! This stage is pure and infallible: pulldown-cmark parses any byte
//! sequence as *some* Markdown, so there is no error path here. Which
//! extensions are enabled is the only knob, controlled by
//! [`MarkdownFlavor`].

use crate::config::MarkdownFlavor;
use pulldown_cmark::{html, Parser};
use tracing::debug;

/// Convert a Markdown string to an HTML fragment.
///
/// The output is a bare fragment (no `<html>`/`<body>` shell), exactly what
/// the converter produces. wkhtmltopdf accepts fragments as-is.
pub fn to_html(markdown: &str, flavor: MarkdownFlavor) -> String {
    let parser = Parser::new_ext(markdown, flavor.options());

    // Markdown typically expands by ~50% when converted to HTML.
    let mut html_output = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut html_output, parser);

    debug!(
        "Converted {} bytes of Markdown to {} bytes of HTML",
        markdown.len(),
        html_output.len()
    );
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_paragraph() {
        let html = to_html("# Title\n\nBody text.\n", MarkdownFlavor::Gfm);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body text.</p>"));
    }

    #[test]
    fn image_syntax_becomes_img_element() {
        let html = to_html("![logo](assets/logo.png)\n", MarkdownFlavor::Gfm);
        assert!(html.contains("<img src=\"assets/logo.png\""));
        assert!(html.contains("alt=\"logo\""));
    }

    #[test]
    fn gfm_table_enabled() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let html = to_html(md, MarkdownFlavor::Gfm);
        assert!(html.contains("<table>"));
    }

    #[test]
    fn commonmark_has_no_tables() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let html = to_html(md, MarkdownFlavor::Commonmark);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn code_block_preserved() {
        let html = to_html("```rust\nfn main() {}\n```\n", MarkdownFlavor::Gfm);
        assert!(html.contains("<pre><code"));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(to_html("", MarkdownFlavor::Gfm), "");
    }
}
