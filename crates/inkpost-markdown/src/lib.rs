//! Markdown renderer for blog post bodies.
//!
//! A deliberately small, line-oriented renderer. It is not a `CommonMark`
//! implementation: tables, nested lists, reference links and raw HTML (other
//! than inline SVG) are not supported.
//!
//! # Architecture
//!
//! Rendering is a strictly forward pipeline:
//! - [`extract_chunks`]: pulls embedded `<svg>` markup and `$...$` / `$$...$$`
//!   math out of the source, leaving `%%SVG{n}%%` / `%%MATH{n}%%` placeholders
//! - [`render_blocks`]: walks the lines and emits one HTML fragment per block
//!   (fenced code, rule, heading, blockquote, lists, paragraph)
//! - [`render_inline`]: escapes a block's text and applies code spans,
//!   emphasis and links
//! - [`restore_chunks`]: substitutes the extracted chunks back into the HTML
//!
//! [`excerpt`] is a separate helper producing a plain-text teaser for listings.
//!
//! Every call owns its chunk tables, so rendering is safe to run from any
//! number of threads at once.
//!
//! # Example
//!
//! ```
//! use inkpost_markdown::render_markdown;
//!
//! let html = render_markdown("# Hello\n\n**Bold** text");
//! assert_eq!(html, "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>");
//! ```

mod block;
mod chunks;
mod escape;
mod excerpt;
mod inline;

pub use block::render_blocks;
pub use chunks::{ChunkKind, Chunks, Extracted, extract_chunks, restore_chunks};
pub use escape::{escape_attr, escape_html};
pub use excerpt::{DEFAULT_EXCERPT_LEN, excerpt};
pub use inline::render_inline;

/// Render a post body to an HTML fragment.
///
/// Blocks are joined with a single newline. Empty input yields an empty string.
/// The output is only HTML-escaped, not sanitized; embed untrusted content
/// behind a sanitizer.
pub fn render_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let Extracted { text, chunks } = extract_chunks(markdown);
    let html = render_blocks(&text).join("\n");
    restore_chunks(&html, &chunks)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(render_markdown("  \n\n\t\n"), "");
    }

    #[test]
    fn test_mixed_document() {
        let md = "# Title\n\nIntro with `code`.\n\n- one\n- two\n\n> quoted\n\n---\n\n1. first\n2. second";
        assert_eq!(
            render_markdown(md),
            "<h1>Title</h1>\n\
             <p>Intro with <code>code</code>.</p>\n\
             <ul><li>one</li><li>two</li></ul>\n\
             <blockquote>quoted</blockquote>\n\
             <hr>\n\
             <ol><li>first</li><li>second</li></ol>"
        );
    }

    #[test]
    fn test_svg_on_own_line_is_not_wrapped() {
        let md = "Before\n\n<svg width=\"10\"><rect/></svg>\n\nAfter";
        assert_eq!(
            render_markdown(md),
            "<p>Before</p>\n<svg width=\"10\"><rect/></svg>\n<p>After</p>"
        );
    }

    #[test]
    fn test_multiline_svg_restored_verbatim() {
        let md = "<svg>\n<circle r=\"5\"/>\n</svg>";
        assert_eq!(render_markdown(md), md);
    }

    #[test]
    fn test_inline_svg_inside_paragraph() {
        let md = "icon <svg><path d=\"M0 0\"/></svg> here";
        assert_eq!(
            render_markdown(md),
            "<p>icon <svg><path d=\"M0 0\"/></svg> here</p>"
        );
    }

    #[test]
    fn test_math_is_not_escaped_or_emphasized() {
        let md = "Euler: $e^{i\\pi} < 0 * a_1 * b_2$ done";
        assert_eq!(
            render_markdown(md),
            "<p>Euler: $e^{i\\pi} < 0 * a_1 * b_2$ done</p>"
        );
    }

    #[test]
    fn test_display_math_spanning_lines() {
        let md = "$$\nx < y\n$$";
        assert_eq!(render_markdown(md), "<p>$$\nx < y\n$$</p>");
    }

    #[test]
    fn test_dollar_inside_svg_is_not_math() {
        let md = "<svg data-a=\"$1\" data-b=\"$2\"></svg>";
        assert_eq!(render_markdown(md), md);
    }

    #[test]
    fn test_code_fence_keeps_placeholders_resolved() {
        let md = "```\ncost: $5 and $6\n```";
        assert_eq!(
            render_markdown(md),
            "<pre><code>cost: $5 and $6</code></pre>"
        );
    }
}
