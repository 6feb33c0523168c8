//! Inline formatting.
//!
//! Text is HTML-escaped first, then each substitution runs as one global,
//! non-overlapping pass over the output of the previous one. There is no
//! nesting resolution beyond that order.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::{escape_attr, escape_html};

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static STRONG_ASTERISK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static STRONG_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());

static EM_ASTERISK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

static EM_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(.+?)_").unwrap());

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Link targets kept as written; anything else becomes `#`.
const SAFE_HREF_PREFIXES: [&str; 3] = ["http", "/", "mailto:"];

/// Render inline markdown within a single block.
///
/// Applies, in order: HTML escaping, `` `code` ``, `**strong**`, `__strong__`,
/// `*em*`, `_em_`, then `[text](url)`. Links open in a new tab; targets that
/// do not start with `http`, `/` or `mailto:` are replaced by `#`.
///
/// # Examples
///
/// ```
/// use inkpost_markdown::render_inline;
///
/// assert_eq!(render_inline("**a** < b"), "<strong>a</strong> &lt; b");
/// assert_eq!(
///     render_inline("[x](javascript:alert(1))"),
///     r##"<a href="#" target="_blank" rel="noopener">x</a>)"##
/// );
/// ```
pub fn render_inline(text: &str) -> String {
    let html = escape_html(text);
    let html = CODE_SPAN.replace_all(&html, "<code>${1}</code>");
    let html = STRONG_ASTERISK.replace_all(&html, "<strong>${1}</strong>");
    let html = STRONG_UNDERSCORE.replace_all(&html, "<strong>${1}</strong>");
    let html = EM_ASTERISK.replace_all(&html, "<em>${1}</em>");
    let html = EM_UNDERSCORE.replace_all(&html, "<em>${1}</em>");
    let html = LINK.replace_all(&html, |caps: &Captures<'_>| {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_attr(safe_href(&caps[2])),
            &caps[1]
        )
    });
    html.into_owned()
}

fn safe_href(href: &str) -> &str {
    if SAFE_HREF_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
    {
        href
    } else {
        "#"
    }
}
