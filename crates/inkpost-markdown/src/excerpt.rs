//! Plain-text excerpts for post listings.

use std::sync::LazyLock;

use regex::Regex;

use crate::chunks::SVG_PATTERN;

/// Default excerpt length in characters.
pub const DEFAULT_EXCERPT_LEN: usize = 160;

const ELLIPSIS: char = '…';

// Not anchored to line starts: `# ` runs are stripped anywhere in the text.
static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}\s+").unwrap());

static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

static FORMATTING_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`~]").unwrap());

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// Produce a plain-text excerpt of a post body.
///
/// Strips SVG elements, heading markers, images, link syntax (keeping the link
/// text) and the characters `*`, `_`, `` ` ``, `~`, then folds newlines into
/// spaces. Text longer than `max_len` characters is cut at the last space at
/// or before `max_len` and suffixed with `…`. When there is no such space the
/// result is the ellipsis alone.
///
/// # Examples
///
/// ```
/// use inkpost_markdown::excerpt;
///
/// assert_eq!(excerpt("# Title\n\nSome **bold** [link](/x).", 160), "Title Some bold link.");
/// assert_eq!(excerpt("one two three", 8), "one two…");
/// ```
pub fn excerpt(markdown: &str, max_len: usize) -> String {
    let plain = SVG_PATTERN.replace_all(markdown, "");
    let plain = HEADING_MARKER.replace_all(&plain, "");
    let plain = IMAGE.replace_all(&plain, "");
    let plain = LINK.replace_all(&plain, "${1}");
    let plain = FORMATTING_CHARS.replace_all(&plain, "");
    let plain = NEWLINES.replace_all(&plain, " ");
    let plain = plain.trim();

    // Byte offset of the character at index `max_len`, if the text is longer.
    let Some((limit, limit_char)) = plain.char_indices().nth(max_len) else {
        return plain.to_owned();
    };

    // The search window includes the character at `max_len` itself.
    let window = &plain[..limit + limit_char.len_utf8()];
    let cut = window.rfind(' ').unwrap_or(0);

    let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
    out.push_str(&plain[..cut]);
    out.push(ELLIPSIS);
    out
}
