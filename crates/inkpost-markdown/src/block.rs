//! Line-oriented block parser.
//!
//! Block recognition is a prioritized table of [`BlockRule`]s. At each cursor
//! position the first rule whose `starts` predicate accepts the current line
//! consumes one or more lines, returning the next cursor position and an
//! optional HTML fragment. Lines no rule claims start a paragraph, which runs
//! until the next line some rule would claim.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::inline::render_inline;

static RULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\*\*\*|---|___)\s*$").unwrap());

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+([^\r\n]*)").unwrap());

static UNORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s").unwrap());

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());

static SVG_PLACEHOLDER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%%SVG[0-9]+%%$").unwrap());

const FENCE: &str = "```";
const QUOTE_PREFIX: &str = "> ";

/// Cursor position after a rule ran, plus the fragment it produced.
type Consumed = (usize, Option<String>);

/// One block-level construct: when it starts, and how it consumes lines.
struct BlockRule {
    starts: fn(&str) -> bool,
    consume: fn(&[&str], usize) -> Consumed,
}

/// Rules in priority order; the first match wins.
static RULES: [BlockRule; 8] = [
    BlockRule {
        starts: is_fence,
        consume: consume_fence,
    },
    BlockRule {
        starts: is_rule,
        consume: consume_rule,
    },
    BlockRule {
        starts: is_heading,
        consume: consume_heading,
    },
    BlockRule {
        starts: is_quote,
        consume: consume_quote,
    },
    BlockRule {
        starts: is_unordered_item,
        consume: consume_unordered_list,
    },
    BlockRule {
        starts: is_ordered_item,
        consume: consume_ordered_list,
    },
    BlockRule {
        starts: is_svg_placeholder_line,
        consume: consume_svg_placeholder_line,
    },
    BlockRule {
        starts: is_blank,
        consume: consume_blank,
    },
];

/// Split text into lines and render each block to an HTML fragment.
///
/// Expects text whose SVG and math spans have already been replaced by
/// placeholders (see [`extract_chunks`](crate::extract_chunks)).
///
/// # Examples
///
/// ```
/// use inkpost_markdown::render_blocks;
///
/// assert_eq!(
///     render_blocks("## Notes\n\n- a\n- b"),
///     ["<h2>Notes</h2>", "<ul><li>a</li><li>b</li></ul>"]
/// );
/// ```
pub fn render_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut fragments = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let line = lines[cursor];
        let (next, fragment) = match RULES.iter().find(|rule| (rule.starts)(line)) {
            Some(rule) => (rule.consume)(&lines, cursor),
            None => consume_paragraph(&lines, cursor),
        };
        debug_assert!(next > cursor, "block rule did not advance the cursor");
        fragments.extend(fragment);
        cursor = next;
    }

    fragments
}

/// Index of the first line at or after `from` that fails `keep`.
fn run_end(lines: &[&str], from: usize, keep: impl Fn(&str) -> bool) -> usize {
    lines[from..]
        .iter()
        .position(|&line| !keep(line))
        .map_or(lines.len(), |offset| from + offset)
}

fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

fn consume_fence(lines: &[&str], at: usize) -> Consumed {
    let lang = lines[at][FENCE.len()..].trim();
    let body_start = at + 1;
    let body_end = run_end(lines, body_start, |line| !is_fence(line));

    let code = lines[body_start..body_end]
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("\n");

    let mut html = String::from("<pre><code");
    if !lang.is_empty() {
        write!(html, r#" class="language-{}""#, escape_html(lang)).unwrap();
    }
    write!(html, ">{code}</code></pre>").unwrap();

    // Skip the closing fence; an unterminated fence runs to the end.
    (lines.len().min(body_end + 1), Some(html))
}

fn is_rule(line: &str) -> bool {
    RULE_PATTERN.is_match(line)
}

fn consume_rule(_lines: &[&str], at: usize) -> Consumed {
    (at + 1, Some("<hr>".to_owned()))
}

fn is_heading(line: &str) -> bool {
    HEADING_PATTERN.is_match(line)
}

fn consume_heading(lines: &[&str], at: usize) -> Consumed {
    let html = HEADING_PATTERN.captures(lines[at]).map(|caps| {
        let level = caps[1].len();
        format!("<h{level}>{}</h{level}>", render_inline(&caps[2]))
    });
    (at + 1, html)
}

fn is_quote(line: &str) -> bool {
    line.starts_with(QUOTE_PREFIX)
}

fn consume_quote(lines: &[&str], at: usize) -> Consumed {
    let end = run_end(lines, at, is_quote);
    let text = lines[at..end]
        .iter()
        .map(|line| &line[QUOTE_PREFIX.len()..])
        .collect::<Vec<_>>()
        .join("\n");
    (end, Some(format!("<blockquote>{}</blockquote>", render_inline(&text))))
}

fn is_unordered_item(line: &str) -> bool {
    UNORDERED_ITEM.is_match(line)
}

fn consume_unordered_list(lines: &[&str], at: usize) -> Consumed {
    let end = run_end(lines, at, is_unordered_item);
    let items = list_items(&lines[at..end], |line| {
        // Marker plus the single whitespace character after it.
        line.char_indices().nth(2).map_or("", |(i, _)| &line[i..])
    });
    (end, Some(format!("<ul>{items}</ul>")))
}

fn is_ordered_item(line: &str) -> bool {
    ORDERED_ITEM.is_match(line)
}

fn consume_ordered_list(lines: &[&str], at: usize) -> Consumed {
    let end = run_end(lines, at, is_ordered_item);
    let items = list_items(&lines[at..end], |line| {
        ORDERED_ITEM.find(line).map_or(line, |marker| &line[marker.end()..])
    });
    (end, Some(format!("<ol>{items}</ol>")))
}

fn list_items<'a>(lines: &[&'a str], strip_marker: impl Fn(&'a str) -> &'a str) -> String {
    let mut items = String::new();
    for &line in lines {
        write!(items, "<li>{}</li>", render_inline(strip_marker(line))).unwrap();
    }
    items
}

fn is_svg_placeholder_line(line: &str) -> bool {
    SVG_PLACEHOLDER_LINE.is_match(line.trim())
}

fn consume_svg_placeholder_line(lines: &[&str], at: usize) -> Consumed {
    (at + 1, Some(lines[at].trim().to_owned()))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn consume_blank(_lines: &[&str], at: usize) -> Consumed {
    (at + 1, None)
}

fn starts_block(line: &str) -> bool {
    RULES.iter().any(|rule| (rule.starts)(line))
}

/// Fallback rule: the current line plus every following line no rule claims.
fn consume_paragraph(lines: &[&str], at: usize) -> Consumed {
    let end = run_end(lines, at + 1, |line| !starts_block(line));
    let text = lines[at..end].join(" ");
    (end, Some(format!("<p>{}</p>", render_inline(&text))))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fence_with_language() {
        assert_eq!(
            render_blocks("```rust\nfn main() {}\n```"),
            [r#"<pre><code class="language-rust">fn main() {}</code></pre>"#]
        );
    }

    #[test]
    fn test_fence_without_language() {
        assert_eq!(
            render_blocks("```\nplain\n```"),
            ["<pre><code>plain</code></pre>"]
        );
    }

    #[test]
    fn test_fence_language_is_trimmed_and_escaped() {
        assert_eq!(
            render_blocks("```  c<\"  \nx\n```"),
            [r#"<pre><code class="language-c&lt;&quot;">x</code></pre>"#]
        );
    }

    #[test]
    fn test_fence_content_escaped_not_inline_rendered() {
        assert_eq!(
            render_blocks("```\n<b>**x**</b> & _y_\n```"),
            ["<pre><code>&lt;b&gt;**x**&lt;/b&gt; &amp; _y_</code></pre>"]
        );
    }

    #[test]
    fn test_fence_preserves_blank_lines_and_markers() {
        assert_eq!(
            render_blocks("```\n# not heading\n\n- not list\n```"),
            ["<pre><code># not heading\n\n- not list</code></pre>"]
        );
    }

    #[test]
    fn test_fence_closer_with_trailing_text_still_closes() {
        assert_eq!(
            render_blocks("```\na\n```ignored\nafter"),
            ["<pre><code>a</code></pre>", "<p>after</p>"]
        );
    }

    #[test]
    fn test_empty_fence_at_end_of_input() {
        assert_eq!(render_blocks("```"), ["<pre><code></code></pre>"]);
    }

    #[test]
    fn test_horizontal_rules() {
        for line in ["***", "---", "___", "---   ", "  ***"] {
            assert_eq!(render_blocks(line), ["<hr>"], "line {line:?}");
        }
    }

    #[test]
    fn test_longer_dash_run_is_not_rule() {
        assert_eq!(render_blocks("----"), ["<p>----</p>"]);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render_blocks("# a"), ["<h1>a</h1>"]);
        assert_eq!(render_blocks("### c"), ["<h3>c</h3>"]);
        assert_eq!(render_blocks("###### f"), ["<h6>f</h6>"]);
    }

    #[test]
    fn test_heading_text_stops_at_carriage_return() {
        assert_eq!(render_blocks("# Title\r"), ["<h1>Title</h1>"]);
    }

    #[test]
    fn test_heading_requires_whitespace() {
        assert_eq!(render_blocks("#tag"), ["<p>#tag</p>"]);
    }

    #[test]
    fn test_heading_inline_rendered() {
        assert_eq!(
            render_blocks("## A *b* & c"),
            ["<h2>A <em>b</em> &amp; c</h2>"]
        );
    }

    #[test]
    fn test_blockquote_joins_lines_with_newline() {
        assert_eq!(
            render_blocks("> one\n> **two**\nafter"),
            [
                "<blockquote>one\n<strong>two</strong></blockquote>",
                "<p>after</p>"
            ]
        );
    }

    #[test]
    fn test_quote_marker_requires_space() {
        assert_eq!(render_blocks(">tight"), ["<p>&gt;tight</p>"]);
    }

    #[test]
    fn test_unordered_list_markers() {
        assert_eq!(
            render_blocks("- a\n* b\n+ c"),
            ["<ul><li>a</li><li>b</li><li>c</li></ul>"]
        );
    }

    #[test]
    fn test_unordered_list_tab_after_marker() {
        assert_eq!(render_blocks("-\titem"), ["<ul><li>item</li></ul>"]);
    }

    #[test]
    fn test_list_item_keeps_extra_spaces() {
        assert_eq!(render_blocks("-  two"), ["<ul><li> two</li></ul>"]);
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render_blocks("1. a\n2. b\n10. c"),
            ["<ol><li>a</li><li>b</li><li>c</li></ol>"]
        );
    }

    #[test]
    fn test_ordered_then_unordered_are_separate() {
        assert_eq!(
            render_blocks("1. a\n- b"),
            ["<ol><li>a</li></ol>", "<ul><li>b</li></ul>"]
        );
    }

    #[test]
    fn test_svg_placeholder_line_emitted_trimmed() {
        assert_eq!(render_blocks("  %%SVG0%%  "), ["%%SVG0%%"]);
    }

    #[test]
    fn test_math_placeholder_line_is_paragraph() {
        assert_eq!(render_blocks("%%MATH0%%"), ["<p>%%MATH0%%</p>"]);
    }

    #[test]
    fn test_paragraph_joins_lines_with_space() {
        assert_eq!(
            render_blocks("first line\nsecond line"),
            ["<p>first line second line</p>"]
        );
    }

    #[test]
    fn test_paragraph_stops_at_block_start() {
        assert_eq!(
            render_blocks("text\n# Head\nmore\n- item\n```\ncode"),
            [
                "<p>text</p>",
                "<h1>Head</h1>",
                "<p>more</p>",
                "<ul><li>item</li></ul>",
                "<pre><code>code</code></pre>"
            ]
        );
    }

    #[test]
    fn test_paragraph_stops_at_svg_placeholder_line() {
        assert_eq!(
            render_blocks("text\n%%SVG0%%\nmore"),
            ["<p>text</p>", "%%SVG0%%", "<p>more</p>"]
        );
    }

    #[test]
    fn test_paragraph_continues_over_hashtag_line() {
        assert_eq!(
            render_blocks("text\n#tag"),
            ["<p>text #tag</p>"]
        );
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert_eq!(render_blocks("####### g"), ["<p>####### g</p>"]);
    }

    #[test]
    fn test_blank_lines_produce_nothing() {
        assert!(render_blocks("\n \n\t").is_empty());
    }

    #[test]
    fn test_rule_interrupts_paragraph() {
        assert_eq!(
            render_blocks("para\n---\nnext"),
            ["<p>para</p>", "<hr>", "<p>next</p>"]
        );
    }
}
