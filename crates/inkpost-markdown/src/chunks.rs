//! Verbatim chunk extraction and restoration.
//!
//! Embedded SVG markup and math expressions must reach the output untouched:
//! no escaping, no emphasis, no block recognition. [`extract_chunks`] swaps
//! each one for a placeholder token before block parsing, and
//! [`restore_chunks`] puts the originals back once the HTML is assembled.
//!
//! SVG is extracted first so that `$` characters inside SVG attributes are
//! never read as math delimiters.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `<svg ...>` through the first following `</svg>`, case-insensitive, across lines.
pub(crate) static SVG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg.*?</svg>").unwrap());

/// `$$...$$` across lines, or `$...$` within a single line.
static MATH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$[\s\S]+?\$\$|\$[^$\n]+?\$").unwrap());

static SVG_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%SVG([0-9]+)%%").unwrap());

static MATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%MATH([0-9]+)%%").unwrap());

/// Kind of verbatim chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkKind {
    /// Inline `<svg>` element.
    Svg,
    /// `$...$` or `$$...$$` math expression.
    Math,
}

impl ChunkKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Svg => "SVG",
            Self::Math => "MATH",
        }
    }

    /// Placeholder token standing in for the chunk at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use inkpost_markdown::ChunkKind;
    ///
    /// assert_eq!(ChunkKind::Svg.placeholder(0), "%%SVG0%%");
    /// assert_eq!(ChunkKind::Math.placeholder(12), "%%MATH12%%");
    /// ```
    pub fn placeholder(self, index: usize) -> String {
        format!("%%{}{index}%%", self.tag())
    }
}

/// Chunks pulled out of one render call, in source order per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunks {
    svg: Vec<String>,
    math: Vec<String>,
}

impl Chunks {
    /// Extracted SVG elements.
    pub fn svg(&self) -> &[String] {
        &self.svg
    }

    /// Extracted math expressions.
    pub fn math(&self) -> &[String] {
        &self.math
    }

    /// Look up a chunk by kind and placeholder index.
    pub fn get(&self, kind: ChunkKind, index: usize) -> Option<&str> {
        self.of_kind(kind).get(index).map(String::as_str)
    }

    /// Total number of chunks of both kinds.
    pub fn len(&self) -> usize {
        self.svg.len() + self.math.len()
    }

    /// Returns `true` if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.svg.is_empty() && self.math.is_empty()
    }

    fn of_kind(&self, kind: ChunkKind) -> &[String] {
        match kind {
            ChunkKind::Svg => &self.svg,
            ChunkKind::Math => &self.math,
        }
    }

    /// Append a chunk and return its placeholder index.
    fn push(&mut self, kind: ChunkKind, chunk: &str) -> usize {
        let list = match kind {
            ChunkKind::Svg => &mut self.svg,
            ChunkKind::Math => &mut self.math,
        };
        list.push(chunk.to_owned());
        list.len() - 1
    }
}

/// Result of [`extract_chunks`].
#[derive(Debug)]
pub struct Extracted {
    /// Source text with every chunk replaced by its placeholder.
    pub text: String,
    /// The chunks, indexed by placeholder number.
    pub chunks: Chunks,
}

/// Replace embedded SVG and math with placeholder tokens.
///
/// Unmatched delimiters (a lone `$`, an `<svg>` without `</svg>`) are left
/// in the text as-is.
///
/// # Examples
///
/// ```
/// use inkpost_markdown::extract_chunks;
///
/// let extracted = extract_chunks("area $\\pi r^2$ of <svg></svg>");
/// assert_eq!(extracted.text, "area %%MATH0%% of %%SVG0%%");
/// assert_eq!(extracted.chunks.math(), ["$\\pi r^2$"]);
/// ```
pub fn extract_chunks(markdown: &str) -> Extracted {
    let mut chunks = Chunks::default();
    let text = replace_with_placeholders(&SVG_PATTERN, markdown, ChunkKind::Svg, &mut chunks);
    let text = replace_with_placeholders(&MATH_PATTERN, &text, ChunkKind::Math, &mut chunks);

    tracing::debug!(
        svg = chunks.svg.len(),
        math = chunks.math.len(),
        "Extracted verbatim chunks"
    );

    Extracted { text, chunks }
}

fn replace_with_placeholders(
    pattern: &Regex,
    text: &str,
    kind: ChunkKind,
    chunks: &mut Chunks,
) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let index = chunks.push(kind, &caps[0]);
            kind.placeholder(index)
        })
        .into_owned()
}

/// Substitute placeholder tokens in rendered HTML with their original chunks.
///
/// SVG tokens are restored before math tokens, then once more for SVG tokens
/// that were carried inside a math chunk. A token whose index has no chunk
/// can only come from author text that spells out a placeholder literally;
/// it is left in place and logged.
pub fn restore_chunks(html: &str, chunks: &Chunks) -> String {
    let html = restore_kind(&SVG_PLACEHOLDER, html, ChunkKind::Svg, chunks);
    let html = restore_kind(&MATH_PLACEHOLDER, &html, ChunkKind::Math, chunks);
    if chunks.math.iter().any(|math| SVG_PLACEHOLDER.is_match(math)) {
        return restore_kind(&SVG_PLACEHOLDER, &html, ChunkKind::Svg, chunks);
    }
    html
}

fn restore_kind(pattern: &Regex, html: &str, kind: ChunkKind, chunks: &Chunks) -> String {
    pattern
        .replace_all(html, |caps: &Captures<'_>| {
            let chunk = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| chunks.get(kind, index));
            if let Some(chunk) = chunk {
                chunk.to_owned()
            } else {
                tracing::warn!(token = &caps[0], "Placeholder has no extracted chunk");
                caps[0].to_owned()
            }
        })
        .into_owned()
}
