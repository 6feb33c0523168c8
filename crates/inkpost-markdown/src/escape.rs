//! HTML escaping helpers.

/// Escape the four HTML-significant characters `&`, `<`, `>` and `"`.
///
/// Single quotes are left alone; rendered attributes are always double-quoted.
///
/// # Examples
///
/// ```
/// use inkpost_markdown::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape double quotes for insertion into a double-quoted attribute value.
///
/// Only `"` is replaced. Callers pass text that has already been through
/// [`escape_html`], so other entities must not be escaped a second time.
pub fn escape_attr(s: &str) -> String {
    s.replace('"', "&quot;")
}
