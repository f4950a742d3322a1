//! Escapes untrusted plain text for embedding in the feed document.
//! Front-matter attributes are author-supplied; a stray `&` or `<` in a
//! title would corrupt the XML the feed is written into.

/// Returns a copy of `s` with `&`, `<`, `"`, and `'` replaced by their
/// character-reference equivalents. Apply exactly once per raw field:
/// escaping is not idempotent, so re-escaping double-encodes (`&` becomes
/// `&amp;`, then `&amp;amp;`). Never apply to rendered markup, which is
/// already well-formed.
pub fn text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
