//! Shared utility functions for markdown rendering.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::HeadingLevel;
use regex::Regex;

use crate::state::escape_html;

/// Bare URLs eligible for autolinking. Trailing punctuation stays outside the link.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|www\.)[^\s<>"]*[^\s<>".,:;!?'()\[\]*_~]"#).unwrap()
});

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape text and wrap bare `http(s)://` and `www.` URLs in anchors.
///
/// `www.` links get an `http://` scheme in the href, matching GitHub.
#[must_use]
pub(crate) fn escape_with_autolinks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        let url = m.as_str();
        let href = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        let _ = write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        );
        last = m.end();
    }

    out.push_str(&escape_html(&text[last..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_to_num() {
        assert_eq!(heading_level_to_num(HeadingLevel::H1), 1);
        assert_eq!(heading_level_to_num(HeadingLevel::H6), 6);
    }

    #[test]
    fn test_autolink_plain_text_is_escaped() {
        assert_eq!(escape_with_autolinks("a < b"), "a &lt; b");
    }

    #[test]
    fn test_autolink_https() {
        assert_eq!(
            escape_with_autolinks("See https://example.com/docs for more."),
            r#"See <a href="https://example.com/docs">https://example.com/docs</a> for more."#
        );
    }

    #[test]
    fn test_autolink_www_gets_scheme() {
        assert_eq!(
            escape_with_autolinks("Visit www.rust-lang.org!"),
            r#"Visit <a href="http://www.rust-lang.org">www.rust-lang.org</a>!"#
        );
    }

    #[test]
    fn test_autolink_query_is_escaped() {
        assert_eq!(
            escape_with_autolinks("http://x.io/?a=1&b=2"),
            r#"<a href="http://x.io/?a=1&amp;b=2">http://x.io/?a=1&amp;b=2</a>"#
        );
    }

    #[test]
    fn test_autolink_multiple() {
        let out = escape_with_autolinks("http://a.dev and http://b.dev");
        assert_eq!(out.matches("<a href=").count(), 2);
    }
}
