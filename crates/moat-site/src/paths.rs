//! URL and title rules derived from source paths.
//!
//! Files and directories may carry a two-digit ordering prefix (`01-guide`,
//! `02-agents.md`). The prefix decides ordering, since navigation is sorted by
//! the raw relative path, but it never appears in URLs or titles. Prefixes of
//! mixed width (`9-a`, `10-b`) do not sort numerically; keeping them two
//! digits wide is up to the site author.

/// Strip a leading `NN-` ordering prefix (exactly two ASCII digits and a hyphen).
///
/// ```
/// use moat_site::strip_order_prefix;
///
/// assert_eq!(strip_order_prefix("01-guide"), "guide");
/// assert_eq!(strip_order_prefix("1-guide"), "1-guide");
/// assert_eq!(strip_order_prefix("2024-notes"), "2024-notes");
/// ```
#[must_use]
pub fn strip_order_prefix(name: &str) -> &str {
    match name.as_bytes() {
        [a, b, b'-', ..] if a.is_ascii_digit() && b.is_ascii_digit() => &name[3..],
        _ => name,
    }
}

/// Display title for a file or directory name.
///
/// Drops a `.md` extension and the ordering prefix, turns hyphens into spaces
/// and upper-cases ASCII `a`-`z` at the start of each space-separated word.
///
/// ```
/// use moat_site::display_title;
///
/// assert_eq!(display_title("02-agents.md"), "Agents");
/// assert_eq!(display_title("quickstart"), "Quickstart");
/// assert_eq!(display_title("01-getting-started"), "Getting Started");
/// ```
#[must_use]
pub fn display_title(name: &str) -> String {
    let name = name.strip_suffix(".md").unwrap_or(name);
    let name = strip_order_prefix(name).replace('-', " ");

    let mut title = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if word_start && c.is_ascii_lowercase() {
            title.push(c.to_ascii_uppercase());
            word_start = false;
        } else {
            title.push(c);
            word_start = c == ' ';
        }
    }
    title
}

/// URL path derived from a source-relative file path.
///
/// ```
/// use moat_site::default_url_path;
///
/// assert_eq!(default_url_path("01-guide/02-agents.md"), "/guide/agents/");
/// assert_eq!(default_url_path("01-guide/index.md"), "/guide/");
/// assert_eq!(default_url_path("index.md"), "/");
/// ```
#[must_use]
pub fn default_url_path(rel_path: &str) -> String {
    let without_ext = rel_path.strip_suffix(".md").unwrap_or(rel_path);
    let path = without_ext
        .split('/')
        .map(strip_order_prefix)
        .collect::<Vec<_>>()
        .join("/");

    if path == "index" {
        return "/".to_owned();
    }
    let path = path.strip_suffix("/index").unwrap_or(&path);
    format!("/{path}/")
}

/// Normalize an explicit URL to start and end with `/`.
///
/// No prefix stripping is applied.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let mut normalized = String::with_capacity(url.len() + 2);
    if !url.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(url);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}
