//! Block structure of layout templates.
//!
//! Layout variants are stored as data: a map from block name to the body the
//! variant defines for it. This module extracts that map from a template
//! source by scanning its `{% block %}` / `{% endblock %}` tags.

use std::collections::{BTreeMap, BTreeSet};

/// Blocks found in a template source.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct BlockScan {
    /// Bodies of top-level blocks by name. A repeated name keeps the last body.
    pub top_level: BTreeMap<String, String>,
    /// Names of blocks at any depth.
    pub declared: BTreeSet<String>,
    /// Text or tags outside any top-level block, other than whitespace,
    /// comments and `extends`.
    pub has_stray_content: bool,
}

/// Block tags that do not pair up.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlockScanError {
    #[error("endblock without matching block at byte {0}")]
    UnexpectedEnd(usize),

    #[error("block '{0}' is never closed")]
    Unclosed(String),

    #[error("block tag without a name at byte {0}")]
    MissingName(usize),

    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Marker {
    Tag,
    Comment,
}

/// Find the next `{%` or `{#` at or after `from`.
fn next_marker(source: &str, from: usize) -> Option<(usize, Marker)> {
    let bytes = source.as_bytes();
    let mut pos = from;
    while let Some(offset) = source[pos..].find('{') {
        let at = pos + offset;
        match bytes.get(at + 1) {
            Some(b'%') => return Some((at, Marker::Tag)),
            Some(b'#') => return Some((at, Marker::Comment)),
            _ => pos = at + 1,
        }
    }
    None
}

/// Keyword and arguments of a tag body, without whitespace control markers.
fn tag_words(inner: &str) -> (&str, Option<&str>) {
    let inner = inner
        .trim_start_matches(['-', '+'])
        .trim_end_matches(['-', '+'])
        .trim();
    let mut words = inner.split_whitespace();
    (words.next().unwrap_or_default(), words.next())
}

pub(crate) fn scan_blocks(source: &str) -> Result<BlockScan, BlockScanError> {
    let mut scan = BlockScan::default();
    let mut stack: Vec<String> = Vec::new();
    let mut body_start = 0;
    let mut pos = 0;
    let mut in_raw = false;

    loop {
        let next = next_marker(source, pos);
        let text_end = next.as_ref().map_or(source.len(), |(at, _)| *at);
        if stack.is_empty() && !source[pos..text_end].trim().is_empty() {
            scan.has_stray_content = true;
        }
        let Some((start, marker)) = next else {
            break;
        };

        let close = match marker {
            Marker::Comment => "#}",
            Marker::Tag => "%}",
        };
        let end = source[start + 2..]
            .find(close)
            .map(|i| start + 2 + i + close.len())
            .ok_or(BlockScanError::UnterminatedTag(start))?;
        pos = end;

        if marker == Marker::Comment {
            continue;
        }

        let (keyword, name) = tag_words(&source[start + 2..end - 2]);
        if in_raw {
            in_raw = keyword != "endraw";
            continue;
        }

        match keyword {
            "block" => {
                let name = name.ok_or(BlockScanError::MissingName(start))?;
                if stack.is_empty() {
                    body_start = end;
                }
                scan.declared.insert(name.to_owned());
                stack.push(name.to_owned());
            }
            "endblock" => {
                let name = stack.pop().ok_or(BlockScanError::UnexpectedEnd(start))?;
                if stack.is_empty() {
                    scan.top_level
                        .insert(name, source[body_start..start].to_owned());
                }
            }
            "raw" => {
                in_raw = true;
                if stack.is_empty() {
                    scan.has_stray_content = true;
                }
            }
            "extends" => {}
            _ => {
                if stack.is_empty() {
                    scan.has_stray_content = true;
                }
            }
        }
    }

    match stack.pop() {
        Some(name) => Err(BlockScanError::Unclosed(name)),
        None => Ok(scan),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bodies(scan: &BlockScan) -> Vec<(&str, &str)> {
        scan.top_level
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_top_level_blocks() {
        let scan = scan_blocks("{% block title %}Hi{% endblock %}\n{% block content %}<p>x</p>{% endblock content %}\n").unwrap();
        assert_eq!(bodies(&scan), vec![("content", "<p>x</p>"), ("title", "Hi")]);
        assert!(!scan.has_stray_content);
    }

    #[test]
    fn test_nested_blocks_stay_in_parent_body() {
        let scan = scan_blocks("{% block body %}<main>{% block content %}{{ content }}{% endblock %}</main>{% endblock %}").unwrap();
        assert_eq!(
            bodies(&scan),
            vec![("body", "<main>{% block content %}{{ content }}{% endblock %}</main>")]
        );
        assert_eq!(
            scan.declared.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["body", "content"]
        );
    }

    #[test]
    fn test_whitespace_control_markers() {
        let scan = scan_blocks("{%- block title -%} T {%- endblock -%}").unwrap();
        assert_eq!(bodies(&scan), vec![("title", " T ")]);
    }

    #[test]
    fn test_repeated_block_last_wins() {
        let scan = scan_blocks("{% block a %}1{% endblock %}{% block a %}2{% endblock %}").unwrap();
        assert_eq!(bodies(&scan), vec![("a", "2")]);
    }

    #[test]
    fn test_stray_content_detected() {
        assert!(scan_blocks("hello {% block a %}{% endblock %}").unwrap().has_stray_content);
        assert!(scan_blocks("{{ title }}").unwrap().has_stray_content);
        assert!(scan_blocks("{% set x = 1 %}").unwrap().has_stray_content);
    }

    #[test]
    fn test_comments_and_extends_are_not_stray() {
        let scan = scan_blocks("{% extends \"_layout.html\" %}\n{# a {% block fake %} #}\n{% block a %}x{% endblock %}").unwrap();
        assert!(!scan.has_stray_content);
        assert_eq!(bodies(&scan), vec![("a", "x")]);
        assert!(!scan.declared.contains("fake"));
    }

    #[test]
    fn test_raw_sections_are_opaque() {
        let scan = scan_blocks("{% block a %}{% raw %}{% endblock %}{% endraw %}{% endblock %}").unwrap();
        assert_eq!(bodies(&scan), vec![("a", "{% raw %}{% endblock %}{% endraw %}")]);
    }

    #[test]
    fn test_expressions_with_braces_are_text() {
        let scan = scan_blocks("{% block a %}{{ {'k': 1}.k }}{% endblock %}").unwrap();
        assert_eq!(bodies(&scan), vec![("a", "{{ {'k': 1}.k }}")]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            scan_blocks("{% block a %}x").unwrap_err(),
            BlockScanError::Unclosed("a".to_owned())
        );
        assert_eq!(
            scan_blocks("x{% endblock %}").unwrap_err(),
            BlockScanError::UnexpectedEnd(1)
        );
        assert_eq!(
            scan_blocks("{% block %}{% endblock %}").unwrap_err(),
            BlockScanError::MissingName(0)
        );
        assert_eq!(
            scan_blocks("{% block a").unwrap_err(),
            BlockScanError::UnterminatedTag(0)
        );
    }
}
