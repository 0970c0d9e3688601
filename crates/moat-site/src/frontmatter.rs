//! YAML front matter splitting.
//!
//! A document may start with a metadata block:
//!
//! ```text
//! ---
//! title: Getting Started
//! layout: landing
//! tags: [intro]
//! ---
//! # Body
//! ```
//!
//! The block opens with a `---` line at the very start of the file and closes
//! at the next line that is exactly `---`. Both `\n` and `\r\n` line endings
//! are accepted.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

/// Per-document metadata from the front matter block.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Page title override.
    pub title: Option<String>,
    /// Page description.
    pub description: Option<String>,
    /// Explicit URL path, used instead of the path derived from the file name.
    pub url: Option<String>,
    /// Layout variant name.
    pub layout: Option<String>,
    /// All keys other than `title`, `description`, `url` and `layout`.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Metadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.layout.is_none()
            && self.extra.is_empty()
    }
}

/// How malformed front matter is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetadataPolicy {
    /// Log a warning and continue with empty metadata.
    ///
    /// An unterminated block leaves the whole input as the body; a block that
    /// fails to decode is dropped and the body after it is kept.
    #[default]
    Lenient,
    /// Fail with a [`MetadataError`].
    Strict,
}

/// Front matter decoding error.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("front matter opened with '---' but never closed")]
    Unterminated,

    #[error("invalid YAML in front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,

    #[error("front matter key '{0}' must be a string")]
    InvalidKey(String),

    #[error("front matter field '{0}' must be a string")]
    InvalidField(String),

    #[error("front matter field '{key}' cannot be used: {source}")]
    Extra {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Split `input` into metadata and body.
///
/// Input without an opening `---` line is returned unchanged with empty
/// metadata under both policies.
///
/// # Errors
///
/// With [`MetadataPolicy::Strict`], returns an error for an unterminated block
/// or a block that is not a YAML mapping of string keys.
pub fn split_front_matter(
    input: &str,
    policy: MetadataPolicy,
) -> Result<(Metadata, &str), MetadataError> {
    let Some(open_len) = opening_delimiter_len(input) else {
        return Ok((Metadata::default(), input));
    };

    let Some((block_end, body_start)) = find_closing_delimiter(input, open_len) else {
        return match policy {
            MetadataPolicy::Strict => Err(MetadataError::Unterminated),
            MetadataPolicy::Lenient => {
                tracing::warn!("Front matter is never closed, treating it as content");
                Ok((Metadata::default(), input))
            }
        };
    };

    let body = &input[body_start..];
    match parse_block(&input[open_len..block_end]) {
        Ok(metadata) => Ok((metadata, body)),
        Err(e) if policy == MetadataPolicy::Strict => Err(e),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed front matter");
            Ok((Metadata::default(), body))
        }
    }
}

fn opening_delimiter_len(input: &str) -> Option<usize> {
    if input.starts_with("---\n") {
        Some(4)
    } else if input.starts_with("---\r\n") {
        Some(5)
    } else {
        None
    }
}

/// Find the closing `---` line at or after `from`.
///
/// Returns the offset where that line starts and the offset just past its
/// line ending.
fn find_closing_delimiter(input: &str, from: usize) -> Option<(usize, usize)> {
    let mut line_start = from;
    while line_start < input.len() {
        let (line, next) = match input[line_start..].find('\n') {
            Some(i) => (&input[line_start..line_start + i], line_start + i + 1),
            None => (&input[line_start..], input.len()),
        };
        if line.strip_suffix('\r').unwrap_or(line) == "---" {
            return Some((line_start, next));
        }
        line_start = next;
    }
    None
}

fn parse_block(block: &str) -> Result<Metadata, MetadataError> {
    if block.trim().is_empty() {
        return Ok(Metadata::default());
    }

    let mapping = match serde_yaml::from_str::<Value>(block)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Metadata::default()),
        _ => return Err(MetadataError::NotAMapping),
    };

    let mut metadata = Metadata::default();
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            other => return Err(MetadataError::InvalidKey(scalar_to_string(&other)?)),
        };

        let field = match key.as_str() {
            "title" => &mut metadata.title,
            "description" => &mut metadata.description,
            "url" => &mut metadata.url,
            "layout" => &mut metadata.layout,
            _ => {
                let value = serde_json::to_value(&value)
                    .map_err(|source| MetadataError::Extra { key: key.clone(), source })?;
                metadata.extra.insert(key, value);
                continue;
            }
        };
        let text = scalar_to_string(&value).map_err(|_| MetadataError::InvalidField(key))?;
        // An empty value means "not set"
        *field = Some(text).filter(|s| !s.is_empty());
    }

    Ok(metadata)
}

/// Render a YAML scalar as text. `null` becomes an empty string.
fn scalar_to_string(value: &Value) -> Result<String, MetadataError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(MetadataError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn lenient(input: &str) -> (Metadata, &str) {
        split_front_matter(input, MetadataPolicy::Lenient).unwrap()
    }

    #[test]
    fn test_no_front_matter_returns_input_unchanged() {
        for input in ["", "# Title\n\nBody", "  ---\ntitle: x\n---\n", "----\nx\n----\n"] {
            let (meta, body) = lenient(input);
            assert!(meta.is_empty());
            assert_eq!(body, input);
        }
    }

    #[test]
    fn test_known_fields_and_extra() {
        let input = "---\ntitle: Getting Started\ndescription: First steps\nurl: /start\nlayout: landing\nauthor: Ada\ntags: [intro, setup]\n---\n# Body\n";
        let (meta, body) = lenient(input);

        assert_eq!(meta.title.as_deref(), Some("Getting Started"));
        assert_eq!(meta.description.as_deref(), Some("First steps"));
        assert_eq!(meta.url.as_deref(), Some("/start"));
        assert_eq!(meta.layout.as_deref(), Some("landing"));
        assert_eq!(meta.extra.len(), 2);
        assert_eq!(meta.extra["author"], json!("Ada"));
        assert_eq!(meta.extra["tags"], json!(["intro", "setup"]));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_known_keys_never_in_extra() {
        let (meta, _) = lenient("---\ntitle: A\nlayout: wide\nweight: 3\n---\n");
        for key in ["title", "description", "url", "layout"] {
            assert!(!meta.extra.contains_key(key));
        }
        assert_eq!(meta.extra["weight"], json!(3));
    }

    #[test]
    fn test_crlf_line_endings() {
        let (meta, body) = lenient("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(meta.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_input() {
        let (meta, body) = lenient("---\ntitle: Only\n---");
        assert_eq!(meta.title.as_deref(), Some("Only"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_empty_block() {
        let (meta, body) = lenient("---\n---\nBody");
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_closing_line_must_be_exact() {
        let input = "---\ntitle: A\n--- not a closer\n---\nBody";
        let (meta, body) = lenient(input);
        // The first candidate line is part of the YAML, which makes it invalid
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_scalar_known_fields_are_stringified() {
        let (meta, _) = lenient("---\ntitle: 2024\ndescription: true\n---\n");
        assert_eq!(meta.title.as_deref(), Some("2024"));
        assert_eq!(meta.description.as_deref(), Some("true"));
    }

    #[test]
    fn test_empty_known_field_is_unset() {
        let (meta, _) = lenient("---\ntitle: \"\"\nurl:\n---\n");
        assert!(meta.title.is_none());
        assert!(meta.url.is_none());
    }

    #[test]
    fn test_unterminated_lenient_keeps_whole_input() {
        let input = "---\ntitle: Oops\n\n# Body";
        let (meta, body) = lenient(input);
        assert!(meta.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn test_unterminated_strict_fails() {
        let err = split_front_matter("---\ntitle: Oops\n", MetadataPolicy::Strict).unwrap_err();
        assert!(matches!(err, MetadataError::Unterminated));
    }

    #[test]
    fn test_invalid_yaml_lenient_keeps_body() {
        let (meta, body) = lenient("---\ntitle: [unclosed\n---\nBody");
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_invalid_yaml_strict_fails() {
        let err = split_front_matter("---\ntitle: [unclosed\n---\nBody", MetadataPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, MetadataError::Yaml(_)));
    }

    #[test]
    fn test_non_mapping_block() {
        let (meta, body) = lenient("---\n- a\n- b\n---\nBody");
        assert!(meta.is_empty());
        assert_eq!(body, "Body");

        let err = split_front_matter("---\njust text\n---\n", MetadataPolicy::Strict).unwrap_err();
        assert!(matches!(err, MetadataError::NotAMapping));
    }

    #[test]
    fn test_structured_known_field_strict_fails() {
        let err = split_front_matter("---\ntitle: [a, b]\n---\n", MetadataPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, MetadataError::InvalidField(key) if key == "title"));
    }

    #[test]
    fn test_non_string_key_strict_fails() {
        let err = split_front_matter("---\n1: one\n---\n", MetadataPolicy::Strict).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidKey(key) if key == "1"));
    }

    #[test]
    fn test_keys_round_trip() {
        let input = "---\ntitle: T\ndescription: D\nurl: /u/\nlayout: l\nx: 1\ny: {z: true}\n---\n";
        let (meta, _) = lenient(input);

        let mut keys: Vec<&str> = Vec::new();
        if meta.title.is_some() {
            keys.push("title");
        }
        if meta.description.is_some() {
            keys.push("description");
        }
        if meta.url.is_some() {
            keys.push("url");
        }
        if meta.layout.is_some() {
            keys.push("layout");
        }
        keys.extend(meta.extra.keys().map(String::as_str));
        keys.sort_unstable();

        assert_eq!(keys, vec!["description", "layout", "title", "url", "x", "y"]);
        assert_eq!(meta.extra["y"], json!({"z": true}));
    }
}
