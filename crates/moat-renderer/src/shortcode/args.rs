//! Shortcode argument parsing.
//!
//! Parses the ` key="value" key2="value2"` list that follows a shortcode name.

use std::collections::BTreeMap;

use serde::Serialize;

use super::parser::{is_name_char, skip_whitespace};

/// Named arguments of a shortcode invocation.
///
/// Values are always the raw text between double quotes. Repeated keys keep
/// the last value.
///
/// # Example
///
/// ```
/// use moat_renderer::shortcode::ShortcodeArgs;
///
/// let args = ShortcodeArgs::from_pairs([("type", "info"), ("type", "warning")]);
/// assert_eq!(args.get("type"), Some("warning"));
/// assert_eq!(args.get("missing"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShortcodeArgs(BTreeMap<String, String>);

impl ShortcodeArgs {
    /// Build arguments from key-value pairs; later pairs overwrite earlier ones.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Get an argument value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over arguments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Parse `(ws+ key="value")*` from the start of `input`.
///
/// Returns the arguments and the number of bytes consumed. Trailing
/// whitespace after the last pair is not consumed. Returns `None` when a pair
/// is started but malformed, so the whole tag is treated as literal text.
pub(crate) fn parse_args(input: &str) -> Option<(ShortcodeArgs, usize)> {
    let bytes = input.as_bytes();
    let mut args = BTreeMap::new();
    let mut pos = 0;

    loop {
        let key_start = skip_whitespace(bytes, pos);
        if key_start == pos {
            // Pairs must be separated from what precedes them by whitespace
            break;
        }

        let key_end = key_start
            + bytes[key_start..]
                .iter()
                .take_while(|&&b| is_name_char(b))
                .count();
        if key_end == key_start {
            // Only whitespace follows; leave it for the terminator
            break;
        }

        if !bytes[key_end..].starts_with(b"=\"") {
            return None;
        }
        let value_start = key_end + 2;
        let value_len = bytes[value_start..].iter().position(|&b| b == b'"')?;
        let value_end = value_start + value_len;

        args.insert(
            input[key_start..key_end].to_owned(),
            input[value_start..value_end].to_owned(),
        );
        pos = value_end + 1;
    }

    Some((ShortcodeArgs(args), pos))
}
