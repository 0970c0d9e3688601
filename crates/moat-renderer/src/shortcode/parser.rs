//! Shortcode tag scanning.
//!
//! Recognizes `{{< name key="v" >}}`, `{{< name key="v" />}}` and
//! `{{< /name >}}`. Anything starting with `{{<` that does not fit one of these
//! shapes is not a tag and stays in the text verbatim.

use super::ShortcodeArgs;
use super::args::parse_args;

const TAG_OPEN: &str = "{{<";
const TAG_CLOSE: &[u8] = b">}}";
const TAG_SELF_CLOSE: &[u8] = b"/>}}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// `{{< name >}}`
    Open,
    /// `{{< name />}}`
    SelfClosing,
    /// `{{< /name >}}`
    Close,
}

/// A tag located in the source text.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Tag<'a> {
    pub kind: TagKind,
    pub name: &'a str,
    pub args: ShortcodeArgs,
    /// Byte offset of `{{<`.
    pub start: usize,
    /// Byte offset just past `>}}`.
    pub end: usize,
}

pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

pub(crate) fn skip_whitespace(bytes: &[u8], pos: usize) -> usize {
    pos + bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Find the first tag at or after `from` accepted by `accept`.
pub(crate) fn find_tag<'a>(
    text: &'a str,
    from: usize,
    accept: impl Fn(&Tag<'a>) -> bool,
) -> Option<Tag<'a>> {
    text[from..]
        .match_indices(TAG_OPEN)
        .filter_map(|(offset, _)| parse_tag_at(text, from + offset))
        .find(|tag| accept(tag))
}

/// Parse a tag whose `{{<` starts at byte `start`.
fn parse_tag_at(text: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = text.as_bytes();
    let mut pos = skip_whitespace(bytes, start + TAG_OPEN.len());

    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }

    let name_start = pos;
    pos += bytes[pos..].iter().take_while(|&&b| is_name_char(b)).count();
    if pos == name_start {
        return None;
    }
    let name = &text[name_start..pos];

    if closing {
        pos = skip_whitespace(bytes, pos);
        if !bytes[pos..].starts_with(TAG_CLOSE) {
            return None;
        }
        return Some(Tag {
            kind: TagKind::Close,
            name,
            args: ShortcodeArgs::default(),
            start,
            end: pos + TAG_CLOSE.len(),
        });
    }

    let (args, consumed) = parse_args(&text[pos..])?;
    pos = skip_whitespace(bytes, pos + consumed);

    let rest = &bytes[pos..];
    let (kind, terminator) = if rest.starts_with(TAG_SELF_CLOSE) {
        (TagKind::SelfClosing, TAG_SELF_CLOSE.len())
    } else if rest.starts_with(TAG_CLOSE) {
        (TagKind::Open, TAG_CLOSE.len())
    } else {
        return None;
    };

    Some(Tag {
        kind,
        name,
        args,
        start,
        end: pos + terminator,
    })
}
