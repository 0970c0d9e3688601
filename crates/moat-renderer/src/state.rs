//! Per-render state tracked while walking pulldown-cmark events.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;
use serde::Serialize;

/// A fenced or indented code block being read.
pub(crate) struct CodeBlock {
    pub language: Option<String>,
    pub source: String,
}

/// Collects the source of the open code block, if any.
#[derive(Default)]
pub(crate) struct CodeCapture(Option<CodeBlock>);

impl CodeCapture {
    pub fn begin(&mut self, language: Option<String>) {
        self.0 = Some(CodeBlock {
            language,
            source: String::new(),
        });
    }

    pub fn finish(&mut self) -> Option<CodeBlock> {
        self.0.take()
    }

    /// Append `text` to the open block. Returns `false` when no block is open.
    pub fn capture(&mut self, text: &str) -> bool {
        match &mut self.0 {
            Some(block) => {
                block.source.push_str(text);
                true
            }
            None => false,
        }
    }
}

/// An image whose alt text is still being read.
pub(crate) struct PendingImage {
    pub src: String,
    pub title: String,
    pub alt: String,
}

/// Collects plain alt text between an image's start and end events.
#[derive(Default)]
pub(crate) struct ImageCapture(Option<PendingImage>);

impl ImageCapture {
    pub fn begin(&mut self, src: String, title: String) {
        self.0 = Some(PendingImage {
            src,
            title,
            alt: String::new(),
        });
    }

    pub fn is_capturing(&self) -> bool {
        self.0.is_some()
    }

    /// Append `text` to the alt text. Returns `false` outside an image.
    pub fn capture(&mut self, text: &str) -> bool {
        match &mut self.0 {
            Some(image) => {
                image.alt.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn finish(&mut self) -> Option<PendingImage> {
        self.0.take()
    }
}

/// Column alignments and position inside the current table.
#[derive(Default)]
pub(crate) struct TableLayout {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl TableLayout {
    pub fn begin(&mut self, alignments: Vec<Alignment>) {
        *self = Self {
            alignments,
            ..Self::default()
        };
    }

    pub fn begin_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn begin_row(&mut self) {
        self.column = 0;
    }

    pub fn next_column(&mut self) {
        self.column += 1;
    }

    pub fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    /// `style` attribute for the current cell, with a leading space.
    pub fn cell_style(&self) -> &'static str {
        match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    pub title: String,
    /// Anchor ID of the rendered heading.
    pub id: String,
}

/// Heading closed by [`Headings::close`], ready to be written.
pub(crate) struct RenderedHeading {
    pub level: u8,
    pub id: String,
    pub html: String,
}

struct OpenHeading {
    level: u8,
    /// Plain text, used for the slug and the table of contents.
    text: String,
    /// Inner HTML with inline formatting.
    html: String,
}

/// Unique anchor IDs within one document.
#[derive(Default)]
struct AnchorIds {
    issued: HashSet<String>,
    /// Next suffix to try per slug.
    next_suffix: HashMap<String, usize>,
}

impl AnchorIds {
    /// Repeated slugs get `-1`, `-2`, ... suffixes in document order, skipping
    /// any ID already taken by an earlier heading.
    fn assign(&mut self, text: &str) -> String {
        let slug = match slugify(text) {
            slug if slug.is_empty() => "heading".to_owned(),
            slug => slug,
        };

        let mut id = slug.clone();
        if self.issued.contains(&id) {
            let suffix = self.next_suffix.entry(slug.clone()).or_insert(1);
            while self.issued.contains(&id) {
                id = format!("{slug}-{suffix}");
                *suffix += 1;
            }
        }
        self.issued.insert(id.clone());
        id
    }
}

/// Heading anchors, the document title and the table of contents.
///
/// The first H1 becomes the title and stays out of the table of contents;
/// it is still rendered.
#[derive(Default)]
pub(crate) struct Headings {
    open: Option<OpenHeading>,
    ids: AnchorIds,
    title: Option<String>,
    toc: Vec<TocEntry>,
}

impl Headings {
    pub fn open(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn push_text(&mut self, text: &str) {
        if let Some(heading) = &mut self.open {
            heading.text.push_str(text);
        }
    }

    pub fn push_html(&mut self, html: &str) {
        if let Some(heading) = &mut self.open {
            heading.html.push_str(html);
        }
    }

    pub fn close(&mut self) -> Option<RenderedHeading> {
        let OpenHeading { level, text, html } = self.open.take()?;
        let title = text.trim().to_owned();
        let id = self.ids.assign(&title);

        if level == 1 && self.title.is_none() {
            self.title = Some(title);
        } else {
            self.toc.push(TocEntry {
                level,
                title,
                id: id.clone(),
            });
        }

        Some(RenderedHeading { level, id, html })
    }

    /// Title and table of contents collected so far.
    pub fn into_outline(self) -> (Option<String>, Vec<TocEntry>) {
        (self.title, self.toc)
    }
}

/// Convert heading text to an anchor slug.
///
/// Letters and digits are lowercased and kept; runs of whitespace, `-` and
/// `_` become a single `-`; everything else is dropped.
///
/// ```
/// assert_eq!(moat_renderer::slugify("What's New?"), "whats-new");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            separator = true;
        }
    }

    slug
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;

    for (i, byte) in s.bytes().enumerate() {
        let entity = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#x27;",
            _ => continue,
        };
        out.push_str(&s[copied..i]);
        out.push_str(entity);
        copied = i + 1;
    }

    out.push_str(&s[copied..]);
    out
}
