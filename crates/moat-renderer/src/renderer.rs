//! Markdown to HTML renderer built on pulldown-cmark events.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::state::{CodeCapture, Headings, ImageCapture, TableLayout, TocEntry, escape_html};
use crate::util::{escape_with_autolinks, heading_level_to_num};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 heading, if any.
    pub title: Option<String>,
    /// Table of contents entries (every heading except the title).
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer producing HTML5.
///
/// Raw HTML in the source is passed through untouched. Headings receive
/// deterministic slug IDs, fenced code blocks carry a `language-*` class for
/// client-side or stylesheet-driven highlighting, and bare URLs are autolinked.
///
/// # Example
///
/// ```
/// use moat_renderer::MarkdownRenderer;
///
/// let result = MarkdownRenderer::new().render_markdown("# Hello\n\n~~old~~ new");
/// assert!(result.html.contains(r#"<h1 id="hello">Hello</h1>"#));
/// assert!(result.html.contains("<del>old</del>"));
/// assert_eq!(result.title.as_deref(), Some("Hello"));
/// ```
pub struct MarkdownRenderer {
    output: String,
    code: CodeCapture,
    table: TableLayout,
    image: ImageCapture,
    headings: Headings,
    /// Nesting depth of links; autolinking is disabled inside links.
    link_depth: usize,
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM extensions enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeCapture::default(),
            table: TableLayout::default(),
            image: ImageCapture::default(),
            headings: Headings::default(),
            link_depth: 0,
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Autolinked bare URLs
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Render markdown text using the configured parser options.
    pub fn render_markdown(mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, self.parser_options());
        for event in TextMergeStream::new(parser) {
            self.process_event(event);
        }

        let (title, toc) = self.headings.into_outline();
        RenderResult {
            html: self.output,
            title,
            toc,
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_capturing() {
            // Alt text is plain; inline markup inside it is dropped
            return;
        }
        if self.headings.is_open() {
            self.headings.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>\n"),
            Event::Rule => self.output.push_str("<hr>\n"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                let _ = write!(
                    self.output,
                    r#"<input type="checkbox" disabled{checked}> "#
                );
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in parser options
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the ID is known
                self.headings.open(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned)
                        .filter(|lang| !lang.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code.begin(lang);
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>\n"),
            Tag::List(Some(start)) => {
                let _ = writeln!(self.output, r#"<ol start="{start}">"#);
            }
            Tag::List(None) => self.output.push_str("<ul>\n"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.begin(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.begin_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.begin_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let _ = write!(
                    self.output,
                    "<{}{}>",
                    self.table.cell_tag(),
                    self.table.cell_style()
                );
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.link_depth += 1;
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_html(&title))
                };
                let link_tag = format!(r#"<a href="{}"{title_attr}>"#, escape_html(&dest_url));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the matching end tag
                self.image.begin(dest_url.into_string(), title.into_string());
            }
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.headings.close() {
                    let _ = writeln!(
                        self.output,
                        r#"<h{level} id="{id}">{html}</h{level}>"#,
                        level = heading.level,
                        id = heading.id,
                        html = heading.html.trim()
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let Some(block) = self.code.finish() else {
                    return;
                };
                let class = block
                    .language
                    .map(|lang| format!(r#" class="language-{}""#, escape_html(&lang)))
                    .unwrap_or_default();
                let _ = writeln!(
                    self.output,
                    "<pre><code{class}>{}</code></pre>",
                    escape_html(&block.source)
                );
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::Table => self.output.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                let _ = write!(self.output, "</{}>", self.table.cell_tag());
                self.table.next_column();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.push_inline("</a>");
            }
            TagEnd::Image => {
                if let Some(image) = self.image.finish() {
                    let title_attr = if image.title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&image.title))
                    };
                    let img = format!(
                        r#"<img src="{}" alt="{}"{title_attr}>"#,
                        escape_html(&image.src),
                        escape_html(&image.alt)
                    );
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.capture(text) || self.image.capture(text) {
            return;
        }

        let html = if self.gfm && self.link_depth == 0 {
            escape_with_autolinks(text)
        } else {
            escape_html(text)
        };

        if self.headings.is_open() {
            self.headings.push_text(text);
            self.headings.push_html(&html);
        } else {
            self.output.push_str(&html);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.capture(code) {
            return;
        }
        self.headings.push_text(code);
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }

    fn soft_break(&mut self) {
        if self.image.capture(" ") {
            return;
        }
        if self.headings.is_open() {
            self.headings.push_text(" ");
            self.headings.push_html("\n");
        } else {
            self.output.push('\n');
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render markdown with the default GFM configuration.
///
/// Shorthand for `MarkdownRenderer::new().render_markdown(markdown)`.
#[must_use]
pub fn render_markdown(markdown: &str) -> RenderResult {
    MarkdownRenderer::new().render_markdown(markdown)
}
