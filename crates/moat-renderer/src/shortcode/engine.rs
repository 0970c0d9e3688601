//! Two-pass shortcode expansion.

use super::parser::{Tag, TagKind, find_tag};
use super::{ShortcodeCall, ShortcodeError, ShortcodeRegistry};
use crate::MarkdownRenderer;

/// Upper bound on block calls expanded in one text, so a template that emits
/// its own call fails instead of looping.
const MAX_BLOCK_EXPANSIONS: usize = 10_000;

/// Expands shortcode calls in markdown source against a registry.
///
/// The engine holds no per-page state; one instance can expand any number of
/// documents, and the input is never modified in place.
pub struct ShortcodeEngine<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R> ShortcodeEngine<'r, R>
where
    R: ShortcodeRegistry + ?Sized,
{
    #[must_use]
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Expand every shortcode in `body`.
    ///
    /// With an empty registry the body is returned unchanged, tags included.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown name, unclosed top-level block, template
    /// error, or block template that keeps emitting new blocks.
    /// No partial output is returned.
    pub fn expand(&self, body: &str, ctx: &R::Context) -> Result<String, ShortcodeError> {
        if self.registry.is_empty() {
            return Ok(body.to_owned());
        }

        let expanded = self.expand_self_closing(body, ctx)?;
        self.expand_blocks(&expanded, ctx, false)
    }

    fn expand_self_closing(&self, text: &str, ctx: &R::Context) -> Result<String, ShortcodeError> {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while let Some(tag) = find_tag(text, pos, |t| t.kind == TagKind::SelfClosing) {
            out.push_str(&text[pos..tag.start]);
            out.push_str(&self.call(&tag, None, ctx)?);
            pos = tag.end;
        }

        out.push_str(&text[pos..]);
        Ok(out)
    }

    /// Expand block calls, rescanning from each spliced template output.
    ///
    /// At the top level an opener without a matching closer is an error.
    /// Inside a block body it is left as literal text: the nearest closer
    /// already belongs to the enclosing call.
    fn expand_blocks(
        &self,
        text: &str,
        ctx: &R::Context,
        nested: bool,
    ) -> Result<String, ShortcodeError> {
        let mut text = text.to_owned();
        let mut pos = 0;
        let mut expansions = 0;

        while let Some(open) = find_tag(&text, pos, |t| t.kind == TagKind::Open) {
            let Some(close) = find_tag(&text, open.end, |t| {
                t.kind == TagKind::Close && t.name == open.name
            }) else {
                if nested {
                    pos = open.end;
                    continue;
                }
                return Err(ShortcodeError::Unclosed(open.name.to_owned()));
            };

            expansions += 1;
            if expansions > MAX_BLOCK_EXPANSIONS {
                return Err(ShortcodeError::Runaway(open.name.to_owned()));
            }

            let inner = self.expand_blocks(&text[open.end..close.start], ctx, true)?;
            let inner_html = MarkdownRenderer::new().render_markdown(&inner).html;
            let output = self.call(&open, Some(&inner_html), ctx)?;

            let call_span = open.start..close.end;
            pos = call_span.start;
            text.replace_range(call_span, &output);
        }

        Ok(text)
    }

    fn call(
        &self,
        tag: &Tag<'_>,
        inner: Option<&str>,
        ctx: &R::Context,
    ) -> Result<String, ShortcodeError> {
        if !self.registry.contains(tag.name) {
            return Err(ShortcodeError::Unknown(tag.name.to_owned()));
        }

        tracing::debug!(shortcode = tag.name, block = inner.is_some(), "Expanding shortcode");

        let call = ShortcodeCall {
            name: tag.name,
            args: &tag.args,
            inner,
        };
        self.registry
            .render(&call, ctx)
            .map_err(|e| ShortcodeError::Template {
                name: tag.name.to_owned(),
                source: Box::new(e),
            })
    }
}
