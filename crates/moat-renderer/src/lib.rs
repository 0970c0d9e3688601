//! Markdown rendering and shortcode expansion for moat.
//!
//! [`MarkdownRenderer`] turns `CommonMark` with GitHub extensions into HTML,
//! assigning stable heading anchors and collecting a table of contents.
//! The [`shortcode`] module expands `{{< name >}}` calls before rendering.
//!
//! # Example
//!
//! ```
//! use moat_renderer::render_markdown;
//!
//! let result = render_markdown("# Guide\n\n## Install\n\nSee https://example.com");
//! assert_eq!(result.title.as_deref(), Some("Guide"));
//! assert_eq!(result.toc[0].id, "install");
//! assert!(result.html.contains(r#"<a href="https://example.com">"#));
//! ```

mod renderer;
pub mod shortcode;
mod state;
mod util;

pub use renderer::{MarkdownRenderer, RenderResult, render_markdown};
pub use state::{TocEntry, escape_html, slugify};
