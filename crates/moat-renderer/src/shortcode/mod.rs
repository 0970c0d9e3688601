//! Shortcode expansion for markdown sources.
//!
//! Shortcodes are macro calls embedded in markdown and expanded before the
//! markdown is rendered:
//!
//! - **Self-closing**: `{{< name key="value" />}}`
//! - **Block**: `{{< name key="value" >}}` ... `{{< /name >}}`
//!
//! Templates are supplied by a [`ShortcodeRegistry`]; the engine only knows how
//! to find calls and hand them over.
//!
//! # Expansion order
//!
//! 1. Every self-closing call is replaced in one left-to-right pass.
//! 2. Block calls are expanded from the first opening tag onwards. A block is
//!    closed by the nearest closing tag with the same name; tags of other names
//!    are not balanced against each other, so interleaved spans such as
//!    `{{< a >}} {{< b >}} {{< /a >}} {{< /b >}}` are not supported. The body
//!    of a block is expanded recursively and then rendered as markdown before
//!    it reaches the template as `inner`. Inside a body, an opener whose closer
//!    lies beyond the body stays literal.
//!
//! Output of self-closing templates goes through the block pass. Output of a
//! block template is spliced in and scanned again from where the call began,
//! so blocks it emits are expanded too; self-closing tags it emits stay literal.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//! use moat_renderer::shortcode::{ShortcodeCall, ShortcodeEngine, ShortcodeRegistry};
//!
//! struct Kbd;
//!
//! impl ShortcodeRegistry for Kbd {
//!     type Context = ();
//!     type Error = Infallible;
//!
//!     fn contains(&self, name: &str) -> bool {
//!         name == "kbd"
//!     }
//!
//!     fn is_empty(&self) -> bool {
//!         false
//!     }
//!
//!     fn render(&self, call: &ShortcodeCall<'_>, _ctx: &()) -> Result<String, Infallible> {
//!         Ok(format!("<kbd>{}</kbd>", call.args.get("keys").unwrap_or_default()))
//!     }
//! }
//!
//! let output = ShortcodeEngine::new(&Kbd)
//!     .expand(r#"Press {{< kbd keys="Ctrl+C" />}} to copy."#, &())
//!     .unwrap();
//! assert_eq!(output, "Press <kbd>Ctrl+C</kbd> to copy.");
//! ```

mod args;
mod engine;
mod parser;

pub use args::ShortcodeArgs;
pub use engine::ShortcodeEngine;

/// A single shortcode invocation passed to the registry.
#[derive(Debug)]
pub struct ShortcodeCall<'a> {
    /// Shortcode name.
    pub name: &'a str,
    /// Parsed `key="value"` arguments.
    pub args: &'a ShortcodeArgs,
    /// Rendered HTML of the block body; `None` for self-closing calls.
    pub inner: Option<&'a str>,
}

/// Source of shortcode templates.
///
/// Implementations are built once per site and shared read-only between pages.
pub trait ShortcodeRegistry {
    /// Per-page data made available to templates.
    type Context: ?Sized;
    /// Template execution error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether a shortcode with this name is registered.
    fn contains(&self, name: &str) -> bool;

    /// Whether no shortcodes are registered at all.
    fn is_empty(&self) -> bool;

    /// Execute the named template for one call.
    ///
    /// Only called for names where [`contains`](Self::contains) is true.
    ///
    /// # Errors
    ///
    /// Returns the registry's error when template execution fails.
    fn render(&self, call: &ShortcodeCall<'_>, ctx: &Self::Context) -> Result<String, Self::Error>;
}

/// Error raised while expanding shortcodes.
#[derive(Debug, thiserror::Error)]
pub enum ShortcodeError {
    /// A call referenced a name that is not registered.
    #[error("unknown shortcode: {0}")]
    Unknown(String),
    /// A block opening tag had no closing tag with the same name.
    #[error("shortcode \"{0}\" opened but never closed")]
    Unclosed(String),
    /// Block templates kept producing new block calls.
    #[error("shortcode {0} expands without end")]
    Runaway(String),
    /// The shortcode template failed.
    #[error("executing shortcode {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ShortcodeError {
    /// Name of the shortcode the error refers to.
    #[must_use]
    pub fn shortcode_name(&self) -> &str {
        match self {
            Self::Unknown(name)
            | Self::Unclosed(name)
            | Self::Runaway(name)
            | Self::Template { name, .. } => name,
        }
    }
}
