//! Source documents.

use std::path::Path;

use crate::frontmatter::{Metadata, MetadataError, MetadataPolicy, split_front_matter};
use crate::paths::{default_url_path, display_title, normalize_url};

/// Relative path of the site's home page.
pub const ROOT_INDEX: &str = "index.md";

/// A markdown source file with its metadata split off.
///
/// Identity is the `/`-separated path relative to the source directory.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    rel_path: String,
    metadata: Metadata,
    body: String,
}

impl Document {
    #[must_use]
    pub fn new(rel_path: impl Into<String>, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            metadata,
            body: body.into(),
        }
    }

    /// Split front matter from `source` and build a document.
    ///
    /// # Errors
    ///
    /// Returns an error when the front matter is malformed and `policy` is strict.
    pub fn parse(
        rel_path: impl Into<String>,
        source: &str,
        policy: MetadataPolicy,
    ) -> Result<Self, MetadataError> {
        let (metadata, body) = split_front_matter(source, policy)?;
        Ok(Self::new(rel_path, metadata, body))
    }

    /// Path relative to the source directory, e.g. `01-guide/02-agents.md`.
    #[must_use]
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Markdown body without the front matter.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Canonical URL path: the metadata override if set, else derived from the path.
    #[must_use]
    pub fn url(&self) -> String {
        match &self.metadata.url {
            Some(url) => normalize_url(url),
            None => default_url_path(&self.rel_path),
        }
    }

    /// Title from metadata, falling back to one derived from the file name.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.metadata.title {
            Some(title) => title.clone(),
            None => display_title(self.file_name()),
        }
    }

    /// Requested layout variant; `None` selects the base layout.
    #[must_use]
    pub fn layout(&self) -> Option<&str> {
        self.metadata.layout.as_deref()
    }

    /// Whether this is the site's home page (`index.md` at the root).
    #[must_use]
    pub fn is_root_index(&self) -> bool {
        self.rel_path == ROOT_INDEX
    }

    /// First path segment for documents inside a directory.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.rel_path.split_once('/').map(|(first, _)| first)
    }

    fn file_name(&self) -> &str {
        Path::new(&self.rel_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.rel_path)
    }
}
