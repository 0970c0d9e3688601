//! Documents, URL rules and navigation for moat sites.
//!
//! This crate provides:
//! - [`split_front_matter`]: metadata/body splitting under a [`MetadataPolicy`]
//! - Path rules: [`default_url_path`], [`display_title`], [`normalize_url`]
//! - [`Scanner`]: markdown discovery in a source directory
//! - [`build_navigation`] / [`render_navigation`]: sidebar tree and markup
//! - [`Site`]: all documents of a source directory plus their navigation
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use moat_site::{MetadataPolicy, Site, render_navigation};
//!
//! let site = Site::load("docs", MetadataPolicy::Lenient)?;
//! for doc in site.documents() {
//!     println!("{} -> {}", doc.rel_path(), doc.url());
//! }
//! let sidebar = render_navigation(site.navigation(), "/", "");
//! # Ok(())
//! # }
//! ```

mod document;
mod frontmatter;
mod navigation;
mod paths;
mod scanner;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use document::{Document, ROOT_INDEX};
pub use frontmatter::{Metadata, MetadataError, MetadataPolicy, split_front_matter};
pub use navigation::{NavNode, build_navigation, render_navigation};
pub use paths::{default_url_path, display_title, normalize_url, strip_order_prefix};
pub use scanner::{Scanner, SourceFile, is_ignored};

/// Error loading a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: MetadataError,
    },
}

impl SiteError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// All documents of a source directory and the navigation built from them.
///
/// Loaded once per build and read-only afterwards.
#[derive(Debug)]
pub struct Site {
    source_dir: PathBuf,
    documents: Vec<Document>,
    navigation: Vec<NavNode>,
}

impl Site {
    /// Scan `source_dir`, split every document's front matter and build the
    /// navigation.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read, a file cannot be
    /// read as UTF-8, or front matter is malformed under a strict policy.
    pub fn load(source_dir: impl Into<PathBuf>, policy: MetadataPolicy) -> Result<Self, SiteError> {
        let source_dir = source_dir.into();
        let files = Scanner::new(&source_dir).scan()?;

        let documents = files
            .into_iter()
            .map(|file| {
                let source = fs::read_to_string(&file.path).map_err(|e| SiteError::io(&file.path, e))?;
                Document::parse(&file.rel_path, &source, policy).map_err(|source| {
                    SiteError::Metadata {
                        path: file.rel_path.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(documents = documents.len(), source = %source_dir.display(), "Loaded site");
        Ok(Self::from_documents(source_dir, documents))
    }

    /// Build a site from already parsed documents.
    #[must_use]
    pub fn from_documents(source_dir: impl Into<PathBuf>, documents: Vec<Document>) -> Self {
        let navigation = build_navigation(&documents);
        Self {
            source_dir: source_dir.into(),
            documents,
            navigation,
        }
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Documents in relative path order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn navigation(&self) -> &[NavNode] {
        &self.navigation
    }
}
