//! Static site builder.
//!
//! One build reads the whole source directory and writes every page:
//!
//! 1. Load documents and build the navigation ([`Site`]).
//! 2. Load the shortcode registry and the layout set.
//! 3. Check URLs and layout variants of every document.
//! 4. Render pages in parallel and write `<output>/<url>/index.html`.
//! 5. Copy `_static/` to `<output>/_static/`.
//!
//! The first failure aborts the build. Pages already written stay on disk.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use moat_config::{Config, HighlightConfig, LinkConfig};
use moat_renderer::MarkdownRenderer;
use moat_renderer::shortcode::{ShortcodeEngine, ShortcodeError};
use moat_site::{Document, MetadataPolicy, Site, SiteError, render_navigation};
use rayon::prelude::*;

use crate::context::{LayoutContext, PageContext};
use crate::defaults::variant_file_name;
use crate::layout::LayoutSet;
use crate::shortcodes::TemplateRegistry;
use crate::template::TemplateError;

/// Directory copied verbatim into the output.
pub const STATIC_DIR: &str = "_static";

/// Settings for one build, derived from [`Config`].
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub site_name: String,
    /// URL prefix without trailing slash; empty for sites at the domain root.
    pub base_path: String,
    pub highlight: HighlightConfig,
    pub links: Vec<LinkConfig>,
    /// Site-wide template values (`site` in templates).
    pub site: BTreeMap<String, serde_json::Value>,
    pub metadata_policy: MetadataPolicy,
    /// Fall back to the built-in layouts when the source has none.
    pub builtin_layouts: bool,
}

impl BuildConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let metadata_policy = if config.metadata.strict {
            MetadataPolicy::Strict
        } else {
            MetadataPolicy::Lenient
        };
        Self {
            site_name: config.site_name.clone(),
            base_path: config.base_path.clone(),
            highlight: config.highlight.clone(),
            links: config.links.clone(),
            site: config.extra.clone(),
            metadata_policy,
            builtin_layouts: true,
        }
    }

    #[must_use]
    pub fn with_builtin_layouts(mut self, enabled: bool) -> Self {
        self.builtin_layouts = enabled;
        self
    }

    #[must_use]
    pub fn with_metadata_policy(mut self, policy: MetadataPolicy) -> Self {
        self.metadata_policy = policy;
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{path}: {source}")]
    Shortcode {
        path: String,
        #[source]
        source: ShortcodeError,
    },

    #[error("{path}: {source}")]
    Layout {
        path: String,
        #[source]
        source: TemplateError,
    },

    #[error("{path}: layout {} not found", variant_file_name(.variant))]
    UnknownVariant { path: String, variant: String },

    #[error("{second}: URL {url} is already used by {first}")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },

    #[error("{path}: invalid URL {url:?}")]
    InvalidUrl { path: String, url: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub static_files: usize,
    pub output_dir: PathBuf,
}

/// A document with its resolved URL and output file.
struct PlannedPage<'a> {
    document: &'a Document,
    url: String,
    output: PathBuf,
}

/// Inputs shared read-only by every page render.
struct SharedInputs<'a> {
    site: &'a Site,
    layouts: &'a LayoutSet,
    shortcodes: &'a TemplateRegistry,
}

/// Builds a static site from a source directory.
pub struct StaticSiteBuilder {
    source_dir: PathBuf,
    output_dir: PathBuf,
    config: BuildConfig,
}

impl StaticSiteBuilder {
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, config: BuildConfig) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Run the build.
    ///
    /// # Errors
    ///
    /// Returns the first error from loading, validating, rendering or writing.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let site = Site::load(&self.source_dir, self.config.metadata_policy)?;
        let shortcodes = TemplateRegistry::load(&self.source_dir)?;
        let layouts = LayoutSet::load(&self.source_dir, self.config.builtin_layouts)?;

        let pages = self.plan(site.documents(), &layouts)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| BuildError::io(&self.output_dir, e))?;

        let inputs = SharedInputs {
            site: &site,
            layouts: &layouts,
            shortcodes: &shortcodes,
        };
        pages
            .par_iter()
            .try_for_each(|page| self.render_page(&inputs, page))?;

        let static_files = copy_static(
            &self.source_dir.join(STATIC_DIR),
            &self.output_dir.join(STATIC_DIR),
        )?;

        tracing::info!(
            pages = pages.len(),
            static_files,
            output = %self.output_dir.display(),
            "Built site"
        );

        Ok(BuildReport {
            pages: pages.len(),
            static_files,
            output_dir: self.output_dir.clone(),
        })
    }

    /// Resolve URLs and check variants before anything is rendered.
    fn plan<'a>(
        &self,
        documents: &'a [Document],
        layouts: &LayoutSet,
    ) -> Result<Vec<PlannedPage<'a>>, BuildError> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(documents.len());
        let mut pages = Vec::with_capacity(documents.len());

        for document in documents {
            if let Some(variant) = document.layout()
                && !layouts.contains(variant)
            {
                return Err(BuildError::UnknownVariant {
                    path: document.rel_path().to_owned(),
                    variant: variant.to_owned(),
                });
            }

            let url = document.url();
            let output = output_path(&self.output_dir, &url).ok_or_else(|| BuildError::InvalidUrl {
                path: document.rel_path().to_owned(),
                url: url.clone(),
            })?;

            if let Some(first) = seen.insert(url.clone(), document.rel_path()) {
                return Err(BuildError::DuplicateUrl {
                    url,
                    first: first.to_owned(),
                    second: document.rel_path().to_owned(),
                });
            }

            pages.push(PlannedPage {
                document,
                url,
                output,
            });
        }

        Ok(pages)
    }

    fn render_page(&self, inputs: &SharedInputs<'_>, page: &PlannedPage<'_>) -> Result<(), BuildError> {
        let document = page.document;
        let path = document.rel_path();
        let config = &self.config;

        let page_ctx = PageContext {
            title: document.title(),
            description: document.metadata().description.clone().unwrap_or_default(),
            current_path: format!("{}{}", config.base_path, page.url),
            site_name: config.site_name.clone(),
            base_path: config.base_path.clone(),
            extra: document.metadata().extra.clone(),
            site: config.site.clone(),
        };

        let body = ShortcodeEngine::new(inputs.shortcodes)
            .expand(document.body(), &page_ctx)
            .map_err(|source| BuildError::Shortcode {
                path: path.to_owned(),
                source,
            })?;
        let rendered = MarkdownRenderer::new().render_markdown(&body);
        let nav = render_navigation(
            inputs.site.navigation(),
            &page_ctx.current_path,
            &config.base_path,
        );

        let ctx = LayoutContext::new(
            &page_ctx,
            rendered.html,
            nav,
            &config.links,
            &config.highlight,
            &rendered.toc,
        );
        let html = inputs
            .layouts
            .render(document.layout(), &ctx)
            .map_err(|source| BuildError::Layout {
                path: path.to_owned(),
                source,
            })?;

        if let Some(parent) = page.output.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&page.output, html).map_err(|e| BuildError::io(&page.output, e))?;

        tracing::debug!(path, url = %page.url, "Rendered page");
        Ok(())
    }
}

/// Output file for a URL: `/` maps to `index.html`, `/a/b/` to `a/b/index.html`.
///
/// Returns `None` for URLs with `.` or `..` segments or backslashes.
fn output_path(output_dir: &Path, url: &str) -> Option<PathBuf> {
    let mut path = output_dir.to_path_buf();
    for segment in url.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        path.push(segment);
    }
    path.push("index.html");
    Some(path)
}

/// Copy `src` recursively into `dst`, returning the number of files copied.
///
/// A missing `src` copies nothing.
fn copy_static(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    if !src.is_dir() {
        return Ok(0);
    }
    fs::create_dir_all(dst).map_err(|e| BuildError::io(dst, e))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(|e| BuildError::io(src, e))? {
        let entry = entry.map_err(|e| BuildError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copied += copy_static(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| BuildError::io(&to, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
