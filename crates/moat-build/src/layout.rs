//! Layout loading with block-override variants.
//!
//! `_layout.html` is the base layout; its `{% block %}` tags are the extension
//! points. A variant `_layout.<name>.html` is a set of block overrides: every
//! top-level block it defines replaces the base block of the same name, and
//! all other blocks keep the base content.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;

use crate::blocks::{BlockScan, scan_blocks};
use crate::defaults::{
    BASE_LAYOUT, BASE_LAYOUT_SOURCE, BUILTIN_VARIANTS, variant_file_name, variant_from_file_name,
};
use crate::template::{TemplateError, new_environment};

/// Where a layout source came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutOrigin {
    /// A file in the source directory.
    Source,
    /// Compiled into the binary.
    Builtin,
}

/// A layout variant stored as block overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutVariant {
    pub name: String,
    /// Replacement body per block name.
    pub overrides: BTreeMap<String, String>,
    pub origin: LayoutOrigin,
}

/// The base layout and every resolved variant, compiled once per build.
///
/// Read-only after loading; safe to share across render threads.
pub struct LayoutSet {
    env: Environment<'static>,
    base_origin: LayoutOrigin,
    /// Block names declared anywhere in the base layout.
    declared: BTreeSet<String>,
    variants: BTreeMap<String, LayoutVariant>,
}

impl LayoutSet {
    /// Load layouts from `source_dir`.
    ///
    /// Source files win over built-ins. With `builtins` enabled, the built-in
    /// base and variants fill whatever the source directory does not provide;
    /// without it, a missing `_layout.html` is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout cannot be read or parsed, or the base is missing.
    pub fn load(source_dir: &Path, builtins: bool) -> Result<Self, TemplateError> {
        let base_path = source_dir.join(BASE_LAYOUT);
        let (base, base_origin) = match fs::read_to_string(&base_path) {
            Ok(source) => (source, LayoutOrigin::Source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if !builtins {
                    return Err(TemplateError::MissingBase(source_dir.to_path_buf()));
                }
                tracing::info!("Using built-in layout (create _layout.html to customize)");
                (BASE_LAYOUT_SOURCE.to_owned(), LayoutOrigin::Builtin)
            }
            Err(source) => {
                return Err(TemplateError::Io {
                    path: base_path,
                    source,
                });
            }
        };

        let mut variants = read_source_variants(source_dir)?;
        if builtins {
            for (name, source) in BUILTIN_VARIANTS {
                if !variants.iter().any(|(n, _, _)| n == name) {
                    variants.push(((*name).to_owned(), (*source).to_owned(), LayoutOrigin::Builtin));
                }
            }
        }

        let mut set = Self::from_base(base, base_origin)?;
        for (name, source, origin) in variants {
            set.add_variant(&name, &source, origin)?;
        }
        Ok(set)
    }

    /// Create a set holding only the base layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base layout does not parse.
    pub fn from_base(source: String, origin: LayoutOrigin) -> Result<Self, TemplateError> {
        let declared = scan(BASE_LAYOUT, &source)?.declared;

        let mut env = new_environment();
        env.add_template_owned(BASE_LAYOUT, source)
            .map_err(|e| syntax_error(BASE_LAYOUT, e))?;

        Ok(Self {
            env,
            base_origin: origin,
            declared,
            variants: BTreeMap::new(),
        })
    }

    /// Resolve a variant against the base and register it.
    ///
    /// Overrides for blocks the base does not declare, and content outside
    /// blocks, are ignored with a warning. Adding a name twice replaces the
    /// earlier variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the variant's blocks do not pair up or the resolved
    /// template does not parse.
    pub fn add_variant(
        &mut self,
        name: &str,
        source: &str,
        origin: LayoutOrigin,
    ) -> Result<(), TemplateError> {
        let file = variant_file_name(name);
        let scan = scan(&file, source)?;
        if scan.has_stray_content {
            tracing::warn!(file = %file, "Ignoring content outside blocks in layout variant");
        }

        let overrides: BTreeMap<String, String> = scan
            .top_level
            .into_iter()
            .filter(|(block, _)| {
                let known = self.declared.contains(block);
                if !known {
                    tracing::warn!(file = %file, block = %block, "Base layout has no such block, ignoring override");
                }
                known
            })
            .collect();

        let variant = LayoutVariant {
            name: name.to_owned(),
            overrides,
            origin,
        };
        self.env
            .add_template_owned(file.clone(), resolve_variant(&variant))
            .map_err(|e| syntax_error(&file, e))?;

        tracing::debug!(variant = name, ?origin, "Registered layout variant");
        self.variants.insert(name.to_owned(), variant);
        Ok(())
    }

    /// Whether `variant` can be rendered.
    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.variants.contains_key(variant)
    }

    /// Names of all registered variants.
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&LayoutVariant> {
        self.variants.get(name)
    }

    #[must_use]
    pub fn base_origin(&self) -> LayoutOrigin {
        self.base_origin
    }

    /// Render the base layout (`None`) or a named variant.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownVariant`] for unregistered names and
    /// [`TemplateError::Render`] when template execution fails.
    pub fn render(&self, variant: Option<&str>, ctx: impl Serialize) -> Result<String, TemplateError> {
        let template_name = match variant {
            None => BASE_LAYOUT.to_owned(),
            Some(name) if self.contains(name) => variant_file_name(name),
            Some(name) => return Err(TemplateError::UnknownVariant(name.to_owned())),
        };

        self.env
            .get_template(&template_name)
            .and_then(|template| template.render(ctx))
            .map_err(|source| TemplateError::Render {
                template: template_name,
                source,
            })
    }
}

/// Read `_layout.<name>.html` files from the source directory.
fn read_source_variants(
    source_dir: &Path,
) -> Result<Vec<(String, String, LayoutOrigin)>, TemplateError> {
    let io_error = |path: PathBuf| move |source: io::Error| TemplateError::Io { path, source };

    let mut variants = Vec::new();
    let entries = match fs::read_dir(source_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(variants),
        Err(e) => return Err(io_error(source_dir.to_path_buf())(e)),
    };

    for entry in entries {
        let entry = entry.map_err(io_error(source_dir.to_path_buf()))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(name) = variant_from_file_name(&file_name) else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let source = fs::read_to_string(&path).map_err(io_error(path.clone()))?;
        variants.push((name.to_owned(), source, LayoutOrigin::Source));
    }

    variants.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(variants)
}

/// Turn block overrides into a template that extends the base layout.
fn resolve_variant(variant: &LayoutVariant) -> String {
    let mut source = format!("{{% extends \"{BASE_LAYOUT}\" %}}");
    for (block, body) in &variant.overrides {
        let _ = write!(source, "{{% block {block} %}}{body}{{% endblock %}}");
    }
    source
}

fn scan(file: &str, source: &str) -> Result<BlockScan, TemplateError> {
    scan_blocks(source).map_err(|source| TemplateError::Blocks {
        file: file.to_owned(),
        source,
    })
}

fn syntax_error(file: &str, source: minijinja::Error) -> TemplateError {
    TemplateError::Syntax {
        file: file.to_owned(),
        source,
    }
}
