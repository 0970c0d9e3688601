//! Shortcode templates loaded from `_shortcodes/`.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use minijinja::{Environment, Value, context};
use moat_renderer::shortcode::{ShortcodeCall, ShortcodeRegistry};

use crate::context::PageContext;
use crate::template::{TemplateError, new_environment};

/// Directory holding one `<name>.html` template per shortcode.
pub const SHORTCODES_DIR: &str = "_shortcodes";

/// Shortcode templates compiled into one environment.
///
/// Each template sees `inner` (rendered block body, safe), `args` and `page`.
pub struct TemplateRegistry {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl TemplateRegistry {
    /// A registry with no shortcodes; expansion leaves documents untouched.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            env: new_environment(),
            names: BTreeSet::new(),
        }
    }

    /// Compile every `_shortcodes/*.html` file under `source_dir`.
    ///
    /// A missing directory yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a template cannot be read or does not parse.
    pub fn load(source_dir: &Path) -> Result<Self, TemplateError> {
        let dir = source_dir.join(SHORTCODES_DIR);
        let mut registry = Self::empty();

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(registry),
            Err(source) => return Err(TemplateError::Io { path: dir, source }),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
            registry.add(name, source)?;
        }

        tracing::debug!(count = registry.names.len(), "Loaded shortcodes");
        Ok(registry)
    }

    /// Register a shortcode template, replacing any earlier one with the same name.
    ///
    /// Names that cannot appear in a shortcode tag are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not parse.
    pub fn add(&mut self, name: &str, source: String) -> Result<(), TemplateError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            tracing::warn!(shortcode = name, "Skipping shortcode with invalid name");
            return Ok(());
        }

        let file = template_name(name);
        self.env
            .add_template_owned(file.clone(), source)
            .map_err(|source| TemplateError::Syntax { file, source })?;
        self.names.insert(name.to_owned());
        tracing::debug!(shortcode = name, "Registered shortcode");
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn template_name(name: &str) -> String {
    format!("{SHORTCODES_DIR}/{name}.html")
}

impl ShortcodeRegistry for TemplateRegistry {
    type Context = PageContext;
    type Error = minijinja::Error;

    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn render(&self, call: &ShortcodeCall<'_>, page: &PageContext) -> Result<String, minijinja::Error> {
        let inner = Value::from_safe_string(call.inner.unwrap_or_default().to_owned());
        self.env
            .get_template(&template_name(call.name))?
            .render(context! { inner, args => call.args, page })
    }
}
