//! Site configuration for moat.
//!
//! A site is configured by `config.toml`. [`Config::load`] reads the file
//! named by `--config`, or else `<source>/config.toml` when present, or else
//! starts from defaults. [`CliSettings`] are layered on top.
//!
//! `site_name`, `base_path` and every `links[].url` may reference the
//! environment as `${VAR}` (required) or `${VAR:-fallback}`.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Values given on the command line. `Some` fields replace the file's.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub site_name: Option<String>,
    pub base_path: Option<String>,
    pub strict_metadata: Option<bool>,
}

/// Configuration filename looked up in the source directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Site name used when neither the config file nor the CLI provides one.
pub const DEFAULT_SITE_NAME: &str = "Site";

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site name shown by layouts.
    pub site_name: String,
    /// URL prefix for sites served from a sub-path (e.g. `/moat`).
    pub base_path: String,
    /// Syntax highlighting theme names.
    pub highlight: HighlightConfig,
    /// Extra sidebar links rendered above the navigation.
    pub links: Vec<LinkConfig>,
    /// Front matter handling.
    pub metadata: MetadataConfig,
    /// Arbitrary site-level values exposed to templates as `site`.
    pub extra: BTreeMap<String, serde_json::Value>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_owned(),
            base_path: String::new(),
            highlight: HighlightConfig::default(),
            links: Vec::new(),
            metadata: MetadataConfig::default(),
            extra: BTreeMap::new(),
            config_path: None,
        }
    }
}

/// Syntax highlighting themes for light and dark color schemes.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HighlightConfig {
    /// Theme for the light color scheme.
    pub light: String,
    /// Theme for the dark color scheme.
    pub dark: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            light: "github".to_owned(),
            dark: "github-dark".to_owned(),
        }
    }
}

/// Sidebar link shown above the generated navigation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LinkConfig {
    /// Link text.
    pub title: String,
    /// Link target.
    pub url: String,
}

/// Front matter configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Fail the build on malformed front matter instead of ignoring it.
    pub strict: bool,
}

/// Error returned by [`Config::load`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),

    /// A required `${VAR}` reference named an unset variable.
    #[error("{field}: environment variable {var} is not set")]
    EnvVar { field: String, var: String },
}

impl Config {
    /// Read the configuration and apply `cli` on top.
    ///
    /// An explicit `config_path` must exist. Without one, `config.toml` in
    /// `source_dir` is used if present, and defaults otherwise. The result is
    /// normalized (no trailing `/` on `base_path`) and validated.
    ///
    /// # Errors
    ///
    /// Fails when the explicit file is missing, the file cannot be read or
    /// parsed, a required `${VAR}` is unset, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        source_dir: &Path,
        cli: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Some(source_dir.join(CONFIG_FILENAME)).filter(|path| path.is_file()),
        };

        let mut config = match file {
            Some(path) => Self::read(path)?,
            None => Self::default(),
        };
        if let Some(cli) = cli {
            config.override_with(cli);
        }
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn read(path: PathBuf) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&std::fs::read_to_string(&path)?)?;
        config.expand_env_vars()?;
        config.config_path = Some(path);
        Ok(config)
    }

    fn override_with(&mut self, cli: &CliSettings) {
        if let Some(name) = &cli.site_name {
            self.site_name.clone_from(name);
        }
        if let Some(path) = &cli.base_path {
            self.base_path.clone_from(path);
        }
        if let Some(strict) = cli.strict_metadata {
            self.metadata.strict = strict;
        }
    }

    fn normalize(&mut self) {
        let trimmed_len = self.base_path.trim_end_matches('/').len();
        self.base_path.truncate(trimmed_len);
        if self.site_name.is_empty() {
            DEFAULT_SITE_NAME.clone_into(&mut self.site_name);
        }
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a relative `base_path` or a
    /// link with an empty title or URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "base_path {:?} must be absolute (start with '/')",
                self.base_path
            )));
        }

        for (i, link) in self.links.iter().enumerate() {
            for (key, value) in [("title", &link.title), ("url", &link.url)] {
                if value.is_empty() {
                    return Err(ConfigError::Validation(format!("links[{i}].{key} is empty")));
                }
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site_name = expand::expand_env(&self.site_name, "site_name")?;
        self.base_path = expand::expand_env(&self.base_path, "base_path")?;
        for (i, link) in self.links.iter_mut().enumerate() {
            link.url = expand::expand_env(&link.url, &format!("links[{i}].url"))?;
        }
        Ok(())
    }
}
