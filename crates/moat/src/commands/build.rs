//! `moat build` command implementation.

use std::path::PathBuf;

use clap::Args;
use moat_build::{BuildConfig, StaticSiteBuilder};
use moat_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory.
    src: PathBuf,

    /// Output directory for the generated site.
    dst: PathBuf,

    /// Path to configuration file (default: <src>/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site name for templates (overrides config).
    #[arg(long, env = "MOAT_SITE_NAME")]
    site_name: Option<String>,

    /// URL prefix when the site is served from a sub-path, e.g. /moat (overrides config).
    #[arg(long, env = "MOAT_BASE_PATH")]
    base_path: Option<String>,

    /// Fail on malformed front matter instead of ignoring it.
    #[arg(long)]
    strict_metadata: bool,

    /// Require _layout.html in the source directory instead of using built-in layouts.
    #[arg(long)]
    no_builtin_layouts: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_name: self.site_name,
            base_path: self.base_path,
            strict_metadata: self.strict_metadata.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), &self.src, Some(&cli_settings))?;
        tracing::debug!(
            site_name = %config.site_name,
            base_path = %config.base_path,
            strict_metadata = config.metadata.strict,
            builtin_layouts = !self.no_builtin_layouts,
            "Resolved build configuration"
        );

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!("Source: {}", self.src.display()));
        output.info(&format!("Output: {}", self.dst.display()));

        let build_config =
            BuildConfig::from_config(&config).with_builtin_layouts(!self.no_builtin_layouts);
        let report = StaticSiteBuilder::new(&self.src, &self.dst, build_config).build()?;

        output.success(&format!(
            "Built {} pages and {} static files to {}",
            report.pages,
            report.static_files,
            report.output_dir.display()
        ));
        Ok(())
    }
}
