//! `moat serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use moat_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Built site directory.
    dir: PathBuf,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// URL prefix the site was built with.
    #[arg(long, default_value = "")]
    base_path: String,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = ServerConfig {
            host: self.host,
            port: self.port,
            site_dir: self.dir,
            base_path: self.base_path.trim_end_matches('/').to_owned(),
        };

        output.info(&format!(
            "Serving {} on http://{}:{}{}/",
            config.site_dir.display(),
            config.host,
            config.port,
            config.base_path
        ));

        tracing::debug!(site_dir = %config.site_dir.display(), "Starting server runtime");
        let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
        runtime.block_on(run_server(config))?;
        Ok(())
    }
}
