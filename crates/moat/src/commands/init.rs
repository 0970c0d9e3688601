//! `moat init` command implementation.

use std::path::PathBuf;

use clap::Args;
use moat_build::init_site;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Directory to scaffold.
    #[arg(default_value = "docs")]
    dir: PathBuf,
}

impl InitArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let written = init_site(&self.dir)?;
        for file in &written {
            output.item(&file.display().to_string());
        }

        output.success(&format!(
            "Initialized {} files in {}",
            written.len(),
            self.dir.display()
        ));
        output.info("\nNext steps:");
        output.info(&format!("  moat build {} _site", self.dir.display()));
        output.info("  moat serve _site");
        Ok(())
    }
}
