//! CLI error types.

use moat_build::{BuildError, InitError};
use moat_config::ConfigError;
use moat_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Init(#[from] InitError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
