//! Local preview server for built moat sites.
//!
//! Serves an output directory over HTTP with axum and tower-http's
//! `ServeDir`. There is no rendering here: run `moat build` first.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use moat_server::{ServerConfig, run_server};
//!
//! # async fn example() -> Result<(), moat_server::ServerError> {
//! let config = ServerConfig {
//!     site_dir: PathBuf::from("_site"),
//!     ..ServerConfig::default()
//! };
//! run_server(config).await
//! # }
//! ```

mod app;
mod headers;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

pub use app::create_router;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Built site directory.
    pub site_dir: PathBuf,
    /// URL prefix the site was built with; empty to serve at the root.
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            site_dir: PathBuf::from("_site"),
            base_path: String::new(),
        }
    }
}

impl ServerConfig {
    /// Address the server listens on.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` and `port` do not form a socket address.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }
}

/// Error starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("site directory not found: {}", .0.display())]
    SiteNotFound(PathBuf),

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the site directory is missing, the address is invalid
/// or the listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if !config.site_dir.is_dir() {
        return Err(ServerError::SiteNotFound(config.site_dir));
    }
    let addr = config.addr()?;
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, dir = %config.site_dir.display(), "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(config.base_path.is_empty());
    }

    #[test]
    fn test_invalid_address() {
        let config = ServerConfig {
            host: "not a host".to_owned(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.addr(), Err(ServerError::InvalidAddress(addr)) if addr == "not a host:8080"));
    }

    #[tokio::test]
    async fn test_missing_site_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            site_dir: temp.path().join("missing"),
            ..ServerConfig::default()
        };
        assert!(matches!(run_server(config).await, Err(ServerError::SiteNotFound(_))));
    }
}
