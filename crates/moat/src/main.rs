//! moat CLI - markdown static site generator.
//!
//! Provides commands for:
//! - `build`: Render a source directory into a static site
//! - `init`: Scaffold a new source directory
//! - `serve`: Preview a built site locally
//! - `version`: Print the version

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, InitArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// moat - markdown static site generator.
#[derive(Parser)]
#[command(name = "moat", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a static site from a markdown source directory.
    Build(BuildArgs),
    /// Scaffold a source directory with layouts and starter pages.
    Init(InitArgs),
    /// Serve a built site for local preview.
    Serve(ServeArgs),
    /// Print the version.
    Version,
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.verbose,
            Self::Serve(args) => args.verbose,
            Self::Init(_) | Self::Version => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Init(args) => args.execute(),
        Commands::Serve(args) => args.execute(),
        Commands::Version => {
            output.info(&format!("moat {VERSION}"));
            Ok(())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
