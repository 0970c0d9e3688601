//! Static site building for moat.
//!
//! Ties the other crates together: documents and navigation from `moat-site`,
//! markdown and shortcodes from `moat-renderer`, and minijinja layouts.
//!
//! - [`LayoutSet`]: base layout plus block-override variants
//! - [`TemplateRegistry`]: shortcode templates from `_shortcodes/`
//! - [`StaticSiteBuilder`]: renders every page into an output directory
//! - [`init_site`]: writes a starter site
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use moat_build::{BuildConfig, StaticSiteBuilder};
//! use moat_config::Config;
//!
//! let config = Config::load(None, Path::new("docs"), None)?;
//! let report = StaticSiteBuilder::new("docs", "_site", BuildConfig::from_config(&config)).build()?;
//! println!("{} pages", report.pages);
//! # Ok(())
//! # }
//! ```

mod blocks;
mod builder;
mod context;
mod defaults;
mod init;
mod layout;
mod shortcodes;
mod template;

pub use blocks::BlockScanError;
pub use builder::{BuildConfig, BuildError, BuildReport, STATIC_DIR, StaticSiteBuilder};
pub use context::{LayoutContext, PageContext};
pub use defaults::{BASE_LAYOUT, variant_file_name, variant_from_file_name};
pub use init::{InitError, init_site};
pub use layout::{LayoutOrigin, LayoutSet, LayoutVariant};
pub use shortcodes::{SHORTCODES_DIR, TemplateRegistry};
pub use template::TemplateError;
