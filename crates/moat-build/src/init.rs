//! Starter site scaffolding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use moat_site::ROOT_INDEX;

use crate::defaults::{BASE_LAYOUT, SCAFFOLD_FILES, STARTER_PAGES};

/// Error returned by [`init_site`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("{} already has {file}; run init on a new directory", dir.display())]
    AlreadyInitialized { dir: PathBuf, file: &'static str },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write the built-in layouts, a sample config and shortcode, and starter
/// pages into `dir`, creating it if needed.
///
/// Returns the written paths relative to `dir`, in write order. Nothing is
/// written if `dir` already holds a base layout or a home page.
///
/// # Errors
///
/// Returns an error if the directory is already initialized or a file cannot
/// be written.
pub fn init_site(dir: &Path) -> Result<Vec<PathBuf>, InitError> {
    for file in [BASE_LAYOUT, ROOT_INDEX] {
        if dir.join(file).exists() {
            return Err(InitError::AlreadyInitialized {
                dir: dir.to_path_buf(),
                file,
            });
        }
    }

    let mut written = Vec::with_capacity(SCAFFOLD_FILES.len() + STARTER_PAGES.len());
    for (rel, content) in SCAFFOLD_FILES.iter().chain(STARTER_PAGES) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| InitError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, content).map_err(|source| InitError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(file = *rel, "Wrote scaffold file");
        written.push(PathBuf::from(rel));
    }

    tracing::info!(files = written.len(), dir = %dir.display(), "Initialized site");
    Ok(written)
}
