//! Source file discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

use crate::SiteError;

/// A markdown file found in the source directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// `/`-separated path relative to the source directory.
    pub rel_path: String,
    /// Absolute or caller-relative path on disk.
    pub path: PathBuf,
}

/// Walks a source directory for markdown documents.
///
/// Entries whose names start with `_` or `.` are skipped together with
/// everything below them; `_layout*.html`, `_shortcodes/` and `_static/` live
/// there.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Scan the source directory.
    ///
    /// Results are sorted by relative path.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::SourceNotFound`] when the directory is missing and
    /// [`SiteError::Io`] when a directory cannot be read.
    pub fn scan(&self) -> Result<Vec<SourceFile>, SiteError> {
        if !self.source_dir.is_dir() {
            return Err(SiteError::SourceNotFound(self.source_dir.clone()));
        }

        let mut files = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut files)?;
        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(files)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        prefix: &str,
        files: &mut Vec<SourceFile>,
    ) -> Result<(), SiteError> {
        let entries = fs::read_dir(dir).map_err(|e| SiteError::io(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SiteError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_ignored(&name) {
                continue;
            }

            let path = entry.path();
            let rel_path = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            let file_type = entry.file_type().map_err(|e| SiteError::io(&path, e))?;
            if file_type.is_dir() {
                self.scan_directory(&path, &rel_path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "md") {
                tracing::debug!(path = %rel_path, "Found document");
                files.push(SourceFile { rel_path, path });
            }
        }

        Ok(())
    }
}

/// Names starting with `_` or `.` are not part of the content tree.
#[must_use]
pub fn is_ignored(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# x").unwrap();
    }

    fn rel_paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.rel_path.as_str()).collect()
    }

    #[test]
    fn test_scan_finds_markdown_sorted() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "index.md");
        touch(temp.path(), "about.md");
        touch(temp.path(), "02-ref/api.md");
        touch(temp.path(), "01-guide/02-config.md");
        touch(temp.path(), "01-guide/01-intro.md");
        touch(temp.path(), "01-guide/deep/nested.md");

        let files = Scanner::new(temp.path()).scan().unwrap();

        assert_eq!(
            rel_paths(&files),
            vec![
                "01-guide/01-intro.md",
                "01-guide/02-config.md",
                "01-guide/deep/nested.md",
                "02-ref/api.md",
                "about.md",
                "index.md",
            ]
        );
        assert_eq!(files[0].path, temp.path().join("01-guide/01-intro.md"));
    }

    #[test]
    fn test_scan_skips_underscore_and_dot_entries() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "page.md");
        touch(temp.path(), "_drafts/wip.md");
        touch(temp.path(), "_static/readme.md");
        touch(temp.path(), ".git/notes.md");
        touch(temp.path(), "_partial.md");
        touch(temp.path(), "guide/.hidden.md");

        let files = Scanner::new(temp.path()).scan().unwrap();
        assert_eq!(rel_paths(&files), vec!["page.md"]);
    }

    #[test]
    fn test_scan_ignores_other_files() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "page.md");
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::write(temp.path().join("README.markdown"), "x").unwrap();

        let files = Scanner::new(temp.path()).scan().unwrap();
        assert_eq!(rel_paths(&files), vec!["page.md"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let result = Scanner::new(temp.path().join("missing")).scan();
        assert!(matches!(result, Err(SiteError::SourceNotFound(_))));
    }

    #[test]
    fn test_is_ignored() {
        assert!(is_ignored("_layout.html"));
        assert!(is_ignored(".DS_Store"));
        assert!(!is_ignored("guide"));
    }
}
