use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::snapshot;
use crate::types::{Result, SprintError, log_filter_warn};

/// Walks a local checkout and lists repository-relative file paths
pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<Pattern>,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: Vec::new(),
            max_file_size: snapshot::MAX_FILE_SIZE,
        }
    }

    /// Glob patterns matched against the `/`-separated relative path.
    /// Invalid patterns are logged and ignored.
    pub fn with_exclude(mut self, patterns: &[String]) -> Self {
        self.exclude = patterns
            .iter()
            .filter_map(|p| log_filter_warn(Pattern::new(p), "invalid exclude pattern"))
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths, sorted
    pub fn paths(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_iter().map(|f| f.relative).collect())
    }

    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(SprintError::Snapshot(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            // Needed so .gitignore applies outside of a git checkout too
            .require_git(false)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(relative) = self.relative_path(path) else {
                continue;
            };

            if self.is_excluded(&relative) {
                continue;
            }

            match path.metadata() {
                Ok(metadata) if metadata.len() <= self.max_file_size => {
                    files.push(ScannedFile {
                        path: path.to_path_buf(),
                        relative,
                        size: metadata.len(),
                    });
                }
                Ok(_) => debug!("Skipping oversized file {}", relative),
                Err(e) => debug!("Skipping unreadable file {}: {}", relative, e),
            }
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        debug!(root = %self.root.display(), files = files.len(), "Scan complete");
        Ok(files)
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        (!parts.is_empty()).then(|| parts.join("/"))
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// `/`-separated path relative to the scan root
    pub relative: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_sorted_relative_paths() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/b.rs", "");
        write(&dir, "src/a.rs", "");
        write(&dir, "README.md", "# hi");

        let paths = FileScanner::new(dir.path()).paths().unwrap();
        assert_eq!(paths, vec!["README.md", "src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = TempDir::new().unwrap();
        write(&dir, "node_modules/pkg/index.js", "");
        write(&dir, "src/index.js", "");

        let paths = FileScanner::new(dir.path())
            .with_exclude(&["node_modules/**".to_string()])
            .paths()
            .unwrap();
        assert_eq!(paths, vec!["src/index.js"]);
    }

    #[test]
    fn test_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".gitignore", "secret.txt\n");
        write(&dir, "secret.txt", "x");
        write(&dir, "main.go", "package main");

        let paths = FileScanner::new(dir.path()).paths().unwrap();
        assert!(paths.contains(&"main.go".to_string()));
        assert!(!paths.contains(&"secret.txt".to_string()));
    }

    #[test]
    fn test_max_file_size() {
        let dir = TempDir::new().unwrap();
        write(&dir, "big.txt", &"x".repeat(100));
        write(&dir, "small.txt", "x");

        let paths = FileScanner::new(dir.path())
            .with_max_file_size(10)
            .paths()
            .unwrap();
        assert_eq!(paths, vec!["small.txt"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(FileScanner::new(missing).scan().is_err());
    }
}
