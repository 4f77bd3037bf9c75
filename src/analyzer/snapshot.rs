//! Repository snapshot
//!
//! Builds a [`ProfilerInput`] from a local checkout: the file listing, a merged
//! dependency map and a small sample of file contents. Unreadable or
//! malformed files are skipped; only a missing root is an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::manifest::ManifestKind;
use super::scanner::{FileScanner, ScannedFile};
use crate::config::AnalysisConfig;
use crate::constants::snapshot;
use crate::pipeline::profiler::ProfilerInput;
use crate::pipeline::profiler::rules::SOURCE_EXTENSIONS;
use crate::types::{Result, ResultExt, extension_lower, file_name_lower, log_filter_error, truncate_chars};

/// Path fragments of files likely to register routes
const ROUTE_FRAGMENTS: &[&str] = &["routes/", "controllers/", "api/", "handlers/", "router"];

/// File stems of typical application entry points
const ENTRY_STEMS: &[&str] = &["app", "server", "main", "index"];

pub struct SnapshotBuilder {
    root: PathBuf,
    exclude: Vec<String>,
    max_file_size: u64,
    max_raw_contents: usize,
}

impl SnapshotBuilder {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: defaults.exclude,
            max_file_size: defaults.max_file_size,
            max_raw_contents: defaults.max_raw_contents,
        }
    }

    pub fn with_config(mut self, config: &AnalysisConfig) -> Self {
        self.exclude = config.exclude.clone();
        self.max_file_size = config.max_file_size;
        self.max_raw_contents = config.max_raw_contents;
        self
    }

    pub fn build(&self) -> Result<ProfilerInput> {
        let files = FileScanner::new(&self.root)
            .with_exclude(&self.exclude)
            .with_max_file_size(self.max_file_size)
            .scan()?;

        let mut input = ProfilerInput::new(files.iter().map(|f| f.relative.clone()).collect());

        for file in &files {
            let Some(kind) = ManifestKind::from_path(&file.relative) else {
                continue;
            };
            let Some(content) = read_content(file) else {
                continue;
            };
            if let Some(deps) = log_filter_error(kind.parse(&file.relative, &content), "skipping manifest") {
                for (name, version) in deps {
                    // First manifest in path order wins
                    input.dependencies.entry(name).or_insert(version);
                }
            }
            input.raw_contents.insert(file.relative.clone(), content);
        }

        let sampled: Vec<&ScannedFile> = files
            .iter()
            .filter(|f| is_route_like(&f.relative))
            .take(self.max_raw_contents)
            .collect();
        for file in sampled {
            if let Some(content) = read_content(file) {
                input.raw_contents.insert(file.relative.clone(), content);
            }
        }

        info!(
            root = %self.root.display(),
            files = input.files.len(),
            dependencies = input.dependencies.len(),
            sampled = input.raw_contents.len(),
            "Snapshot built"
        );
        Ok(input)
    }
}

fn read_content(file: &ScannedFile) -> Option<String> {
    let content = log_filter_error(
        fs::read_to_string(&file.path).with_context_fn(|| format!("reading {}", file.relative)),
        "skipping file",
    )?;
    Some(truncate_chars(&content, snapshot::MAX_CONTENT_CHARS))
}

fn is_route_like(path: &str) -> bool {
    let Some(ext) = extension_lower(path) else {
        return false;
    };
    if !SOURCE_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }

    let lower = path.to_lowercase();
    if ROUTE_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return true;
    }

    let name = file_name_lower(path);
    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(&name);
    let is_entry = ENTRY_STEMS.contains(&stem);
    if is_entry {
        debug!("Sampling entry point {}", path);
    }
    is_entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn express_checkout() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "package.json",
            r#"{"dependencies": {"express": "^4.18.0"}, "devDependencies": {"jest": "^29"}}"#,
        );
        write(&dir, "server/routes/auth.js", "router.post('/login', handler);\n");
        write(&dir, "server/app.js", "const app = express();\n");
        write(&dir, "server/util/format.js", "module.exports = {};\n");
        write(&dir, "node_modules/express/index.js", "");
        dir
    }

    #[test]
    fn test_builds_profiler_input() {
        let dir = express_checkout();
        let input = SnapshotBuilder::new(dir.path()).build().unwrap();

        assert_eq!(
            input.files,
            vec![
                "package.json",
                "server/app.js",
                "server/routes/auth.js",
                "server/util/format.js"
            ]
        );
        assert_eq!(input.dependencies.get("express").map(String::as_str), Some("^4.18.0"));
        assert!(input.dependencies.contains_key("jest"));
        assert!(input.raw_contents.contains_key("package.json"));
        assert!(input.raw_contents.contains_key("server/routes/auth.js"));
        assert!(input.raw_contents.contains_key("server/app.js"));
        assert!(!input.raw_contents.contains_key("server/util/format.js"));
    }

    #[test]
    fn test_malformed_manifest_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{ broken");
        write(&dir, "requirements.txt", "flask==3.0\n");

        let input = SnapshotBuilder::new(dir.path()).build().unwrap();
        assert_eq!(input.dependencies.len(), 1);
        assert!(input.dependencies.contains_key("flask"));
    }

    #[test]
    fn test_raw_content_sample_is_capped() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            write(&dir, &format!("api/handler_{}.py", i), "def h(): pass\n");
        }
        let config = AnalysisConfig {
            max_raw_contents: 2,
            ..AnalysisConfig::default()
        };
        let input = SnapshotBuilder::new(dir.path()).with_config(&config).build().unwrap();
        assert_eq!(input.raw_contents.len(), 2);
        assert!(input.raw_contents.contains_key("api/handler_0.py"));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(SnapshotBuilder::new(dir.path().join("missing")).build().is_err());
    }

    #[test]
    fn test_route_like_detection() {
        assert!(is_route_like("src/routes/users.ts"));
        assert!(is_route_like("main.go"));
        assert!(!is_route_like("docs/api/overview.md"));
        assert!(!is_route_like("src/lib/format.ts"));
    }
}
