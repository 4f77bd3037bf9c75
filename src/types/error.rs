//! Unified Error Type System
//!
//! Centralized error types for the boundaries of the application.
//!
//! The analysis pipeline itself never fails: every stage degrades to an
//! `unknown`/empty value instead of returning an error. Errors only exist where
//! the crate touches the outside world:
//!
//! - **Config**: loading and validating layered configuration
//! - **Snapshot**: walking a local checkout and reading files
//! - **Manifest**: parsing dependency manifests (logged and skipped by callers)
//! - **Output**: serializing and writing the report

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SprintError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Manifest error in {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SprintError>;

impl SprintError {
    /// Create a manifest parsing error
    pub fn manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the pipeline can continue without the failed artifact.
    ///
    /// Manifest and per-file snapshot errors only remove one fact from the
    /// profile; config and output errors stop the command.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Manifest { .. } | Self::Snapshot(_) | Self::Io(_))
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| SprintError::Snapshot(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| SprintError::Snapshot(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_display() {
        let err = SprintError::manifest("package.json", "expected object");
        assert_eq!(
            err.to_string(),
            "Manifest error in package.json: expected object"
        );
    }

    #[test]
    fn test_degradable_classification() {
        assert!(SprintError::manifest("go.mod", "bad").is_degradable());
        assert!(SprintError::Snapshot("unreadable".to_string()).is_degradable());
        assert!(!SprintError::Config("bad rate".to_string()).is_degradable());
        assert!(!SprintError::InvalidInput("empty".to_string()).is_degradable());
    }

    #[test]
    fn test_with_context() {
        let raw: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = raw.with_context("reading README.md").unwrap_err();
        assert_eq!(err.to_string(), "Snapshot error: reading README.md: missing");
    }
}
