pub mod error;
pub mod utils;

pub use error::{Result, ResultExt, SprintError};
pub use utils::{
    capitalize_first, enum_to_str, extension_lower, file_name_lower, log_filter_error,
    log_filter_warn, truncate_chars,
};

// =============================================================================
// Domain Newtypes
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for recommendation IDs (`REC-001`, `REC-002`, ...)
///
/// Dependencies between recommendations are expressed with this type so they
/// cannot be confused with titles or category names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(String);

impl RecommendationId {
    /// Build the ID for a 1-based position in the ranked list
    pub fn from_rank(rank: usize) -> Self {
        Self(format!("REC-{:03}", rank))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file path (and optional line range) supporting a detection or impact claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<(u32, u32)>,
}

impl Evidence {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file: path.into(),
            line_range: None,
        }
    }

    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.line_range = Some((start, end));
        self
    }

    /// Wildcard evidence points at a glob, not a concrete file
    pub fn is_wildcard(&self) -> bool {
        self.file.contains('*')
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_range {
            Some((start, end)) => write!(f, "{}:{}-{}", self.file, start, end),
            None => write!(f, "{}", self.file),
        }
    }
}
