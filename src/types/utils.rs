//! Shared utility functions for type serialization and common operations.

use serde::Serialize;
use std::fmt::Display;

// =============================================================================
// String Utilities
// =============================================================================

/// Capitalize the first character of a string.
/// Used for display names and entity labels.
#[inline]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Truncate a string to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}

/// Lowercased file name component of a `/`-separated path.
pub fn file_name_lower(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_lowercase()
}

/// Lowercased extension of a `/`-separated path, if any.
pub fn extension_lower(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

// =============================================================================
// Serialization
// =============================================================================

/// Serialize an enum to its serde string representation (without quotes).
/// Uses serde_json internally to ensure consistent serialization with
/// the `#[serde(rename_all = ...)]` attributes on enums.
pub fn enum_to_str<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

/// Filter an iterator of Results, logging errors at debug level before discarding.
///
/// Use this instead of `.filter_map(|r| r.ok())` when you want visibility into
/// what errors are being discarded.
///
/// # Example
/// ```ignore
/// let values: Vec<_> = results
///     .filter_map(|r| log_filter_error(r, "reading manifest"))
///     .collect();
/// ```
pub fn log_filter_error<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("{}: {}", context, e);
            None
        }
    }
}

/// Like log_filter_error but logs at warn level for more important operations.
pub fn log_filter_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("qdrant"), "Qdrant");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(file_name_lower("server/Routes/Auth.JS"), "auth.js");
        assert_eq!(extension_lower("src/app.TSX"), Some("tsx".to_string()));
        assert_eq!(extension_lower("Dockerfile"), None);
        assert_eq!(extension_lower(".env"), None);
    }

    #[test]
    fn test_enum_to_str() {
        #[derive(Serialize)]
        #[serde(rename_all = "kebab-case")]
        enum Sample {
            FullStack,
        }
        assert_eq!(enum_to_str(&Sample::FullStack), "full-stack");
    }
}
