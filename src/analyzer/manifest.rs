//! Dependency manifest parsing
//!
//! Each parser turns one manifest into `(name, version)` pairs. Versions are
//! kept as written; `*` stands in when none is declared.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use toml::Value as TomlValue;

use crate::types::{Result, SprintError, file_name_lower, log_filter_warn};

pub type Dependency = (String, String);

const ANY_VERSION: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    Requirements,
    PyProject,
    Cargo,
    GoMod,
    Gemfile,
}

impl ManifestKind {
    pub fn from_path(path: &str) -> Option<Self> {
        match file_name_lower(path).as_str() {
            "package.json" => Some(Self::PackageJson),
            "requirements.txt" => Some(Self::Requirements),
            "pyproject.toml" => Some(Self::PyProject),
            "cargo.toml" => Some(Self::Cargo),
            "go.mod" => Some(Self::GoMod),
            "gemfile" => Some(Self::Gemfile),
            _ => None,
        }
    }

    pub fn parse(&self, path: &str, content: &str) -> Result<Vec<Dependency>> {
        match self {
            Self::PackageJson => parse_package_json(path, content),
            Self::Requirements => Ok(parse_requirements(content)),
            Self::PyProject => parse_pyproject(path, content),
            Self::Cargo => parse_cargo_toml(path, content),
            Self::GoMod => Ok(parse_go_mod(content)),
            Self::Gemfile => Ok(parse_gemfile(content)),
        }
    }
}

// =============================================================================
// JavaScript
// =============================================================================

const PACKAGE_JSON_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

fn parse_package_json(path: &str, content: &str) -> Result<Vec<Dependency>> {
    let root: JsonValue =
        serde_json::from_str(content).map_err(|e| SprintError::manifest(path, e.to_string()))?;
    let Some(root) = root.as_object() else {
        return Err(SprintError::manifest(path, "expected a JSON object"));
    };

    let mut deps = Vec::new();
    for section in PACKAGE_JSON_SECTIONS {
        let Some(table) = root.get(*section).and_then(JsonValue::as_object) else {
            continue;
        };
        for (name, version) in table {
            let version = version.as_str().unwrap_or(ANY_VERSION);
            deps.push((name.clone(), version.to_string()));
        }
    }
    Ok(deps)
}

// =============================================================================
// Python
// =============================================================================

/// Split a PEP 508 requirement such as `fastapi[all]>=0.100; python_version>"3.8"`
fn parse_requirement(requirement: &str) -> Option<Dependency> {
    let requirement = requirement.split(';').next().unwrap_or_default().trim();
    if requirement.is_empty() {
        return None;
    }

    let name_end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    let name = &requirement[..name_end];
    if name.is_empty() {
        return None;
    }

    let mut rest = requirement[name_end..].trim();
    if rest.starts_with('[') {
        rest = rest.split_once(']').map(|(_, r)| r.trim()).unwrap_or_default();
    }
    let version = if rest.is_empty() { ANY_VERSION } else { rest };
    Some((name.to_lowercase(), version.to_string()))
}

fn parse_requirements(content: &str) -> Vec<Dependency> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(parse_requirement)
        .collect()
}

fn toml_version(value: &TomlValue) -> String {
    match value {
        TomlValue::String(s) => s.clone(),
        TomlValue::Table(t) => t
            .get("version")
            .and_then(TomlValue::as_str)
            .unwrap_or(ANY_VERSION)
            .to_string(),
        _ => ANY_VERSION.to_string(),
    }
}

fn toml_table_deps(table: Option<&TomlValue>, deps: &mut Vec<Dependency>) {
    let Some(table) = table.and_then(TomlValue::as_table) else {
        return;
    };
    for (name, value) in table {
        deps.push((name.clone(), toml_version(value)));
    }
}

fn parse_pyproject(path: &str, content: &str) -> Result<Vec<Dependency>> {
    let root: TomlValue =
        toml::from_str(content).map_err(|e| SprintError::manifest(path, e.to_string()))?;
    let mut deps = Vec::new();

    // PEP 621
    if let Some(project) = root.get("project") {
        let required = project.get("dependencies").and_then(TomlValue::as_array);
        let optional = project
            .get("optional-dependencies")
            .and_then(TomlValue::as_table)
            .map(|groups| groups.values().filter_map(TomlValue::as_array).collect::<Vec<_>>())
            .unwrap_or_default();

        for list in required.into_iter().chain(optional) {
            deps.extend(
                list.iter()
                    .filter_map(TomlValue::as_str)
                    .filter_map(parse_requirement),
            );
        }
    }

    // Poetry
    if let Some(poetry) = root.get("tool").and_then(|t| t.get("poetry")) {
        let mut poetry_deps = Vec::new();
        toml_table_deps(poetry.get("dependencies"), &mut poetry_deps);
        toml_table_deps(poetry.get("dev-dependencies"), &mut poetry_deps);
        if let Some(groups) = poetry.get("group").and_then(TomlValue::as_table) {
            for group in groups.values() {
                toml_table_deps(group.get("dependencies"), &mut poetry_deps);
            }
        }
        deps.extend(
            poetry_deps
                .into_iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case("python")),
        );
    }

    Ok(deps)
}

// =============================================================================
// Rust
// =============================================================================

const CARGO_SECTIONS: &[&str] = &["dependencies", "dev-dependencies", "build-dependencies"];

fn parse_cargo_toml(path: &str, content: &str) -> Result<Vec<Dependency>> {
    let root: TomlValue =
        toml::from_str(content).map_err(|e| SprintError::manifest(path, e.to_string()))?;
    let mut deps = Vec::new();
    for section in CARGO_SECTIONS {
        toml_table_deps(root.get(*section), &mut deps);
    }
    toml_table_deps(
        root.get("workspace").and_then(|w| w.get("dependencies")),
        &mut deps,
    );
    Ok(deps)
}

// =============================================================================
// Go
// =============================================================================

fn parse_go_mod(content: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let spec = if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            line
        } else if let Some(rest) = line.strip_prefix("require") {
            let rest = rest.trim();
            if rest == "(" {
                in_block = true;
                continue;
            }
            rest
        } else {
            continue;
        };

        let mut parts = spec.split_whitespace();
        if let (Some(module), Some(version)) = (parts.next(), parts.next()) {
            deps.push((module.to_string(), version.to_string()));
        }
    }
    deps
}

// =============================================================================
// Ruby
// =============================================================================

static GEM_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    log_filter_warn(
        Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#),
        "invalid gem pattern",
    )
});

fn parse_gemfile(content: &str) -> Vec<Dependency> {
    let Some(re) = GEM_LINE.as_ref() else {
        return Vec::new();
    };
    content
        .lines()
        .filter_map(|line| re.captures(line))
        .map(|caps| {
            let name = caps[1].to_string();
            let version = caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| ANY_VERSION.to_string());
            (name, version)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_kind_detection() {
        assert_eq!(ManifestKind::from_path("package.json"), Some(ManifestKind::PackageJson));
        assert_eq!(ManifestKind::from_path("apps/web/package.json"), Some(ManifestKind::PackageJson));
        assert_eq!(ManifestKind::from_path("Cargo.toml"), Some(ManifestKind::Cargo));
        assert_eq!(ManifestKind::from_path("Gemfile"), Some(ManifestKind::Gemfile));
        assert_eq!(ManifestKind::from_path("src/main.rs"), None);
    }

    #[test]
    fn test_package_json_sections() {
        let content = r#"{
            "name": "api",
            "dependencies": { "express": "^4.18.0" },
            "devDependencies": { "jest": "^29.0.0" },
            "peerDependencies": { "react": ">=18" }
        }"#;
        let deps = parse_package_json("package.json", content).unwrap();
        assert!(deps.contains(&("express".to_string(), "^4.18.0".to_string())));
        assert!(deps.contains(&("jest".to_string(), "^29.0.0".to_string())));
        assert!(deps.contains(&("react".to_string(), ">=18".to_string())));
    }

    #[test]
    fn test_package_json_malformed() {
        let err = parse_package_json("package.json", "{ not json").unwrap_err();
        assert!(err.is_degradable());
        assert!(parse_package_json("package.json", "[]").is_err());
    }

    #[test]
    fn test_requirements() {
        let content = "# deps\nfastapi[all]>=0.100\nqdrant-client==1.7.0  # vector\n-r base.txt\nrequests\n";
        let deps = parse_requirements(content);
        assert_eq!(
            deps,
            vec![
                ("fastapi".to_string(), ">=0.100".to_string()),
                ("qdrant-client".to_string(), "==1.7.0".to_string()),
                ("requests".to_string(), "*".to_string()),
            ]
        );
    }

    #[test]
    fn test_pyproject_pep621_and_poetry() {
        let content = r#"
[project]
name = "svc"
dependencies = ["django>=4.2", "psycopg2-binary; sys_platform != 'win32'"]

[project.optional-dependencies]
test = ["pytest>=7"]

[tool.poetry.dependencies]
python = "^3.11"
celery = { version = "^5.3", extras = ["redis"] }

[tool.poetry.group.dev.dependencies]
black = "^24.0"
"#;
        let deps = parse_pyproject("pyproject.toml", content).unwrap();
        let names: Vec<&str> = deps.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"django"));
        assert!(names.contains(&"psycopg2-binary"));
        assert!(names.contains(&"pytest"));
        assert!(names.contains(&"celery"));
        assert!(names.contains(&"black"));
        assert!(!names.contains(&"python"));
        assert!(deps.contains(&("celery".to_string(), "^5.3".to_string())));
    }

    #[test]
    fn test_cargo_toml() {
        let content = r#"
[package]
name = "svc"

[dependencies]
axum = "0.7"
sqlx = { version = "0.8", features = ["postgres"] }
local = { path = "../local" }

[dev-dependencies]
proptest = "1"
"#;
        let deps = parse_cargo_toml("Cargo.toml", content).unwrap();
        assert!(deps.contains(&("axum".to_string(), "0.7".to_string())));
        assert!(deps.contains(&("sqlx".to_string(), "0.8".to_string())));
        assert!(deps.contains(&("local".to_string(), "*".to_string())));
        assert!(deps.contains(&("proptest".to_string(), "1".to_string())));
    }

    #[test]
    fn test_go_mod() {
        let content = "module example.com/svc\n\ngo 1.22\n\nrequire github.com/gin-gonic/gin v1.9.1\n\nrequire (\n\tgorm.io/gorm v1.25.0 // indirect\n\tgithub.com/redis/go-redis/v9 v9.5.1\n)\n";
        let deps = parse_go_mod(content);
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0], ("github.com/gin-gonic/gin".to_string(), "v1.9.1".to_string()));
        assert_eq!(deps[1], ("gorm.io/gorm".to_string(), "v1.25.0".to_string()));
    }

    #[test]
    fn test_gemfile() {
        let content = "source 'https://rubygems.org'\ngem 'rails', '~> 7.1'\ngem \"pg\"\n# gem 'unused'\n";
        let deps = parse_gemfile(content);
        assert_eq!(
            deps,
            vec![
                ("rails".to_string(), "~> 7.1".to_string()),
                ("pg".to_string(), "*".to_string()),
            ]
        );
    }
}
