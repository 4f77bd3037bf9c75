//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/sprintzero/) and project (.sprintzero/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{financial, priority, snapshot};
use crate::pipeline::types::ProjectType;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Project-specific settings
    pub project: ProjectConfig,

    /// Repository snapshot settings
    pub analysis: AnalysisConfig,

    /// Cost model settings
    pub financial: FinancialConfig,

    /// Report assembly settings
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            project: ProjectConfig::default(),
            analysis: AnalysisConfig::default(),
            financial: FinancialConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SprintError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !self.financial.weekly_rate.is_finite() || self.financial.weekly_rate <= 0.0 {
            return Err(crate::types::SprintError::Config(format!(
                "financial.weekly_rate must be a positive number, got {}",
                self.financial.weekly_rate
            )));
        }

        if self.analysis.max_evidence_per_item == 0 {
            return Err(crate::types::SprintError::Config(
                "analysis.max_evidence_per_item must be greater than 0".to_string(),
            ));
        }

        if self.report.detailed_recommendations == 0 {
            return Err(crate::types::SprintError::Config(
                "report.detailed_recommendations must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Project Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name (defaults to directory name)
    pub name: Option<String>,

    /// Project type override; detected from the tech stack when unset
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns to exclude from the file listing
    pub exclude: Vec<String>,

    /// Maximum file size in bytes
    pub max_file_size: u64,

    /// Route-like files whose contents are sampled for the profiler
    pub max_raw_contents: usize,

    /// Evidence entries kept per impact item
    pub max_evidence_per_item: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                "node_modules/**".to_string(),
                "dist/**".to_string(),
                ".git/**".to_string(),
                "target/**".to_string(),
                "vendor/**".to_string(),
                "__pycache__/**".to_string(),
                ".venv/**".to_string(),
                "build/**".to_string(),
            ],
            max_file_size: snapshot::MAX_FILE_SIZE,
            max_raw_contents: snapshot::MAX_RAW_CONTENTS,
            max_evidence_per_item: snapshot::MAX_EVIDENCE_PER_ITEM,
        }
    }
}

// =============================================================================
// Financial Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    /// Fully loaded weekly cost of one engineer
    pub weekly_rate: f64,

    /// Currency label used in the report
    pub currency: String,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            weekly_rate: financial::WEEKLY_ENGINEERING_RATE,
            currency: financial::CURRENCY.to_string(),
        }
    }
}

// =============================================================================
// Report Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Top-ranked recommendations that get steps, criteria and dependency links
    pub detailed_recommendations: usize,

    /// Emit Mermaid diagram sources in diagram-bearing sections
    pub include_diagrams: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            detailed_recommendations: priority::DETAILED_TOP_N,
            include_diagrams: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.report.detailed_recommendations, 5);
        assert!(config.project.project_type.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        let mut config = Config::default();
        config.financial.weekly_rate = 0.0;
        assert!(config.validate().is_err());

        config.financial.weekly_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_detail_count() {
        let mut config = Config::default();
        config.report.detailed_recommendations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_project_type_deserializes() {
        let config: Config = toml::from_str("[project]\ntype = \"full-stack\"\n").unwrap();
        assert_eq!(config.project.project_type, Some(ProjectType::FullStack));
    }
}
