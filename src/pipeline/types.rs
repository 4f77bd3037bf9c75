//! Core types shared by the assessment pipeline stages
//!
//! - Classification enums: Concept, ChangeType, Scope
//! - Impact enums: ImpactKind, Effort, RiskLevel
//! - Profile enums: ComplexityLevel, PostureLevel, ProjectType

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{impact, priority};

// =============================================================================
// Change Classification
// =============================================================================

/// Topic tag detected in change-request text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concept {
    Database,
    Api,
    Security,
    Frontend,
    Backend,
    Infrastructure,
    Migration,
    Performance,
    Integration,
    Testing,
}

impl Concept {
    pub const ALL: [Concept; 10] = [
        Concept::Database,
        Concept::Api,
        Concept::Security,
        Concept::Frontend,
        Concept::Backend,
        Concept::Infrastructure,
        Concept::Migration,
        Concept::Performance,
        Concept::Integration,
        Concept::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Api => "api",
            Self::Security => "security",
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Infrastructure => "infrastructure",
            Self::Migration => "migration",
            Self::Performance => "performance",
            Self::Integration => "integration",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of change requested. Resolution order is fixed, see the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Migration,
    Feature,
    Bugfix,
    Optimization,
    Refactoring,
    Integration,
    Upgrade,
    Scaling,
    #[default]
    Enhancement,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Feature => "feature",
            Self::Bugfix => "bugfix",
            Self::Optimization => "optimization",
            Self::Refactoring => "refactoring",
            Self::Integration => "integration",
            Self::Upgrade => "upgrade",
            Self::Scaling => "scaling",
            Self::Enhancement => "enhancement",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse size classification of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Small,
    #[default]
    Medium,
    Large,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

// =============================================================================
// Impact Estimates
// =============================================================================

/// What kind of change an impact item predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactKind {
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "schema")]
    Schema,
    #[serde(rename = "config")]
    Config,
    #[serde(rename = "infra")]
    Infra,
    #[serde(rename = "build")]
    Build,
    #[serde(rename = "tests")]
    Tests,
    #[serde(rename = "logic")]
    Logic,
}

impl fmt::Display for ImpactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Api => "API",
            Self::Schema => "schema",
            Self::Config => "config",
            Self::Infra => "infra",
            Self::Build => "build",
            Self::Tests => "tests",
            Self::Logic => "logic",
        };
        f.write_str(s)
    }
}

/// T-shirt effort estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Effort {
    S,
    M,
    L,
    XL,
}

impl Effort {
    /// Bucket a matched-file count: <5 S, <15 M, <30 L, else XL
    pub fn from_file_count(count: usize) -> Self {
        if count < impact::EFFORT_S_BELOW {
            Effort::S
        } else if count < impact::EFFORT_M_BELOW {
            Effort::M
        } else if count < impact::EFFORT_L_BELOW {
            Effort::L
        } else {
            Effort::XL
        }
    }

    /// Priority penalty for this effort level
    pub fn penalty(&self) -> i32 {
        match self {
            Effort::S => priority::PENALTY_S,
            Effort::M => priority::PENALTY_M,
            Effort::L => priority::PENALTY_L,
            Effort::XL => priority::PENALTY_XL,
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Effort::S => "S",
            Effort::M => "M",
            Effort::L => "L",
            Effort::XL => "XL",
        };
        f.write_str(s)
    }
}

/// Risk severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// =============================================================================
// Profile Levels
// =============================================================================

/// Repository complexity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Level of a quality-posture dimension. `Unknown` means the signal was not
/// observable, which is distinct from `None` (observed and absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostureLevel {
    High,
    Medium,
    Low,
    None,
    #[default]
    Unknown,
}

impl PostureLevel {
    /// Whether the dimension was observed to be present at any level
    pub fn is_present(&self) -> bool {
        matches!(self, Self::High | Self::Medium | Self::Low)
    }
}

impl fmt::Display for PostureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::None => write!(f, "none"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Closed classification of the profiled repository. Report sections pick
/// their strategy from this through a single dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Backend,
    Frontend,
    FullStack,
    DataPlatform,
    Library,
    Monorepo,
    #[default]
    Unknown,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend => write!(f, "backend"),
            Self::Frontend => write!(f, "frontend"),
            Self::FullStack => write!(f, "full-stack"),
            Self::DataPlatform => write!(f, "data-platform"),
            Self::Library => write!(f, "library"),
            Self::Monorepo => write!(f, "monorepo"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effort_buckets() {
        assert_eq!(Effort::from_file_count(0), Effort::S);
        assert_eq!(Effort::from_file_count(4), Effort::S);
        assert_eq!(Effort::from_file_count(5), Effort::M);
        assert_eq!(Effort::from_file_count(14), Effort::M);
        assert_eq!(Effort::from_file_count(15), Effort::L);
        assert_eq!(Effort::from_file_count(20), Effort::L);
        assert_eq!(Effort::from_file_count(29), Effort::L);
        assert_eq!(Effort::from_file_count(30), Effort::XL);
    }

    #[test]
    fn test_effort_penalty_table() {
        assert_eq!(Effort::S.penalty(), 2);
        assert_eq!(Effort::M.penalty(), 0);
        assert_eq!(Effort::L.penalty(), -3);
        assert_eq!(Effort::XL.penalty(), -6);
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert_eq!(RiskLevel::Low.max(RiskLevel::High), RiskLevel::High);
    }

    #[test]
    fn test_impact_kind_serialization() {
        assert_eq!(serde_json::to_string(&ImpactKind::Api).unwrap(), "\"API\"");
        assert_eq!(
            serde_json::to_string(&ImpactKind::Schema).unwrap(),
            "\"schema\""
        );
    }

    #[test]
    fn test_unknown_is_a_valid_level() {
        assert!(!PostureLevel::Unknown.is_present());
        assert!(!PostureLevel::None.is_present());
        assert!(PostureLevel::Low.is_present());
        assert_eq!(
            serde_json::to_string(&PostureLevel::Unknown).unwrap(),
            "\"unknown\""
        );
    }
}
