//! Gap & Compliance Detection
//!
//! Finds architectural gaps and compliance issues that feed the
//! recommendation generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::classifier::ChangeContext;
use super::impact::ImpactAnalysis;
use super::profiler::{CurrentStateProfile, PATTERN_CONTAINERIZED, ProfilerInput};
use super::types::{ChangeType, Concept, ImpactKind, PostureLevel, RiskLevel};
use crate::types::Evidence;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapKind {
    MissingTests,
    MissingObservability,
    MissingCi,
    NoContainerization,
    MissingDataAbstraction,
    MissingIdentity,
    MissingApiContract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitecturalGap {
    pub kind: GapKind,
    pub area: String,
    pub description: String,
    pub severity: RiskLevel,
    pub evidence: Vec<Evidence>,
}

impl ArchitecturalGap {
    fn new(kind: GapKind, area: &str, description: impl Into<String>, severity: RiskLevel) -> Self {
        Self {
            kind,
            area: area.to_string(),
            description: description.into(),
            severity,
            evidence: Vec::new(),
        }
    }

    fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = evidence;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceFramework {
    #[serde(rename = "OWASP Top 10")]
    Owasp,
    #[serde(rename = "GDPR")]
    Gdpr,
    #[serde(rename = "PCI DSS")]
    PciDss,
    #[serde(rename = "HIPAA")]
    Hipaa,
    #[serde(rename = "SOC 2")]
    Soc2,
}

impl fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Owasp => "OWASP Top 10",
            Self::Gdpr => "GDPR",
            Self::PciDss => "PCI DSS",
            Self::Hipaa => "HIPAA",
            Self::Soc2 => "SOC 2",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    pub framework: ComplianceFramework,
    pub description: String,
    pub severity: RiskLevel,
}

// =============================================================================
// Gap Detector
// =============================================================================

const ABSTRACTION_FRAGMENTS: &[&str] = &[
    "repositor",
    "dao/",
    "adapters/",
    "data-access",
    "data_access",
    "dataaccess",
];

const API_CONTRACT_FRAGMENTS: &[&str] = &["openapi", "swagger", ".graphql", ".proto", "api-docs"];

#[derive(Debug, Default)]
pub struct GapDetector;

impl GapDetector {
    pub fn detect(
        &self,
        profile: &CurrentStateProfile,
        context: &ChangeContext,
        analysis: &ImpactAnalysis,
        input: &ProfilerInput,
    ) -> Vec<ArchitecturalGap> {
        let mut gaps = vec![];
        let paths: Vec<String> = input.files.iter().map(|f| f.to_lowercase()).collect();
        let any_path = |fragments: &[&str]| {
            paths
                .iter()
                .any(|p| fragments.iter().any(|f| p.contains(f)))
        };

        // Test coverage
        match profile.quality.test_coverage {
            PostureLevel::None => gaps.push(ArchitecturalGap::new(
                GapKind::MissingTests,
                "Quality",
                "No automated tests were found; changes cannot be verified safely",
                RiskLevel::High,
            )),
            PostureLevel::Low => gaps.push(ArchitecturalGap::new(
                GapKind::MissingTests,
                "Quality",
                "Test files are sparse relative to source files",
                RiskLevel::Medium,
            )),
            _ => {}
        }

        if profile.quality.monitoring_level == PostureLevel::None {
            gaps.push(ArchitecturalGap::new(
                GapKind::MissingObservability,
                "Operations",
                "No logging or metrics libraries were detected",
                RiskLevel::Medium,
            ));
        }

        if profile.file_count > 0 && !profile.quality.ci_configured {
            gaps.push(ArchitecturalGap::new(
                GapKind::MissingCi,
                "Delivery",
                "No continuous integration configuration was found",
                RiskLevel::Medium,
            ));
        }

        if context.has_concept(Concept::Infrastructure) && !profile.has_pattern(PATTERN_CONTAINERIZED)
        {
            gaps.push(ArchitecturalGap::new(
                GapKind::NoContainerization,
                "Infrastructure",
                "Infrastructure work is requested but the repository is not containerized",
                RiskLevel::Medium,
            ));
        }

        let database_change = context.has_concept(Concept::Database)
            || analysis
                .direct()
                .any(|i| i.change_type == ImpactKind::Schema);
        if context.change_type == ChangeType::Migration
            && database_change
            && !any_path(ABSTRACTION_FRAGMENTS)
        {
            let evidence = analysis
                .direct()
                .filter(|i| i.change_type == ImpactKind::Schema)
                .flat_map(|i| i.evidence.iter().cloned())
                .take(crate::constants::priority::MAX_EVIDENCE)
                .collect();
            gaps.push(
                ArchitecturalGap::new(
                    GapKind::MissingDataAbstraction,
                    "Data",
                    "Storage is accessed directly; no repository or adapter layer isolates the migration",
                    RiskLevel::High,
                )
                .with_evidence(evidence),
            );
        }

        if context.has_concept(Concept::Security) && !profile.has_authentication() {
            gaps.push(ArchitecturalGap::new(
                GapKind::MissingIdentity,
                "Security",
                "Security changes are requested but no identity or access capability exists",
                RiskLevel::High,
            ));
        }

        if context.has_concept(Concept::Api) && !any_path(API_CONTRACT_FRAGMENTS) {
            gaps.push(ArchitecturalGap::new(
                GapKind::MissingApiContract,
                "API",
                "No machine-readable API contract (OpenAPI, GraphQL schema, protobuf) was found",
                RiskLevel::Low,
            ));
        }

        debug!("Detected {} architectural gaps", gaps.len());
        gaps
    }
}

// =============================================================================
// Compliance Checker
// =============================================================================

const PERSONAL_DATA_TERMS: &[&str] = &[
    "personal data",
    "user data",
    "customer data",
    "email address",
    "pii",
    "gdpr",
    "privacy",
    "profile",
    "profiles",
];

const PAYMENT_TERMS: &[&str] = &[
    "payment",
    "payments",
    "credit card",
    "card",
    "cards",
    "billing",
    "checkout",
    "stripe",
    "pci",
];

const HEALTH_TERMS: &[&str] = &[
    "health",
    "healthcare",
    "patient",
    "patients",
    "medical",
    "hipaa",
    "phi",
    "clinical",
];

#[derive(Debug, Default)]
pub struct ComplianceChecker;

impl ComplianceChecker {
    pub fn check(
        &self,
        profile: &CurrentStateProfile,
        context: &ChangeContext,
        input: &ProfilerInput,
    ) -> Vec<ComplianceIssue> {
        let mut issues = vec![];

        if profile.file_count > 0 && !profile.has_authentication() {
            issues.push(ComplianceIssue {
                framework: ComplianceFramework::Owasp,
                description: "No authentication controls detected (broken access control risk)"
                    .to_string(),
                severity: RiskLevel::High,
            });
        }

        if mentions_any(context, PERSONAL_DATA_TERMS) {
            issues.push(ComplianceIssue {
                framework: ComplianceFramework::Gdpr,
                description: "Change touches personal data; consent, retention and erasure must be addressed"
                    .to_string(),
                severity: RiskLevel::Medium,
            });
        }

        if mentions_any(context, PAYMENT_TERMS) || profile.has_capability("Payments") {
            issues.push(ComplianceIssue {
                framework: ComplianceFramework::PciDss,
                description: "Payment data is in scope; cardholder data must stay out of application storage"
                    .to_string(),
                severity: RiskLevel::High,
            });
        }

        if mentions_any(context, HEALTH_TERMS) {
            issues.push(ComplianceIssue {
                framework: ComplianceFramework::Hipaa,
                description: "Health information is in scope; PHI access must be logged and encrypted"
                    .to_string(),
                severity: RiskLevel::High,
            });
        }

        let has_audit_trail = input
            .files
            .iter()
            .any(|f| f.to_lowercase().contains("audit"));
        if profile.quality.monitoring_level == PostureLevel::None && !has_audit_trail {
            issues.push(ComplianceIssue {
                framework: ComplianceFramework::Soc2,
                description: "No audit logging detected for change and access events".to_string(),
                severity: RiskLevel::Medium,
            });
        }

        debug!("Detected {} compliance issues", issues.len());
        issues
    }
}

/// Phrases match the raw text; single words match keywords or component names
fn mentions_any(context: &ChangeContext, terms: &[&str]) -> bool {
    let text = context.raw_text.to_lowercase();
    terms.iter().any(|term| {
        if term.contains(' ') {
            text.contains(term)
        } else {
            context.keywords.contains(*term) || context.components.iter().any(|c| c.name == *term)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::{Classifier, KeywordClassifier};
    use crate::pipeline::impact::ImpactAnalyzer;
    use crate::pipeline::profiler::RepositoryProfiler;

    fn run(text: &str, input: &ProfilerInput) -> (Vec<ArchitecturalGap>, Vec<ComplianceIssue>) {
        let profile = RepositoryProfiler::new().profile(input);
        let context = KeywordClassifier::new().classify(text);
        let analysis = ImpactAnalyzer::new().analyze(&profile, &context, input);
        (
            GapDetector.detect(&profile, &context, &analysis, input),
            ComplianceChecker.check(&profile, &context, input),
        )
    }

    fn has_gap(gaps: &[ArchitecturalGap], kind: GapKind) -> bool {
        gaps.iter().any(|g| g.kind == kind)
    }

    #[test]
    fn test_migration_without_abstraction_layer() {
        let input = ProfilerInput::new(vec![
            "src/vector/search.py".to_string(),
            "src/app.py".to_string(),
        ]);
        let (gaps, _) = run("Migrate from Pinecone to Qdrant", &input);

        let gap = gaps
            .iter()
            .find(|g| g.kind == GapKind::MissingDataAbstraction)
            .unwrap();
        assert_eq!(gap.severity, RiskLevel::High);
        assert!(!gap.evidence.is_empty());
    }

    #[test]
    fn test_repository_layer_closes_abstraction_gap() {
        let input = ProfilerInput::new(vec![
            "src/repositories/vector_repository.py".to_string(),
            "src/vector/search.py".to_string(),
        ]);
        let (gaps, _) = run("Migrate from Pinecone to Qdrant", &input);
        assert!(!has_gap(&gaps, GapKind::MissingDataAbstraction));
    }

    #[test]
    fn test_quality_gaps() {
        let input = ProfilerInput::new(vec!["src/app.js".to_string()]).with_dependency("express", "4");
        let (gaps, issues) = run("Add exports", &input);

        assert!(has_gap(&gaps, GapKind::MissingTests));
        assert!(has_gap(&gaps, GapKind::MissingObservability));
        assert!(has_gap(&gaps, GapKind::MissingCi));
        assert!(issues.iter().any(|i| i.framework == ComplianceFramework::Owasp));
        assert!(issues.iter().any(|i| i.framework == ComplianceFramework::Soc2));
    }

    #[test]
    fn test_scope_driven_gaps() {
        let input = ProfilerInput::new(vec!["src/app.js".to_string()]);
        let (gaps, _) = run("Deploy the API to Kubernetes with SSO login", &input);

        assert!(has_gap(&gaps, GapKind::NoContainerization));
        assert!(has_gap(&gaps, GapKind::MissingIdentity));
        assert!(has_gap(&gaps, GapKind::MissingApiContract));
    }

    #[test]
    fn test_compliance_keywords() {
        let input = ProfilerInput::default();
        let (_, issues) = run(
            "Store patient records and take card payments with Stripe, respecting user data rules",
            &input,
        );
        let frameworks: Vec<_> = issues.iter().map(|i| i.framework).collect();
        assert!(frameworks.contains(&ComplianceFramework::Gdpr));
        assert!(frameworks.contains(&ComplianceFramework::PciDss));
        assert!(frameworks.contains(&ComplianceFramework::Hipaa));
        // empty repository: nothing to judge for OWASP, monitoring unknown
        assert!(!frameworks.contains(&ComplianceFramework::Owasp));
        assert!(!frameworks.contains(&ComplianceFramework::Soc2));
    }
}
