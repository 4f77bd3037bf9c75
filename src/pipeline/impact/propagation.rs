//! Impact rule tables: concept targets and single-hop propagation.

use crate::pipeline::classifier::ComponentType;
use crate::pipeline::types::{Concept, Effort, ImpactKind, RiskLevel};

/// Canonical target for a concept the request names without a component
pub(crate) struct ConceptTarget {
    pub concept: Concept,
    pub target: &'static str,
    pub kind: ImpactKind,
    pub path_hints: &'static [&'static str],
    /// Suppressed when the request already names a component of this type
    pub natural_type: Option<ComponentType>,
}

pub(crate) const CONCEPT_TARGETS: &[ConceptTarget] = &[
    ConceptTarget {
        concept: Concept::Database,
        target: "Data Layer",
        kind: ImpactKind::Schema,
        path_hints: &["models/", "migrations/", "schema", "repositories/", "db/", "database"],
        natural_type: Some(ComponentType::Database),
    },
    ConceptTarget {
        concept: Concept::Api,
        target: "API Layer",
        kind: ImpactKind::Api,
        path_hints: &["routes/", "controllers/", "api/", "handlers/", "endpoints/"],
        natural_type: None,
    },
    ConceptTarget {
        concept: Concept::Security,
        target: "Authentication & Authorization",
        kind: ImpactKind::Config,
        path_hints: &["auth", "security", "permission", "jwt", "session"],
        natural_type: None,
    },
    ConceptTarget {
        concept: Concept::Frontend,
        target: "User Interface",
        kind: ImpactKind::Build,
        path_hints: &["components/", "pages/", "views/", ".jsx", ".tsx", ".vue", ".css"],
        natural_type: Some(ComponentType::Framework),
    },
    ConceptTarget {
        concept: Concept::Backend,
        target: "Service Layer",
        kind: ImpactKind::Logic,
        path_hints: &["services/", "server", "workers/", "lib/"],
        natural_type: Some(ComponentType::Framework),
    },
    ConceptTarget {
        concept: Concept::Infrastructure,
        target: "Deployment Infrastructure",
        kind: ImpactKind::Infra,
        path_hints: &["dockerfile", "docker-compose", "k8s/", "helm/", "terraform", ".tf"],
        natural_type: Some(ComponentType::Infrastructure),
    },
    ConceptTarget {
        concept: Concept::Integration,
        target: "External Integrations",
        kind: ImpactKind::Config,
        path_hints: &["integrations/", "clients/", "webhook", "adapters/", "sdk"],
        natural_type: Some(ComponentType::Service),
    },
    ConceptTarget {
        concept: Concept::Testing,
        target: "Test Suite",
        kind: ImpactKind::Tests,
        path_hints: &["test", "spec", "__tests__"],
        natural_type: None,
    },
];

/// Secondary impact implied by a direct impact of a given kind
pub(crate) struct PropagationRule {
    pub trigger: ImpactKind,
    pub target: &'static str,
    pub kind: ImpactKind,
    pub effort: Effort,
    pub risk: RiskLevel,
    /// Wildcard evidence path
    pub evidence_glob: &'static str,
}

pub(crate) const PROPAGATION_RULES: &[PropagationRule] = &[
    PropagationRule {
        trigger: ImpactKind::Schema,
        target: "Data Access Layer",
        kind: ImpactKind::Logic,
        effort: Effort::M,
        risk: RiskLevel::Medium,
        evidence_glob: "**/models/**",
    },
    PropagationRule {
        trigger: ImpactKind::Api,
        target: "API Consumers",
        kind: ImpactKind::Api,
        effort: Effort::M,
        risk: RiskLevel::Medium,
        evidence_glob: "**/api/**",
    },
    PropagationRule {
        trigger: ImpactKind::Infra,
        target: "CI/CD Pipeline",
        kind: ImpactKind::Build,
        effort: Effort::S,
        risk: RiskLevel::Medium,
        evidence_glob: ".github/workflows/*",
    },
    PropagationRule {
        trigger: ImpactKind::Config,
        target: "Configuration & Secrets",
        kind: ImpactKind::Config,
        effort: Effort::S,
        risk: RiskLevel::Medium,
        evidence_glob: "**/config/**",
    },
    PropagationRule {
        trigger: ImpactKind::Logic,
        target: "Regression Test Suite",
        kind: ImpactKind::Tests,
        effort: Effort::M,
        risk: RiskLevel::Low,
        evidence_glob: "**/test*/**",
    },
];

pub(crate) fn rule_for(trigger: ImpactKind) -> Option<&'static PropagationRule> {
    PROPAGATION_RULES.iter().find(|rule| rule.trigger == trigger)
}
