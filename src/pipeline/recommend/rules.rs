//! Recommendation Rule Registry
//!
//! Each rule is a template recommendation with baked-in impact, confidence,
//! effort and risk, plus a trigger over the upstream artifacts.

use super::Category;
use crate::pipeline::classifier::{ChangeContext, ComponentType};
use crate::pipeline::gaps::{ArchitecturalGap, ComplianceFramework, ComplianceIssue, GapKind};
use crate::pipeline::impact::ImpactAnalysis;
use crate::pipeline::profiler::{
    CurrentStateProfile, PATTERN_MODULAR, PATTERN_SERVICE_ORIENTED, TechType,
};
use crate::pipeline::types::{ChangeType, Concept, Effort, ImpactKind, PostureLevel, RiskLevel, Scope};

/// Everything a rule trigger may look at
pub(crate) struct RuleContext<'a> {
    pub profile: &'a CurrentStateProfile,
    pub context: &'a ChangeContext,
    pub analysis: &'a ImpactAnalysis,
    pub gaps: &'a [ArchitecturalGap],
    pub compliance: &'a [ComplianceIssue],
}

impl RuleContext<'_> {
    fn has_gap(&self, kind: GapKind) -> bool {
        self.gaps.iter().any(|g| g.kind == kind)
    }

    fn has_issue(&self, framework: ComplianceFramework) -> bool {
        self.compliance.iter().any(|i| i.framework == framework)
    }

    fn touches_database(&self) -> bool {
        self.context.has_concept(Concept::Database)
            || self.context.components_of(ComponentType::Database).next().is_some()
    }
}

/// Where a recommendation's evidence comes from
#[derive(Debug, Clone, Copy)]
pub(crate) enum EvidenceSource {
    /// Evidence of impact items of this kind
    Impact(ImpactKind),
    /// Evidence of every direct impact item
    AnyDirect,
    /// Evidence attached to a gap
    Gap(GapKind),
    None,
}

pub(crate) struct RecommendationRule {
    pub category: Category,
    pub title: &'static str,
    pub why: &'static str,
    pub how: &'static str,
    pub effort: Effort,
    pub risk: RiskLevel,
    pub impact: u8,
    pub confidence: u8,
    /// 1 = foundation, 2 = execution
    pub stage: u8,
    pub owners: &'static [&'static str],
    pub evidence: EvidenceSource,
    pub steps: &'static [&'static str],
    pub criteria: &'static [&'static str],
    pub trigger: fn(&RuleContext<'_>) -> bool,
}

/// Dependency pairs: a recommendation whose title contains the first
/// fragment depends on one whose title contains the second.
pub(crate) const DEPENDENCY_RULES: &[(&str, &str)] = &[
    ("Migration", "Abstraction"),
    ("Horizontal Scaling", "Caching"),
    ("Compliance", "Authentication"),
];

// =============================================================================
// Triggers
// =============================================================================

fn database_migration(ctx: &RuleContext<'_>) -> bool {
    ctx.context.change_type == ChangeType::Migration && ctx.touches_database()
}

fn service_boundaries(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.has_pattern(PATTERN_MODULAR)
        && !ctx.profile.has_pattern(PATTERN_SERVICE_ORIENTED)
        && (ctx.context.scope == Scope::Large || ctx.context.change_type == ChangeType::Refactoring)
}

fn api_contract(ctx: &RuleContext<'_>) -> bool {
    ctx.has_gap(GapKind::MissingApiContract)
}

fn caching(ctx: &RuleContext<'_>) -> bool {
    (ctx.context.has_concept(Concept::Performance) || ctx.context.change_type == ChangeType::Scaling)
        && !ctx.profile.has_capability("Caching")
}

fn horizontal_scaling(ctx: &RuleContext<'_>) -> bool {
    ctx.context.change_type == ChangeType::Scaling
        || (ctx.context.has_concept(Concept::Performance) && ctx.context.scope == Scope::Large)
}

const VECTOR_STORES: &[&str] = &["qdrant", "pinecone", "weaviate", "chroma", "milvus", "pgvector"];

fn vector_benchmark(ctx: &RuleContext<'_>) -> bool {
    ctx.context
        .components
        .iter()
        .any(|c| VECTOR_STORES.contains(&c.name.as_str()))
}

fn data_access_optimization(ctx: &RuleContext<'_>) -> bool {
    ctx.context.change_type == ChangeType::Optimization && ctx.touches_database()
}

fn authentication(ctx: &RuleContext<'_>) -> bool {
    ctx.context.has_concept(Concept::Security)
        || ctx.has_gap(GapKind::MissingIdentity)
        || ctx.has_issue(ComplianceFramework::Owasp)
}

fn compliance_controls(ctx: &RuleContext<'_>) -> bool {
    ctx.has_issue(ComplianceFramework::Gdpr)
        || ctx.has_issue(ComplianceFramework::PciDss)
        || ctx.has_issue(ComplianceFramework::Hipaa)
}

fn secrets(ctx: &RuleContext<'_>) -> bool {
    ctx.analysis.has_kind(ImpactKind::Config)
}

fn test_coverage(ctx: &RuleContext<'_>) -> bool {
    ctx.has_gap(GapKind::MissingTests)
}

fn continuous_integration(ctx: &RuleContext<'_>) -> bool {
    ctx.has_gap(GapKind::MissingCi)
}

fn architecture_records(ctx: &RuleContext<'_>) -> bool {
    matches!(
        ctx.profile.quality.documentation_level,
        PostureLevel::None | PostureLevel::Low
    ) || ctx.context.scope == Scope::Large
}

fn observability(ctx: &RuleContext<'_>) -> bool {
    ctx.has_gap(GapKind::MissingObservability) || ctx.has_issue(ComplianceFramework::Soc2)
}

fn containerization(ctx: &RuleContext<'_>) -> bool {
    ctx.has_gap(GapKind::NoContainerization)
}

fn staged_rollout(ctx: &RuleContext<'_>) -> bool {
    ctx.context.change_type == ChangeType::Migration
        || ctx.analysis.max_risk().is_some_and(|r| r >= RiskLevel::High)
}

fn infrastructure_spend(ctx: &RuleContext<'_>) -> bool {
    ctx.context.has_concept(Concept::Infrastructure) || ctx.context.change_type == ChangeType::Scaling
}

fn overlapping_stores(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.tech_of_type(TechType::Database).count() >= 3
}

// =============================================================================
// Registry
// =============================================================================

pub(crate) const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    // ===== Architecture & Modularity =====
    RecommendationRule {
        category: Category::ArchitectureModularity,
        title: "Implement Abstraction Layer",
        why: "Storage calls are bound to a specific vendor; an abstraction isolates the migration and keeps rollback possible",
        how: "Introduce a repository interface for reads and writes, route existing calls through it, then add the new backend as a second implementation",
        effort: Effort::M,
        risk: RiskLevel::Medium,
        impact: 5,
        confidence: 4,
        stage: 1,
        owners: &["Backend Team", "Architecture"],
        evidence: EvidenceSource::Impact(ImpactKind::Schema),
        steps: &[
            "Inventory every call site that talks to the current store",
            "Define a storage interface covering those operations",
            "Move call sites behind the interface with no behavior change",
            "Add the target store as a second implementation behind a flag",
        ],
        criteria: &[
            "No module outside the data layer imports the storage client",
            "Both implementations pass the same contract test suite",
        ],
        trigger: database_migration,
    },
    RecommendationRule {
        category: Category::ArchitectureModularity,
        title: "Execute Phased Data Migration",
        why: "Moving data in one cut-over concentrates risk; dual writes and backfill let the switch be verified before it is final",
        how: "Dual-write to both stores, backfill history, compare reads in shadow mode, then flip reads and retire the old store",
        effort: Effort::L,
        risk: RiskLevel::High,
        impact: 5,
        confidence: 3,
        stage: 2,
        owners: &["Backend Team", "Data Engineering"],
        evidence: EvidenceSource::Gap(GapKind::MissingDataAbstraction),
        steps: &[
            "Enable dual writes through the abstraction layer",
            "Backfill historical records in batches with checksums",
            "Shadow-read from the target store and compare results",
            "Switch reads, monitor, then decommission the source store",
        ],
        criteria: &[
            "Record counts and checksums match between stores",
            "Shadow-read mismatch rate stays below the agreed threshold for a full week",
            "Rollback to the source store is rehearsed",
        ],
        trigger: database_migration,
    },
    RecommendationRule {
        category: Category::ArchitectureModularity,
        title: "Introduce Service Boundaries",
        why: "The codebase is large but not split into services; explicit module boundaries keep the change from spreading",
        how: "Identify bounded contexts from directory structure and ownership, then enforce them with module-level interfaces",
        effort: Effort::L,
        risk: RiskLevel::Medium,
        impact: 4,
        confidence: 3,
        stage: 1,
        owners: &["Architecture"],
        evidence: EvidenceSource::AnyDirect,
        steps: &[
            "Map modules to business capabilities",
            "Define public interfaces for each boundary",
            "Add dependency checks that fail on boundary violations",
        ],
        criteria: &["Cross-boundary imports only go through published interfaces"],
        trigger: service_boundaries,
    },
    RecommendationRule {
        category: Category::ArchitectureModularity,
        title: "Publish API Contract",
        why: "Consumers depend on undocumented behavior; a machine-readable contract makes API changes reviewable",
        how: "Generate or write an OpenAPI description for the affected endpoints and validate it in CI",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 3,
        confidence: 4,
        stage: 1,
        owners: &["API Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Api),
        steps: &[
            "Describe the affected endpoints in OpenAPI",
            "Add contract validation to the test suite",
        ],
        criteria: &["Every changed endpoint is covered by the published contract"],
        trigger: api_contract,
    },
    // ===== Performance & Scalability =====
    RecommendationRule {
        category: Category::PerformanceScalability,
        title: "Add Caching Layer",
        why: "Repeated reads hit the primary store; a cache reduces latency and load before any scaling work",
        how: "Cache hot read paths with explicit TTLs and invalidation on write",
        effort: Effort::M,
        risk: RiskLevel::Low,
        impact: 4,
        confidence: 4,
        stage: 1,
        owners: &["Backend Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Schema),
        steps: &[
            "Profile read paths and pick the top hot keys",
            "Introduce a cache with TTL and write-through invalidation",
            "Expose hit-rate metrics",
        ],
        criteria: &["p95 read latency on cached paths improves measurably", "Cache hit rate is reported"],
        trigger: caching,
    },
    RecommendationRule {
        category: Category::PerformanceScalability,
        title: "Enable Horizontal Scaling",
        why: "Growth requires more instances; state held in process prevents adding them",
        how: "Externalize session and job state, make instances stateless, then autoscale on load metrics",
        effort: Effort::L,
        risk: RiskLevel::Medium,
        impact: 4,
        confidence: 3,
        stage: 2,
        owners: &["Platform Team", "Backend Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Infra),
        steps: &[
            "Move in-process state to shared stores",
            "Add health checks and graceful shutdown",
            "Configure autoscaling policies from load tests",
        ],
        criteria: &["Load test at twice current peak passes with added instances"],
        trigger: horizontal_scaling,
    },
    RecommendationRule {
        category: Category::PerformanceScalability,
        title: "Benchmark Vector Search Performance",
        why: "Vector stores differ in recall and latency; a benchmark on real embeddings prevents a silent quality regression",
        how: "Replay a sample of production queries against both stores and compare recall@k and latency",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 3,
        confidence: 4,
        stage: 2,
        owners: &["ML Engineering"],
        evidence: EvidenceSource::Impact(ImpactKind::Schema),
        steps: &[
            "Export a representative query and embedding sample",
            "Run recall@k and latency benchmarks on both stores",
        ],
        criteria: &["Recall@10 on the target store is within agreed tolerance of the source"],
        trigger: vector_benchmark,
    },
    RecommendationRule {
        category: Category::PerformanceScalability,
        title: "Optimize Data Access Paths",
        why: "Slow queries dominate response time; indexing and query shaping are cheaper than new infrastructure",
        how: "Capture slow-query logs, add missing indexes and remove N+1 access patterns",
        effort: Effort::M,
        risk: RiskLevel::Low,
        impact: 3,
        confidence: 3,
        stage: 2,
        owners: &["Backend Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Schema),
        steps: &["Enable slow-query logging", "Add indexes for the top offenders"],
        criteria: &["No query in the hot path exceeds the latency budget"],
        trigger: data_access_optimization,
    },
    // ===== Security & Compliance =====
    RecommendationRule {
        category: Category::SecurityCompliance,
        title: "Strengthen Authentication & Authorization",
        why: "Access control is missing or about to change; it must be in place before sensitive features ship",
        how: "Centralize authentication in middleware, enforce role checks per route and rotate signing keys",
        effort: Effort::M,
        risk: RiskLevel::Medium,
        impact: 5,
        confidence: 4,
        stage: 1,
        owners: &["Security Team", "Backend Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Config),
        steps: &[
            "Route every request through a single authentication middleware",
            "Define roles and enforce them per endpoint",
            "Add tests for unauthorized and forbidden paths",
        ],
        criteria: &[
            "Every non-public endpoint rejects unauthenticated requests",
            "Authorization failures are logged",
        ],
        trigger: authentication,
    },
    RecommendationRule {
        category: Category::SecurityCompliance,
        title: "Establish Compliance Controls",
        why: "Regulated data is in scope; controls must exist before the change reaches production",
        how: "Classify regulated fields, encrypt them at rest, restrict access and document retention",
        effort: Effort::M,
        risk: RiskLevel::Medium,
        impact: 4,
        confidence: 3,
        stage: 2,
        owners: &["Security Team", "Legal & Compliance"],
        evidence: EvidenceSource::None,
        steps: &[
            "Tag regulated fields in the data model",
            "Encrypt regulated fields at rest",
            "Document retention and erasure procedures",
        ],
        criteria: &["A data inventory lists every regulated field with its control"],
        trigger: compliance_controls,
    },
    RecommendationRule {
        category: Category::SecurityCompliance,
        title: "Manage Secrets Centrally",
        why: "New credentials and configuration are introduced; scattered secrets leak and drift",
        how: "Move credentials to a secret manager and inject them at deploy time",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 3,
        confidence: 4,
        stage: 1,
        owners: &["Platform Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Config),
        steps: &["Inventory credentials in code and config", "Load them from a secret manager"],
        criteria: &["No credential is committed to the repository"],
        trigger: secrets,
    },
    // ===== Developer Experience =====
    RecommendationRule {
        category: Category::DeveloperExperience,
        title: "Expand Automated Test Coverage",
        why: "Without tests the change cannot be verified or safely rolled back",
        how: "Add characterization tests around the affected modules before modifying them",
        effort: Effort::M,
        risk: RiskLevel::Low,
        impact: 4,
        confidence: 5,
        stage: 1,
        owners: &["QA", "Backend Team"],
        evidence: EvidenceSource::AnyDirect,
        steps: &[
            "Write characterization tests for affected modules",
            "Run the suite on every pull request",
        ],
        criteria: &["Every affected module has tests that fail on behavior change"],
        trigger: test_coverage,
    },
    RecommendationRule {
        category: Category::DeveloperExperience,
        title: "Set Up Continuous Integration",
        why: "No pipeline builds and tests changes automatically, so regressions reach main unnoticed",
        how: "Add a CI workflow that builds, lints and tests every pull request",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 4,
        confidence: 5,
        stage: 1,
        owners: &["Platform Team"],
        evidence: EvidenceSource::None,
        steps: &["Add a CI workflow for build and test", "Require it to pass before merge"],
        criteria: &["Every pull request shows a CI status"],
        trigger: continuous_integration,
    },
    RecommendationRule {
        category: Category::DeveloperExperience,
        title: "Document Architecture Decisions",
        why: "Design intent is not written down; decisions made during this change will be lost",
        how: "Record each significant decision as a short ADR next to the code",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 2,
        confidence: 4,
        stage: 1,
        owners: &["Architecture"],
        evidence: EvidenceSource::None,
        steps: &["Create an ADR directory and template", "Record the decisions for this change"],
        criteria: &["Each major decision has an ADR with context and consequences"],
        trigger: architecture_records,
    },
    // ===== Operational Excellence =====
    RecommendationRule {
        category: Category::OperationalExcellence,
        title: "Add Structured Logging & Metrics",
        why: "Failures after the change would be invisible without logs and metrics",
        how: "Adopt a structured logger, emit request and error metrics, and alert on error rate",
        effort: Effort::M,
        risk: RiskLevel::Low,
        impact: 4,
        confidence: 4,
        stage: 1,
        owners: &["Platform Team", "SRE"],
        evidence: EvidenceSource::None,
        steps: &[
            "Introduce a structured logger with request correlation",
            "Export latency and error metrics",
            "Alert on error-rate thresholds",
        ],
        criteria: &["Dashboards show latency and error rate for affected services"],
        trigger: observability,
    },
    RecommendationRule {
        category: Category::OperationalExcellence,
        title: "Containerize Services",
        why: "Infrastructure work needs reproducible builds and environments",
        how: "Add a Dockerfile per deployable and a compose file for local development",
        effort: Effort::M,
        risk: RiskLevel::Low,
        impact: 3,
        confidence: 4,
        stage: 1,
        owners: &["Platform Team"],
        evidence: EvidenceSource::Impact(ImpactKind::Infra),
        steps: &["Write a Dockerfile per deployable", "Add a compose file for local runs"],
        criteria: &["Every deployable builds into an image in CI"],
        trigger: containerization,
    },
    RecommendationRule {
        category: Category::OperationalExcellence,
        title: "Plan Staged Rollout with Rollback",
        why: "High-risk changes need a way back; staged exposure limits blast radius",
        how: "Release behind a feature flag to a small cohort, watch health metrics, then widen",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 4,
        confidence: 4,
        stage: 2,
        owners: &["SRE", "Product"],
        evidence: EvidenceSource::AnyDirect,
        steps: &[
            "Put the change behind a feature flag",
            "Define rollout cohorts and health gates",
            "Rehearse the rollback",
        ],
        criteria: &["Rollback completes within the agreed time in a rehearsal"],
        trigger: staged_rollout,
    },
    // ===== Cost Optimization =====
    RecommendationRule {
        category: Category::CostOptimization,
        title: "Right-size Infrastructure Spend",
        why: "Infrastructure changes are a chance to drop idle capacity",
        how: "Review utilization, reserve steady capacity and autoscale the rest",
        effort: Effort::S,
        risk: RiskLevel::Low,
        impact: 2,
        confidence: 3,
        stage: 2,
        owners: &["Platform Team", "Finance"],
        evidence: EvidenceSource::Impact(ImpactKind::Infra),
        steps: &["Collect a month of utilization data", "Resize or reserve capacity"],
        criteria: &["Monthly infrastructure cost per request drops"],
        trigger: infrastructure_spend,
    },
    RecommendationRule {
        category: Category::CostOptimization,
        title: "Consolidate Overlapping Data Stores",
        why: "Several data stores overlap in purpose, multiplying licensing and operational cost",
        how: "Map each store to its workloads and retire the ones a remaining store already covers",
        effort: Effort::M,
        risk: RiskLevel::Medium,
        impact: 2,
        confidence: 3,
        stage: 2,
        owners: &["Architecture", "Data Engineering"],
        evidence: EvidenceSource::None,
        steps: &["Map stores to workloads", "Plan retirement of redundant stores"],
        criteria: &["Each remaining store has a distinct workload"],
        trigger: overlapping_stores,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_scores_in_range() {
        for rule in RECOMMENDATION_RULES {
            assert!((1..=5).contains(&rule.impact), "{}", rule.title);
            assert!((1..=5).contains(&rule.confidence), "{}", rule.title);
            assert!(rule.stage == 1 || rule.stage == 2, "{}", rule.title);
            assert!(!rule.steps.is_empty(), "{}", rule.title);
        }
    }

    #[test]
    fn test_dependency_rules_point_to_earlier_stages() {
        for (dependent, prerequisite) in DEPENDENCY_RULES {
            for d in RECOMMENDATION_RULES.iter().filter(|r| r.title.contains(dependent)) {
                for p in RECOMMENDATION_RULES
                    .iter()
                    .filter(|r| r.title.contains(prerequisite))
                {
                    assert!(p.stage < d.stage, "{} -> {}", d.title, p.title);
                }
            }
        }
    }
}
