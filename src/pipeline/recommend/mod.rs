//! Recommendation Generator
//!
//! Derives categorized, scored recommendations from the impact analysis plus
//! gap and compliance findings.
//!
//! ## Priority
//! `priority = impact * confidence + effort_penalty` with penalties
//! `{S: +2, M: 0, L: -3, XL: -6}`. Ties fall back to category order, then to
//! rule-table order. IDs are assigned after sorting, so `REC-001` is always
//! the top recommendation.
//!
//! Only the top N recommendations receive implementation steps, acceptance
//! criteria and dependency links.

mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use self::rules::{DEPENDENCY_RULES, EvidenceSource, RECOMMENDATION_RULES, RecommendationRule, RuleContext};
use super::classifier::ChangeContext;
use super::gaps::{ArchitecturalGap, ComplianceChecker, ComplianceIssue, GapDetector};
use super::impact::ImpactAnalysis;
use super::profiler::{CurrentStateProfile, ProfilerInput};
use super::types::{Effort, RiskLevel};
use crate::constants::priority;
use crate::types::{Evidence, RecommendationId};

// =============================================================================
// Types
// =============================================================================

/// Recommendation category in stable tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Architecture & Modularity")]
    ArchitectureModularity,
    #[serde(rename = "Performance & Scalability")]
    PerformanceScalability,
    #[serde(rename = "Security & Compliance")]
    SecurityCompliance,
    #[serde(rename = "Developer Experience")]
    DeveloperExperience,
    #[serde(rename = "Operational Excellence")]
    OperationalExcellence,
    #[serde(rename = "Cost Optimization")]
    CostOptimization,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ArchitectureModularity,
        Category::PerformanceScalability,
        Category::SecurityCompliance,
        Category::DeveloperExperience,
        Category::OperationalExcellence,
        Category::CostOptimization,
    ];

    pub fn is_risk_reducing(&self) -> bool {
        matches!(self, Self::SecurityCompliance | Self::OperationalExcellence)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ArchitectureModularity => "Architecture & Modularity",
            Self::PerformanceScalability => "Performance & Scalability",
            Self::SecurityCompliance => "Security & Compliance",
            Self::DeveloperExperience => "Developer Experience",
            Self::OperationalExcellence => "Operational Excellence",
            Self::CostOptimization => "Cost Optimization",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: RecommendationId,
    pub category: Category,
    pub title: String,
    pub why: String,
    pub how: String,
    pub effort: Effort,
    pub risk: RiskLevel,
    pub impact: u8,
    pub confidence: u8,
    pub priority: i32,
    pub stage: u8,
    pub owners: Vec<String>,
    pub evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<RecommendationId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance_criteria: Vec<String>,
}

impl Recommendation {
    pub fn is_detailed(&self) -> bool {
        !self.implementation_steps.is_empty()
    }
}

/// `impact * confidence + effort_penalty`
pub fn compute_priority(impact: u8, confidence: u8, effort: Effort) -> i32 {
    i32::from(impact) * i32::from(confidence) + effort.penalty()
}

/// Recommendations together with the findings that produced them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
    pub gaps: Vec<ArchitecturalGap>,
    pub compliance_issues: Vec<ComplianceIssue>,
}

impl RecommendationSet {
    pub fn get(&self, id: &RecommendationId) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| &r.id == id)
    }
}

// =============================================================================
// Generator
// =============================================================================

pub struct RecommendationGenerator {
    detailed_top_n: usize,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self {
            detailed_top_n: priority::DETAILED_TOP_N,
        }
    }
}

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detailed_top_n(mut self, n: usize) -> Self {
        self.detailed_top_n = n;
        self
    }

    /// Detect gaps and compliance issues, then generate recommendations
    pub fn generate(
        &self,
        profile: &CurrentStateProfile,
        context: &ChangeContext,
        analysis: &ImpactAnalysis,
        input: &ProfilerInput,
    ) -> RecommendationSet {
        let gaps = GapDetector.detect(profile, context, analysis, input);
        let compliance = ComplianceChecker.check(profile, context, input);
        self.generate_with_findings(profile, context, analysis, gaps, compliance)
    }

    /// Generate recommendations from previously computed findings
    pub fn generate_with_findings(
        &self,
        profile: &CurrentStateProfile,
        context: &ChangeContext,
        analysis: &ImpactAnalysis,
        gaps: Vec<ArchitecturalGap>,
        compliance_issues: Vec<ComplianceIssue>,
    ) -> RecommendationSet {
        let rule_ctx = RuleContext {
            profile,
            context,
            analysis,
            gaps: &gaps,
            compliance: &compliance_issues,
        };

        let mut triggered: Vec<(usize, &RecommendationRule)> = RECOMMENDATION_RULES
            .iter()
            .enumerate()
            .filter(|(_, rule)| (rule.trigger)(&rule_ctx))
            .collect();

        triggered.sort_by(|(ia, a), (ib, b)| {
            let pa = compute_priority(a.impact, a.confidence, a.effort);
            let pb = compute_priority(b.impact, b.confidence, b.effort);
            pb.cmp(&pa)
                .then(a.category.cmp(&b.category))
                .then(ia.cmp(ib))
        });

        let mut recommendations: Vec<Recommendation> = triggered
            .iter()
            .enumerate()
            .map(|(rank, (_, rule))| Self::instantiate(rule, rank + 1, &rule_ctx))
            .collect();

        self.attach_details(&mut recommendations);

        info!(
            recommendations = recommendations.len(),
            gaps = gaps.len(),
            compliance = compliance_issues.len(),
            "Generated recommendations"
        );

        RecommendationSet {
            recommendations,
            gaps,
            compliance_issues,
        }
    }

    fn instantiate(rule: &RecommendationRule, rank: usize, ctx: &RuleContext<'_>) -> Recommendation {
        Recommendation {
            id: RecommendationId::from_rank(rank),
            category: rule.category,
            title: rule.title.to_string(),
            why: rule.why.to_string(),
            how: rule.how.to_string(),
            effort: rule.effort,
            risk: rule.risk,
            impact: rule.impact,
            confidence: rule.confidence,
            priority: compute_priority(rule.impact, rule.confidence, rule.effort),
            stage: rule.stage,
            owners: rule.owners.iter().map(|o| o.to_string()).collect(),
            evidence: Self::collect_evidence(rule.evidence, ctx),
            dependencies: Vec::new(),
            implementation_steps: Vec::new(),
            acceptance_criteria: Vec::new(),
        }
    }

    fn collect_evidence(source: EvidenceSource, ctx: &RuleContext<'_>) -> Vec<Evidence> {
        let mut evidence: Vec<Evidence> = match source {
            EvidenceSource::Impact(kind) => ctx
                .analysis
                .items
                .iter()
                .filter(|i| i.change_type == kind)
                .flat_map(|i| i.evidence.iter().cloned())
                .collect(),
            EvidenceSource::AnyDirect => ctx
                .analysis
                .direct()
                .flat_map(|i| i.evidence.iter().cloned())
                .collect(),
            EvidenceSource::Gap(kind) => ctx
                .gaps
                .iter()
                .filter(|g| g.kind == kind)
                .flat_map(|g| g.evidence.iter().cloned())
                .collect(),
            EvidenceSource::None => Vec::new(),
        };
        let mut seen = std::collections::HashSet::new();
        evidence.retain(|e| seen.insert(e.file.clone()));
        evidence.truncate(priority::MAX_EVIDENCE);
        evidence
    }

    /// Steps, criteria and dependency links for the top N only
    fn attach_details(&self, recommendations: &mut [Recommendation]) {
        let snapshot: Vec<(RecommendationId, String, u8)> = recommendations
            .iter()
            .map(|r| (r.id.clone(), r.title.clone(), r.stage))
            .collect();

        for rec in recommendations.iter_mut().take(self.detailed_top_n) {
            if let Some(rule) = RECOMMENDATION_RULES.iter().find(|r| r.title == rec.title) {
                rec.implementation_steps = rule.steps.iter().map(|s| s.to_string()).collect();
                rec.acceptance_criteria = rule.criteria.iter().map(|s| s.to_string()).collect();
            }

            for (dependent, prerequisite) in DEPENDENCY_RULES {
                if !rec.title.contains(dependent) {
                    continue;
                }
                for (id, title, stage) in &snapshot {
                    if title.contains(prerequisite) && *stage < rec.stage && !rec.dependencies.contains(id) {
                        debug!("{} depends on {}", rec.id, id);
                        rec.dependencies.push(id.clone());
                    }
                }
            }
        }
    }
}
