//! Metrics Synthesizer
//!
//! Pure, closed-form business metrics and cost model. Nothing here renders
//! text; the report assembler only interpolates the resulting numbers.
//!
//! ## Model
//! ```text
//! complexity score = files + change type + impact count + scope   (0..=10)
//! level            = >7 high (x1.5), >4 medium (x1.2), else low (x1)
//! total weeks      = base weeks(scope) * multiplier(level)
//! cost             = total weeks * weekly rate * team size / 2
//! benefit          = cost * benefit multiplier(change type)
//! ROI %            = (benefit - cost) / cost * 100
//! payback months   = cost / (benefit / 12)
//! ```
//! Any divisor is clamped to at least 1.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::classifier::ChangeContext;
use super::impact::ImpactAnalysis;
use super::recommend::RecommendationSet;
use super::types::{ChangeType, ComplexityLevel, Effort, Scope};
use crate::constants::financial::{
    self, base_weeks, benefit_multiplier, complexity_multiplier, effort_hours as hours,
    phase_share, productivity_gain, team_size,
};

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    pub roi: f64,
    pub payback_period_months: f64,
    pub cost_savings_annual: f64,
    pub productivity_gain_pct: f64,
    pub risk_reduction_pct: f64,
    pub tech_debt_reduction_hours: f64,
    pub compliance_score_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub weeks: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostModel {
    pub complexity_score: u32,
    pub complexity_level: ComplexityLevel,
    pub base_weeks: f64,
    pub complexity_multiplier: f64,
    pub total_weeks: f64,
    pub team_size: u32,
    pub weekly_rate: f64,
    pub currency: String,
    pub total_cost: f64,
    pub total_benefit: f64,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub business: BusinessMetrics,
    pub cost_model: CostModel,
    pub change_type: ChangeType,
    pub scope: Scope,
}

// =============================================================================
// Formulas
// =============================================================================

pub fn effort_hours(effort: Effort) -> f64 {
    match effort {
        Effort::S => hours::S,
        Effort::M => hours::M,
        Effort::L => hours::L,
        Effort::XL => hours::XL,
    }
}

fn file_points(file_count: usize) -> u32 {
    if file_count > financial::COMPLEXITY_FILES_HIGH {
        3
    } else if file_count > financial::COMPLEXITY_FILES_MEDIUM {
        2
    } else if file_count > financial::COMPLEXITY_FILES_LOW {
        1
    } else {
        0
    }
}

fn change_type_points(change_type: ChangeType) -> u32 {
    match change_type {
        ChangeType::Migration => 3,
        ChangeType::Integration | ChangeType::Scaling | ChangeType::Refactoring => 2,
        ChangeType::Feature
        | ChangeType::Optimization
        | ChangeType::Upgrade
        | ChangeType::Enhancement => 1,
        ChangeType::Bugfix => 0,
    }
}

fn impact_points(impact_count: usize) -> u32 {
    if impact_count > financial::COMPLEXITY_IMPACTS_HIGH {
        2
    } else if impact_count > financial::COMPLEXITY_IMPACTS_LOW {
        1
    } else {
        0
    }
}

fn scope_points(scope: Scope) -> u32 {
    match scope {
        Scope::Large => 2,
        Scope::Medium => 1,
        Scope::Small => 0,
    }
}

/// 0..=10 complexity score
pub fn complexity_score(
    file_count: usize,
    change_type: ChangeType,
    impact_count: usize,
    scope: Scope,
) -> u32 {
    file_points(file_count)
        + change_type_points(change_type)
        + impact_points(impact_count)
        + scope_points(scope)
}

pub fn complexity_level(score: u32) -> ComplexityLevel {
    if score > financial::COMPLEXITY_HIGH_ABOVE {
        ComplexityLevel::High
    } else if score > financial::COMPLEXITY_MEDIUM_ABOVE {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::Low
    }
}

fn timeline_multiplier(level: ComplexityLevel) -> f64 {
    match level {
        ComplexityLevel::High => complexity_multiplier::HIGH,
        ComplexityLevel::Medium => complexity_multiplier::MEDIUM,
        ComplexityLevel::Low | ComplexityLevel::Unknown => complexity_multiplier::LOW,
    }
}

fn team_size_for(level: ComplexityLevel) -> u32 {
    match level {
        ComplexityLevel::High => team_size::HIGH,
        ComplexityLevel::Medium => team_size::MEDIUM,
        ComplexityLevel::Low | ComplexityLevel::Unknown => team_size::LOW,
    }
}

pub fn base_weeks_for(scope: Scope) -> f64 {
    match scope {
        Scope::Small => base_weeks::SMALL,
        Scope::Medium => base_weeks::MEDIUM,
        Scope::Large => base_weeks::LARGE,
    }
}

pub fn benefit_multiplier_for(change_type: ChangeType) -> f64 {
    match change_type {
        ChangeType::Optimization => benefit_multiplier::OPTIMIZATION,
        ChangeType::Migration => benefit_multiplier::MIGRATION,
        ChangeType::Feature => benefit_multiplier::FEATURE,
        _ => benefit_multiplier::DEFAULT,
    }
}

fn productivity_gain_for(change_type: ChangeType) -> f64 {
    match change_type {
        ChangeType::Optimization => productivity_gain::OPTIMIZATION,
        ChangeType::Refactoring => productivity_gain::REFACTORING,
        ChangeType::Scaling => productivity_gain::SCALING,
        ChangeType::Migration => productivity_gain::MIGRATION,
        ChangeType::Integration => productivity_gain::INTEGRATION,
        ChangeType::Feature => productivity_gain::FEATURE,
        ChangeType::Upgrade => productivity_gain::UPGRADE,
        ChangeType::Enhancement => productivity_gain::ENHANCEMENT,
        ChangeType::Bugfix => productivity_gain::BUGFIX,
    }
}

fn risk_reduction(risk_reducing_recommendations: usize) -> f64 {
    let raw = financial::RISK_REDUCTION_BASE_PCT
        + financial::RISK_REDUCTION_PER_REC_PCT * risk_reducing_recommendations as f64;
    raw.min(financial::RISK_REDUCTION_CAP_PCT)
}

fn compliance_score(issue_count: usize, security_present: bool) -> f64 {
    let mut score = 100.0 - financial::COMPLIANCE_PENALTY_PER_ISSUE * issue_count as f64;
    if !security_present {
        score -= financial::COMPLIANCE_PENALTY_NO_SECURITY;
    }
    score.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn phases(total_weeks: f64, weekly_cost: f64) -> Vec<Phase> {
    [
        ("Discovery", phase_share::DISCOVERY),
        ("Build", phase_share::BUILD),
        ("Validation", phase_share::VALIDATION),
        ("Rollout", phase_share::ROLLOUT),
    ]
    .into_iter()
    .map(|(name, share)| {
        let weeks = total_weeks * share;
        Phase {
            name: name.to_string(),
            weeks: round2(weeks),
            cost: round2(weeks * weekly_cost),
        }
    })
    .collect()
}

// =============================================================================
// Synthesizer
// =============================================================================

/// Maps upstream aggregates to business metrics and a cost model
#[derive(Debug, Clone)]
pub struct MetricsSynthesizer {
    weekly_rate: f64,
    currency: String,
}

impl Default for MetricsSynthesizer {
    fn default() -> Self {
        Self {
            weekly_rate: financial::WEEKLY_ENGINEERING_RATE,
            currency: financial::CURRENCY.to_string(),
        }
    }
}

impl MetricsSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekly_rate(mut self, weekly_rate: f64) -> Self {
        self.weekly_rate = weekly_rate;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// `security_present` is the profile's security posture, passed in so the
    /// synthesizer stays independent of the profiler.
    pub fn synthesize(
        &self,
        file_count: usize,
        security_present: bool,
        context: &ChangeContext,
        analysis: &ImpactAnalysis,
        recommendations: &RecommendationSet,
    ) -> MetricsReport {
        let score = complexity_score(
            file_count,
            context.change_type,
            analysis.items.len(),
            context.scope,
        );
        let level = complexity_level(score);
        let base = base_weeks_for(context.scope);
        let multiplier = timeline_multiplier(level);
        let total_weeks = base * multiplier;
        let team = team_size_for(level);
        let weekly_cost = self.weekly_rate * f64::from(team) / 2.0;

        let cost = (total_weeks * weekly_cost).max(1.0);
        let benefit = (cost * benefit_multiplier_for(context.change_type)).max(1.0);

        let roi = (benefit - cost) / cost * 100.0;
        let payback = cost / (benefit / 12.0);

        let risk_reducing = recommendations
            .recommendations
            .iter()
            .filter(|r| r.category.is_risk_reducing())
            .count();

        let direct_hours: f64 = analysis.direct().map(|i| effort_hours(i.effort)).sum();

        let business = BusinessMetrics {
            roi: round2(roi),
            payback_period_months: round2(payback),
            cost_savings_annual: round2(benefit - cost),
            productivity_gain_pct: productivity_gain_for(context.change_type),
            risk_reduction_pct: risk_reduction(risk_reducing),
            tech_debt_reduction_hours: round2(direct_hours * financial::TECH_DEBT_FACTOR),
            compliance_score_pct: compliance_score(
                recommendations.compliance_issues.len(),
                security_present,
            ),
        };

        info!(
            complexity_score = score,
            total_weeks,
            team_size = team,
            roi = business.roi,
            "Metrics synthesized"
        );

        MetricsReport {
            business,
            cost_model: CostModel {
                complexity_score: score,
                complexity_level: level,
                base_weeks: base,
                complexity_multiplier: multiplier,
                total_weeks: round2(total_weeks),
                team_size: team,
                weekly_rate: self.weekly_rate,
                currency: self.currency.clone(),
                total_cost: round2(cost),
                total_benefit: round2(benefit),
                phases: phases(total_weeks, weekly_cost),
            },
            change_type: context.change_type,
            scope: context.scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::gaps::{ComplianceFramework, ComplianceIssue};
    use crate::pipeline::impact::{ImpactItem, ImpactOrigin};
    use crate::pipeline::types::{ImpactKind, RiskLevel};
    use proptest::prelude::*;

    fn context(change_type: ChangeType, scope: Scope) -> ChangeContext {
        ChangeContext {
            change_type,
            scope,
            ..ChangeContext::default()
        }
    }

    fn item(effort: Effort, origin: ImpactOrigin) -> ImpactItem {
        ImpactItem {
            component: "Qdrant".to_string(),
            change_type: ImpactKind::Schema,
            effort,
            risk: RiskLevel::Medium,
            evidence: Vec::new(),
            origin,
            matched_files: 0,
        }
    }

    #[test]
    fn test_large_migration_timeline() {
        let ctx = context(ChangeType::Migration, Scope::Large);
        let report = MetricsSynthesizer::new().synthesize(
            1200,
            true,
            &ctx,
            &ImpactAnalysis::default(),
            &RecommendationSet::default(),
        );

        // 3 files + 3 migration + 0 impacts + 2 large
        assert_eq!(report.cost_model.complexity_score, 8);
        assert_eq!(report.cost_model.complexity_level, ComplexityLevel::High);
        assert_eq!(report.cost_model.base_weeks, 12.0);
        assert_eq!(report.cost_model.total_weeks, 18.0);
        assert_eq!(report.cost_model.team_size, 4);
        // 18 weeks * 10k * 4/2
        assert_eq!(report.cost_model.total_cost, 360_000.0);
        assert_eq!(report.business.roi, 50.0);
        assert_eq!(report.business.payback_period_months, 8.0);
        assert_eq!(report.business.cost_savings_annual, 180_000.0);
    }

    #[test]
    fn test_complexity_buckets() {
        assert_eq!(complexity_level(4), ComplexityLevel::Low);
        assert_eq!(complexity_level(5), ComplexityLevel::Medium);
        assert_eq!(complexity_level(7), ComplexityLevel::Medium);
        assert_eq!(complexity_level(8), ComplexityLevel::High);

        assert_eq!(complexity_score(100, ChangeType::Bugfix, 5, Scope::Small), 0);
        assert_eq!(complexity_score(101, ChangeType::Bugfix, 6, Scope::Small), 2);
        assert_eq!(complexity_score(5000, ChangeType::Migration, 11, Scope::Large), 10);
    }

    #[test]
    fn test_small_bugfix_is_cheapest() {
        let ctx = context(ChangeType::Bugfix, Scope::Small);
        let report = MetricsSynthesizer::new().synthesize(
            10,
            true,
            &ctx,
            &ImpactAnalysis::default(),
            &RecommendationSet::default(),
        );
        assert_eq!(report.cost_model.total_weeks, 4.0);
        assert_eq!(report.cost_model.team_size, 2);
        assert_eq!(report.cost_model.total_cost, 40_000.0);
        assert_eq!(report.business.productivity_gain_pct, 5.0);
    }

    #[test]
    fn test_zero_rate_clamps_instead_of_dividing_by_zero() {
        let ctx = context(ChangeType::Feature, Scope::Medium);
        let report = MetricsSynthesizer::new().with_weekly_rate(0.0).synthesize(
            0,
            false,
            &ctx,
            &ImpactAnalysis::default(),
            &RecommendationSet::default(),
        );
        assert_eq!(report.cost_model.total_cost, 1.0);
        assert!(report.business.roi.is_finite());
        assert!(report.business.payback_period_months.is_finite());
    }

    #[test]
    fn test_tech_debt_counts_direct_items_only() {
        let analysis = ImpactAnalysis {
            items: vec![
                item(Effort::L, ImpactOrigin::Direct),
                item(Effort::S, ImpactOrigin::Direct),
                item(
                    Effort::M,
                    ImpactOrigin::Indirect {
                        triggered_by: "Qdrant".to_string(),
                    },
                ),
            ],
            ambiguities: Vec::new(),
        };
        let report = MetricsSynthesizer::new().synthesize(
            10,
            true,
            &ChangeContext::default(),
            &analysis,
            &RecommendationSet::default(),
        );
        // (60 + 8) / 2
        assert_eq!(report.business.tech_debt_reduction_hours, 34.0);
    }

    #[test]
    fn test_compliance_score_clamps() {
        assert_eq!(compliance_score(0, true), 100.0);
        assert_eq!(compliance_score(2, false), 66.0);
        assert_eq!(compliance_score(20, false), 0.0);

        let set = RecommendationSet {
            compliance_issues: vec![ComplianceIssue {
                framework: ComplianceFramework::Gdpr,
                description: "personal data".to_string(),
                severity: RiskLevel::High,
            }],
            ..RecommendationSet::default()
        };
        let report = MetricsSynthesizer::new().synthesize(
            10,
            true,
            &ChangeContext::default(),
            &ImpactAnalysis::default(),
            &set,
        );
        assert_eq!(report.business.compliance_score_pct, 88.0);
    }

    #[test]
    fn test_risk_reduction_caps() {
        assert_eq!(risk_reduction(0), 10.0);
        assert_eq!(risk_reduction(4), 30.0);
        assert_eq!(risk_reduction(50), 60.0);
    }

    #[test]
    fn test_phases_cover_total() {
        let phases = phases(20.0, 10_000.0);
        let weeks: f64 = phases.iter().map(|p| p.weeks).sum();
        assert!((weeks - 20.0).abs() < 1e-9);
        assert_eq!(phases[1].name, "Build");
        assert_eq!(phases[1].weeks, 11.0);
    }

    fn change_type_strategy() -> impl Strategy<Value = ChangeType> {
        prop_oneof![
            Just(ChangeType::Migration),
            Just(ChangeType::Feature),
            Just(ChangeType::Bugfix),
            Just(ChangeType::Optimization),
            Just(ChangeType::Refactoring),
            Just(ChangeType::Integration),
            Just(ChangeType::Upgrade),
            Just(ChangeType::Scaling),
            Just(ChangeType::Enhancement),
        ]
    }

    fn scope_strategy() -> impl Strategy<Value = Scope> {
        prop_oneof![Just(Scope::Small), Just(Scope::Medium), Just(Scope::Large)]
    }

    proptest! {
        #[test]
        fn prop_metrics_reproducible(
            files in 0usize..5000,
            change_type in change_type_strategy(),
            scope in scope_strategy(),
            security in any::<bool>(),
        ) {
            let ctx = context(change_type, scope);
            let synth = MetricsSynthesizer::new();
            let a = synth.synthesize(files, security, &ctx, &ImpactAnalysis::default(), &RecommendationSet::default());
            let b = synth.synthesize(files, security, &ctx, &ImpactAnalysis::default(), &RecommendationSet::default());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_score_in_range(
            files in 0usize..10_000,
            change_type in change_type_strategy(),
            impacts in 0usize..50,
            scope in scope_strategy(),
        ) {
            prop_assert!(complexity_score(files, change_type, impacts, scope) <= 10);
        }
    }
}
