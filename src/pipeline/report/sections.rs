//! Section templates
//!
//! One entry per canonical section. A template reads only the artifact its
//! entry names as `source`.

use std::collections::BTreeMap;

use super::diagrams::{architecture_flowchart, entity_diagram, impact_flowchart, request_sequence};
use super::{
    DataDiagram, ReportInputs, SectionContent, SectionId, SectionStrategy, SourceArtifact, Table,
};
use crate::pipeline::StageFault;
use crate::pipeline::impact::ImpactOrigin;
use crate::pipeline::profiler::TechType;
use crate::pipeline::types::RiskLevel;
use crate::types::{Evidence, enum_to_str};

pub(super) struct SectionInputs<'a> {
    pub artifacts: &'a ReportInputs<'a>,
    pub strategy: &'static SectionStrategy,
    pub include_diagrams: bool,
}

pub(super) struct SectionDef {
    pub id: SectionId,
    pub title: &'static str,
    pub source: SourceArtifact,
    pub build: fn(&SectionInputs<'_>) -> SectionContent,
}

pub(super) static SECTION_REGISTRY: &[SectionDef] = &[
    SectionDef {
        id: SectionId::ExecutiveSummary,
        title: "Executive Summary",
        source: SourceArtifact::BusinessMetrics,
        build: executive_summary,
    },
    SectionDef {
        id: SectionId::SolutionDiscovery,
        title: "Solution Discovery",
        source: SourceArtifact::CurrentStateProfile,
        build: solution_discovery,
    },
    SectionDef {
        id: SectionId::ArchitecturalAlignment,
        title: "Architectural Alignment",
        source: SourceArtifact::ImpactAnalysis,
        build: architectural_alignment,
    },
    SectionDef {
        id: SectionId::DataIntegration,
        title: "Data & Integration",
        source: SourceArtifact::CurrentStateProfile,
        build: data_integration,
    },
    SectionDef {
        id: SectionId::OperationalOwnership,
        title: "Operational Ownership",
        source: SourceArtifact::Recommendations,
        build: operational_ownership,
    },
    SectionDef {
        id: SectionId::TechnicalDebt,
        title: "Technical Debt",
        source: SourceArtifact::Recommendations,
        build: technical_debt,
    },
    SectionDef {
        id: SectionId::BusinessValue,
        title: "Business Value",
        source: SourceArtifact::BusinessMetrics,
        build: business_value,
    },
    SectionDef {
        id: SectionId::Scalability,
        title: "Scalability",
        source: SourceArtifact::CurrentStateProfile,
        build: scalability,
    },
    SectionDef {
        id: SectionId::RiskAssessment,
        title: "Risk Assessment",
        source: SourceArtifact::ImpactAnalysis,
        build: risk_assessment,
    },
    SectionDef {
        id: SectionId::Recommendations,
        title: "Recommendations",
        source: SourceArtifact::Recommendations,
        build: recommendations,
    },
];

// =============================================================================
// Formatting
// =============================================================================

/// Whole-unit amount with thousands separators
fn amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 { format!("-{}", out) } else { out }
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn evidence_list(evidence: &[Evidence], limit: usize) -> String {
    if evidence.is_empty() {
        return "none".to_string();
    }
    let mut shown: Vec<String> = evidence.iter().take(limit).map(|e| e.to_string()).collect();
    if evidence.len() > limit {
        shown.push(format!("+{} more", evidence.len() - limit));
    }
    shown.join(", ")
}

fn join_or(items: impl IntoIterator<Item = String>, empty: &str) -> String {
    let joined: Vec<String> = items.into_iter().collect();
    if joined.is_empty() {
        empty.to_string()
    } else {
        joined.join(", ")
    }
}

// =============================================================================
// Business Metrics Sections
// =============================================================================

fn executive_summary(inputs: &SectionInputs<'_>) -> SectionContent {
    let metrics = inputs.artifacts.metrics;
    let cost = &metrics.cost_model;
    let business = &metrics.business;
    let mut content = SectionContent::default();

    content.paragraph(format!(
        "This {} request is classified as {} scope with {} complexity (score {}/10).",
        metrics.change_type, metrics.scope, cost.complexity_level, cost.complexity_score
    ));
    content.paragraph(format!(
        "Estimated delivery is {} weeks for a team of {} at a total cost of {} {}.",
        number(cost.total_weeks),
        cost.team_size,
        cost.currency,
        amount(cost.total_cost)
    ));
    content.paragraph(format!(
        "Projected ROI is {}% with a payback period of {} months.",
        number(business.roi),
        number(business.payback_period_months)
    ));

    let mut table = Table::new("Key metrics", &["Metric", "Value"]);
    table.row(["Timeline".to_string(), format!("{} weeks", number(cost.total_weeks))]);
    table.row(["Team size".to_string(), cost.team_size.to_string()]);
    table.row([
        "Total cost".to_string(),
        format!("{} {}", cost.currency, amount(cost.total_cost)),
    ]);
    table.row(["ROI".to_string(), format!("{}%", number(business.roi))]);
    table.row([
        "Compliance score".to_string(),
        format!("{}%", number(business.compliance_score_pct)),
    ]);
    content.table(table);
    content
}

fn business_value(inputs: &SectionInputs<'_>) -> SectionContent {
    let metrics = inputs.artifacts.metrics;
    let cost = &metrics.cost_model;
    let business = &metrics.business;
    let mut content = SectionContent::default();

    content.paragraph(format!(
        "A team of {} over {} weeks at {} {} per engineer-week.",
        cost.team_size,
        number(cost.total_weeks),
        cost.currency,
        amount(cost.weekly_rate)
    ));

    let mut table = Table::new("Business metrics", &["Metric", "Value"]);
    table.row(["ROI".to_string(), format!("{}%", number(business.roi))]);
    table.row([
        "Payback period".to_string(),
        format!("{} months", number(business.payback_period_months)),
    ]);
    table.row([
        "Annual cost savings".to_string(),
        format!("{} {}", cost.currency, amount(business.cost_savings_annual)),
    ]);
    table.row([
        "Productivity gain".to_string(),
        format!("{}%", number(business.productivity_gain_pct)),
    ]);
    table.row([
        "Risk reduction".to_string(),
        format!("{}%", number(business.risk_reduction_pct)),
    ]);
    table.row([
        "Tech debt reduction".to_string(),
        format!("{} hours", number(business.tech_debt_reduction_hours)),
    ]);
    table.row([
        "Compliance score".to_string(),
        format!("{}%", number(business.compliance_score_pct)),
    ]);
    content.table(table);

    let mut phases = Table::new("Cost model", &["Phase", "Weeks", "Cost"]);
    for phase in &cost.phases {
        phases.row([
            phase.name.clone(),
            number(phase.weeks),
            format!("{} {}", cost.currency, amount(phase.cost)),
        ]);
    }
    content.table(phases);
    content
}

// =============================================================================
// Profile Sections
// =============================================================================

fn solution_discovery(inputs: &SectionInputs<'_>) -> SectionContent {
    let profile = inputs.artifacts.profile;
    let quality = &profile.quality;
    let mut content = SectionContent::default();

    content.paragraph(format!(
        "Detected project type: {}. {} files profiled, complexity {}.",
        profile.project_type, profile.file_count, profile.architecture.complexity_level
    ));
    if !profile.unknown_facts.is_empty() {
        content.paragraph(format!(
            "Could not determine: {}.",
            join_or(
                profile
                    .unknown_facts
                    .iter()
                    .map(|u| format!("{} ({})", u.fact, u.reason)),
                "",
            )
        ));
    }

    let mut stack = Table::new("Technology stack", &["Type", "Name", "Evidence"]);
    for tech in &profile.tech_stack {
        stack.row([
            enum_to_str(&tech.tech_type),
            tech.name.clone(),
            tech.evidence_count.to_string(),
        ]);
    }
    content.table(stack);

    content.paragraph(format!(
        "Capabilities: {}.",
        join_or(profile.capabilities.iter().cloned(), "none detected")
    ));

    let mut posture = Table::new("Quality posture", &["Dimension", "Level"]);
    posture.row(["Tests".to_string(), quality.test_coverage.to_string()]);
    posture.row(["Documentation".to_string(), quality.documentation_level.to_string()]);
    posture.row(["Monitoring".to_string(), quality.monitoring_level.to_string()]);
    posture.row(["Security".to_string(), quality.security_level.to_string()]);
    posture.row([
        "CI".to_string(),
        if quality.ci_configured { "configured" } else { "not configured" }.to_string(),
    ]);
    posture.row([
        "Overall".to_string(),
        format!("{} ({})", quality.level, quality.score),
    ]);
    content.table(posture);

    if inputs.include_diagrams {
        content.diagram(architecture_flowchart(inputs.strategy, profile));
    }
    content
}

fn data_integration(inputs: &SectionInputs<'_>) -> SectionContent {
    let profile = inputs.artifacts.profile;
    let mut content = SectionContent::default();

    content.paragraph(format!(
        "Data stores: {}.",
        join_or(
            profile.tech_of_type(TechType::Database).map(|t| t.name.clone()),
            "none detected"
        )
    ));
    content.paragraph(format!(
        "Data entities: {}.",
        join_or(profile.data_entities.iter().cloned(), "none detected")
    ));

    let mut deps = Table::new("Dependencies", &["Category", "Packages"]);
    for (category, names) in &profile.dependencies {
        deps.row([enum_to_str(category), names.join(", ")]);
    }
    content.table(deps);

    if inputs.include_diagrams {
        match inputs.strategy.data_diagram {
            DataDiagram::EntityRelationship => {
                if let Some(diagram) = entity_diagram(&profile.data_entities) {
                    content.diagram(diagram);
                }
            }
            DataDiagram::RequestSequence => content.diagram(request_sequence(inputs.strategy)),
        }
    }
    content
}

fn scalability(inputs: &SectionInputs<'_>) -> SectionContent {
    let profile = inputs.artifacts.profile;
    let architecture = &profile.architecture;
    let mut content = SectionContent::default();

    content.paragraph(format!(
        "Architecture patterns: {}.",
        join_or(architecture.patterns.iter().cloned(), "none detected")
    ));

    let mut table = Table::new("Architecture", &["Attribute", "Value"]);
    table.row(["Structure".to_string(), enum_to_str(&architecture.structure)]);
    table.row(["Complexity".to_string(), architecture.complexity_level.to_string()]);
    table.row(["Route registrations".to_string(), architecture.route_count.to_string()]);
    table.row(["Files".to_string(), profile.file_count.to_string()]);
    content.table(table);

    let infra = join_or(
        profile.tech_of_type(TechType::Infrastructure).map(|t| t.name.clone()),
        "none detected",
    );
    content.paragraph(format!("Infrastructure: {}.", infra));
    content
}

// =============================================================================
// Impact Sections
// =============================================================================

fn origin_label(origin: &ImpactOrigin) -> String {
    match origin {
        ImpactOrigin::Direct => "direct".to_string(),
        ImpactOrigin::Indirect { triggered_by } => format!("indirect via {}", triggered_by),
    }
}

fn architectural_alignment(inputs: &SectionInputs<'_>) -> SectionContent {
    let analysis = inputs.artifacts.analysis;
    let mut content = SectionContent::default();

    if analysis.is_empty() {
        content.paragraph("No impacted components were identified.");
    } else {
        content.paragraph(format!(
            "{} direct and {} indirect impacts identified.",
            analysis.direct().count(),
            analysis.indirect().count()
        ));
    }

    let mut items = Table::new(
        "Impact items",
        &["Component", "Change", "Effort", "Risk", "Origin", "Evidence"],
    );
    for item in &analysis.items {
        items.row([
            item.component.clone(),
            item.change_type.to_string(),
            item.effort.to_string(),
            item.risk.to_string(),
            origin_label(&item.origin),
            evidence_list(&item.evidence, 3),
        ]);
    }
    content.table(items);

    let mut ambiguities = Table::new("Ambiguities", &["Component", "Reason"]);
    for ambiguity in &analysis.ambiguities {
        ambiguities.row([ambiguity.component.clone(), ambiguity.reason.clone()]);
    }
    content.table(ambiguities);

    if inputs.include_diagrams && !analysis.is_empty() {
        content.diagram(impact_flowchart(analysis));
    }
    content
}

fn risk_assessment(inputs: &SectionInputs<'_>) -> SectionContent {
    let analysis = inputs.artifacts.analysis;
    let mut content = SectionContent::default();

    match analysis.max_risk() {
        Some(risk) => content.paragraph(format!("Highest impact risk: {}.", risk)),
        None => content.paragraph("No impact risk identified."),
    }

    let mut counts: BTreeMap<RiskLevel, usize> = BTreeMap::new();
    for item in &analysis.items {
        *counts.entry(item.risk).or_default() += 1;
    }
    if !counts.is_empty() {
        content.paragraph(format!(
            "Items by risk: {}.",
            counts
                .iter()
                .rev()
                .map(|(risk, n)| format!("{} {}", n, risk))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let mut register = Table::new("Risk register", &["Component", "Risk", "Effort", "Matched files"]);
    let mut ordered: Vec<_> = analysis.items.iter().collect();
    ordered.sort_by(|a, b| b.risk.cmp(&a.risk));
    for item in ordered {
        register.row([
            item.component.clone(),
            item.risk.to_string(),
            item.effort.to_string(),
            item.matched_files.to_string(),
        ]);
    }
    content.table(register);
    content
}

// =============================================================================
// Recommendation Sections
// =============================================================================

fn operational_ownership(inputs: &SectionInputs<'_>) -> SectionContent {
    let set = inputs.artifacts.recommendations;
    let mut content = SectionContent::default();

    let mut by_owner: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in &set.recommendations {
        for owner in &rec.owners {
            *by_owner.entry(owner.as_str()).or_default() += 1;
        }
    }
    if by_owner.is_empty() {
        content.paragraph("No recommendations require an owner.");
    }
    for (owner, count) in &by_owner {
        content.paragraph(format!("{} owns {} recommendation(s).", owner, count));
    }

    let mut table = Table::new("Ownership", &["ID", "Title", "Owners", "Stage"]);
    for rec in &set.recommendations {
        table.row([
            rec.id.to_string(),
            rec.title.clone(),
            rec.owners.join(", "),
            rec.stage.to_string(),
        ]);
    }
    content.table(table);
    content
}

fn technical_debt(inputs: &SectionInputs<'_>) -> SectionContent {
    let set = inputs.artifacts.recommendations;
    let mut content = SectionContent::default();

    if set.gaps.is_empty() && set.compliance_issues.is_empty() {
        content.paragraph("No architectural gaps or compliance issues were found.");
    } else {
        content.paragraph(format!(
            "{} architectural gap(s) and {} compliance issue(s) found.",
            set.gaps.len(),
            set.compliance_issues.len()
        ));
    }

    let mut gaps = Table::new("Architectural gaps", &["Area", "Description", "Severity", "Evidence"]);
    for gap in &set.gaps {
        gaps.row([
            gap.area.clone(),
            gap.description.clone(),
            gap.severity.to_string(),
            evidence_list(&gap.evidence, 3),
        ]);
    }
    content.table(gaps);

    let mut compliance = Table::new("Compliance issues", &["Framework", "Description", "Severity"]);
    for issue in &set.compliance_issues {
        compliance.row([
            issue.framework.to_string(),
            issue.description.clone(),
            issue.severity.to_string(),
        ]);
    }
    content.table(compliance);
    content
}

fn recommendations(inputs: &SectionInputs<'_>) -> SectionContent {
    let set = inputs.artifacts.recommendations;
    let mut content = SectionContent::default();

    let mut summary = Table::new(
        "Recommendations",
        &["ID", "Category", "Title", "Priority", "Effort", "Risk", "Stage", "Depends on"],
    );
    for rec in &set.recommendations {
        summary.row([
            rec.id.to_string(),
            rec.category.to_string(),
            rec.title.clone(),
            rec.priority.to_string(),
            rec.effort.to_string(),
            rec.risk.to_string(),
            rec.stage.to_string(),
            join_or(rec.dependencies.iter().map(|d| d.to_string()), "-"),
        ]);
    }
    content.table(summary);

    for rec in &set.recommendations {
        content.paragraph(format!("{} {}: {} {}", rec.id, rec.title, rec.why, rec.how));
        if !rec.is_detailed() {
            continue;
        }
        let mut plan = Table::new(format!("{} plan", rec.id), &["Kind", "#", "Item"]);
        for (i, step) in rec.implementation_steps.iter().enumerate() {
            plan.row(["Step".to_string(), (i + 1).to_string(), step.clone()]);
        }
        for (i, criterion) in rec.acceptance_criteria.iter().enumerate() {
            plan.row(["Acceptance".to_string(), (i + 1).to_string(), criterion.clone()]);
        }
        content.table(plan);
    }
    content
}

// =============================================================================
// Diagnostics
// =============================================================================

pub(super) fn diagnostics_content(faults: &[StageFault]) -> SectionContent {
    let mut content = SectionContent::default();
    content.paragraph(
        "One or more stages recovered from an internal fault. Their output was replaced \
         with empty values and this report is partial.",
    );
    let mut table = Table::new("Recovered stages", &["Stage", "Message"]);
    for fault in faults {
        table.row([fault.stage.clone(), fault.message.clone()]);
    }
    content.table(table);
    content
}
