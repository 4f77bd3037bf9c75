//! Report Assembler
//!
//! Composes the upstream artifacts into an ordered tree of sections. Every
//! section is bound to exactly one artifact and only interpolates its fields;
//! no scoring or classification happens here.
//!
//! ## Layout
//! - [`sections`]: section registry, one template per canonical section
//! - [`diagrams`]: fixed Mermaid templates
//! - [`mermaid`]: lenient validator for generated sources
//!
//! Project-type specific choices go through [`strategy_for`], a single
//! dispatch table from [`ProjectType`] to [`SectionStrategy`].

pub mod diagrams;
pub mod mermaid;
mod sections;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use self::diagrams::Diagram;
use self::mermaid::MermaidValidator;
use self::sections::{SECTION_REGISTRY, SectionInputs, diagnostics_content};
use super::StageFault;
use super::impact::ImpactAnalysis;
use super::metrics::MetricsReport;
use super::profiler::CurrentStateProfile;
use super::recommend::RecommendationSet;
use super::types::ProjectType;

// =============================================================================
// Report Tree
// =============================================================================

/// Canonical section identifiers, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    ExecutiveSummary,
    SolutionDiscovery,
    ArchitecturalAlignment,
    DataIntegration,
    OperationalOwnership,
    TechnicalDebt,
    BusinessValue,
    Scalability,
    RiskAssessment,
    Recommendations,
    PipelineDiagnostics,
}

/// The single upstream artifact a section draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceArtifact {
    CurrentStateProfile,
    ImpactAnalysis,
    Recommendations,
    BusinessMetrics,
    PipelineDiagnostics,
}

/// Rows of cells with a header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub paragraphs: Vec<String>,
    pub tables: Vec<Table>,
    pub diagrams: Vec<Diagram>,
}

impl SectionContent {
    pub(crate) fn paragraph(&mut self, text: impl Into<String>) {
        self.paragraphs.push(text.into());
    }

    /// Empty tables are dropped
    pub(crate) fn table(&mut self, table: Table) {
        if !table.is_empty() {
            self.tables.push(table);
        }
    }

    pub(crate) fn diagram(&mut self, diagram: Diagram) {
        self.diagrams.push(diagram);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub sequence: u32,
    pub source: SourceArtifact,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// SHA-256 fingerprint of the analysed inputs
    pub analysis_id: String,
    pub generated_at: DateTime<Utc>,
    pub project_type: ProjectType,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn has_diagnostics(&self) -> bool {
        self.section(SectionId::PipelineDiagnostics).is_some()
    }
}

// =============================================================================
// Project-type Strategy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDiagram {
    EntityRelationship,
    RequestSequence,
}

/// Project-type dependent template choices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStrategy {
    /// Flowchart layer labels, outermost first
    pub layers: &'static [&'static str],
    pub data_diagram: DataDiagram,
}

static FALLBACK_STRATEGY: SectionStrategy = SectionStrategy {
    layers: &["Entry Points", "Core Logic", "Data"],
    data_diagram: DataDiagram::RequestSequence,
};

static STRATEGIES: &[(ProjectType, SectionStrategy)] = &[
    (
        ProjectType::Backend,
        SectionStrategy {
            layers: &["API", "Services", "Data"],
            data_diagram: DataDiagram::EntityRelationship,
        },
    ),
    (
        ProjectType::Frontend,
        SectionStrategy {
            layers: &["UI", "State", "API Client"],
            data_diagram: DataDiagram::RequestSequence,
        },
    ),
    (
        ProjectType::FullStack,
        SectionStrategy {
            layers: &["UI", "API", "Services", "Data"],
            data_diagram: DataDiagram::EntityRelationship,
        },
    ),
    (
        ProjectType::DataPlatform,
        SectionStrategy {
            layers: &["Ingestion", "Processing", "Storage"],
            data_diagram: DataDiagram::EntityRelationship,
        },
    ),
    (
        ProjectType::Library,
        SectionStrategy {
            layers: &["Public API", "Core", "Adapters"],
            data_diagram: DataDiagram::RequestSequence,
        },
    ),
    (
        ProjectType::Monorepo,
        SectionStrategy {
            layers: &["Apps", "Shared Packages", "Data"],
            data_diagram: DataDiagram::EntityRelationship,
        },
    ),
];

pub fn strategy_for(project_type: ProjectType) -> &'static SectionStrategy {
    STRATEGIES
        .iter()
        .find(|(pt, _)| *pt == project_type)
        .map(|(_, strategy)| strategy)
        .unwrap_or(&FALLBACK_STRATEGY)
}

// =============================================================================
// Assembler
// =============================================================================

/// Upstream artifacts for one run
pub struct ReportInputs<'a> {
    pub profile: &'a CurrentStateProfile,
    pub analysis: &'a ImpactAnalysis,
    pub recommendations: &'a RecommendationSet,
    pub metrics: &'a MetricsReport,
    pub faults: &'a [StageFault],
}

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    include_diagrams: bool,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self {
            include_diagrams: true,
        }
    }
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagrams(mut self, include: bool) -> Self {
        self.include_diagrams = include;
        self
    }

    pub fn assemble(
        &self,
        inputs: &ReportInputs<'_>,
        analysis_id: String,
        generated_at: DateTime<Utc>,
    ) -> Report {
        let project_type = inputs.profile.project_type;
        let section_inputs = SectionInputs {
            artifacts: inputs,
            strategy: strategy_for(project_type),
            include_diagrams: self.include_diagrams,
        };

        // Per-run counter, starts at 1
        let mut sequence = 0u32;
        let mut sections: Vec<Section> = SECTION_REGISTRY
            .iter()
            .map(|def| {
                sequence += 1;
                Section {
                    id: def.id,
                    title: def.title.to_string(),
                    sequence,
                    source: def.source,
                    content: (def.build)(&section_inputs),
                }
            })
            .collect();

        if !inputs.faults.is_empty() {
            sequence += 1;
            sections.push(Section {
                id: SectionId::PipelineDiagnostics,
                title: "Pipeline Diagnostics".to_string(),
                sequence,
                source: SourceArtifact::PipelineDiagnostics,
                content: diagnostics_content(inputs.faults),
            });
        }

        for section in &sections {
            Self::check_diagrams(section);
        }

        info!(
            sections = sections.len(),
            project_type = %project_type,
            "Report assembled"
        );

        Report {
            analysis_id,
            generated_at,
            project_type,
            sections,
        }
    }

    fn check_diagrams(section: &Section) {
        for diagram in &section.content.diagrams {
            let issues = MermaidValidator::validate(diagram.kind, &diagram.source);
            if issues.is_empty() {
                continue;
            }
            for issue in &issues {
                warn!(
                    section = ?section.id,
                    diagram = %diagram.title,
                    line = issue.line,
                    "Invalid Mermaid source: {}",
                    issue.description
                );
            }
        }
        debug!(section = ?section.id, diagrams = section.content.diagrams.len(), "Diagrams checked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::{Classifier, KeywordClassifier};
    use crate::pipeline::impact::ImpactAnalyzer;
    use crate::pipeline::metrics::MetricsSynthesizer;
    use crate::pipeline::profiler::{ProfilerInput, RepositoryProfiler};
    use crate::pipeline::recommend::RecommendationGenerator;
    use chrono::TimeZone;

    struct Artifacts {
        profile: CurrentStateProfile,
        analysis: ImpactAnalysis,
        recommendations: RecommendationSet,
        metrics: MetricsReport,
    }

    fn artifacts(text: &str, input: &ProfilerInput) -> Artifacts {
        let profile = RepositoryProfiler::new().profile(input);
        let context = KeywordClassifier::new().classify(text);
        let analysis = ImpactAnalyzer::new().analyze(&profile, &context, input);
        let recommendations =
            RecommendationGenerator::new().generate(&profile, &context, &analysis, input);
        let metrics = MetricsSynthesizer::new().synthesize(
            profile.file_count,
            profile.quality.security_level.is_present(),
            &context,
            &analysis,
            &recommendations,
        );
        Artifacts {
            profile,
            analysis,
            recommendations,
            metrics,
        }
    }

    fn assemble(a: &Artifacts, faults: &[StageFault]) -> Report {
        let inputs = ReportInputs {
            profile: &a.profile,
            analysis: &a.analysis,
            recommendations: &a.recommendations,
            metrics: &a.metrics,
            faults,
        };
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ReportAssembler::new().assemble(&inputs, "abc".to_string(), at)
    }

    fn express_repo() -> ProfilerInput {
        ProfilerInput::new(vec![
            "package.json".to_string(),
            "server/routes/auth.js".to_string(),
            "server/models/user.js".to_string(),
            "server/models/order.js".to_string(),
        ])
        .with_dependency("express", "^4.18.0")
        .with_dependency("pg", "^8.0.0")
    }

    #[test]
    fn test_canonical_section_order() {
        let a = artifacts("Add an API endpoint for orders", &express_repo());
        let report = assemble(&a, &[]);

        let ids: Vec<SectionId> = report.sections.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::ExecutiveSummary,
                SectionId::SolutionDiscovery,
                SectionId::ArchitecturalAlignment,
                SectionId::DataIntegration,
                SectionId::OperationalOwnership,
                SectionId::TechnicalDebt,
                SectionId::BusinessValue,
                SectionId::Scalability,
                SectionId::RiskAssessment,
                SectionId::Recommendations,
            ]
        );
        let sequences: Vec<u32> = report.sections.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, (1..=10).collect::<Vec<_>>());
        assert!(!report.has_diagnostics());
    }

    #[test]
    fn test_section_ids_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SectionId::DataIntegration).unwrap(),
            "\"data-integration\""
        );
        assert_eq!(
            serde_json::to_string(&SourceArtifact::BusinessMetrics).unwrap(),
            "\"businessMetrics\""
        );
    }

    #[test]
    fn test_diagnostics_section_appended_after_faults() {
        let a = artifacts("", &ProfilerInput::default());
        let faults = vec![StageFault {
            stage: "impact".to_string(),
            message: "boom".to_string(),
        }];
        let report = assemble(&a, &faults);

        let last = report.sections.last().expect("sections");
        assert_eq!(last.id, SectionId::PipelineDiagnostics);
        assert_eq!(last.sequence, 11);
        assert!(last.content.tables[0].rows[0].contains(&"impact".to_string()));
    }

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(
            strategy_for(ProjectType::Backend).data_diagram,
            DataDiagram::EntityRelationship
        );
        assert_eq!(
            strategy_for(ProjectType::Frontend).data_diagram,
            DataDiagram::RequestSequence
        );
        assert_eq!(strategy_for(ProjectType::Unknown), &FALLBACK_STRATEGY);
    }

    #[test]
    fn test_generated_diagrams_validate() {
        let a = artifacts("Migrate the orders table to a new schema", &express_repo());
        let report = assemble(&a, &[]);
        let diagrams: Vec<&Diagram> = report
            .sections
            .iter()
            .flat_map(|s| s.content.diagrams.iter())
            .collect();
        assert!(!diagrams.is_empty());
        for diagram in diagrams {
            assert!(
                MermaidValidator::is_valid(diagram.kind, &diagram.source),
                "{}",
                diagram.source
            );
        }
    }

    #[test]
    fn test_without_diagrams() {
        let a = artifacts("Migrate the orders table", &express_repo());
        let inputs = ReportInputs {
            profile: &a.profile,
            analysis: &a.analysis,
            recommendations: &a.recommendations,
            metrics: &a.metrics,
            faults: &[],
        };
        let report =
            ReportAssembler::new()
                .with_diagrams(false)
                .assemble(&inputs, "id".to_string(), Utc::now());
        assert!(report.sections.iter().all(|s| s.content.diagrams.is_empty()));
    }
}
