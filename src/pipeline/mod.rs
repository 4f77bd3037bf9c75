//! Assessment Pipeline
//!
//! Six synchronous stages, each consuming only the outputs of earlier ones:
//!
//! 1. Profiler: file listing + dependencies → [`CurrentStateProfile`]
//! 2. Classifier: change-request text → [`ChangeContext`]
//! 3. Impact Analyzer: profile × context → [`ImpactAnalysis`]
//! 4. Recommendation Generator: gaps, compliance, impacts → [`RecommendationSet`]
//! 5. Metrics Synthesizer: closed-form business metrics → [`MetricsReport`]
//! 6. Report Assembler: section tree → [`Report`]
//!
//! The pipeline never fails. A stage that panics is replaced by its empty
//! value and the report gains a `pipeline-diagnostics` section.

pub mod classifier;
pub mod gaps;
pub mod impact;
pub mod metrics;
pub mod profiler;
pub mod recommend;
pub mod report;
pub mod types;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::config::Config;

pub use classifier::{ChangeContext, ChangeRequest, Classifier, KeywordClassifier};
pub use impact::{ImpactAnalysis, ImpactAnalyzer, ImpactItem};
pub use metrics::{BusinessMetrics, MetricsReport, MetricsSynthesizer};
pub use profiler::{CurrentStateProfile, ProfilerInput, RepositoryProfiler};
pub use recommend::{Recommendation, RecommendationGenerator, RecommendationSet};
pub use report::{Report, ReportAssembler, ReportInputs, Section, SectionId};

/// A stage that recovered from an internal fault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFault {
    pub stage: String,
    pub message: String,
}

/// Analyze with the default configuration
pub fn analyze(input: &ProfilerInput, change_request: &str) -> Report {
    AssessmentPipeline::new(&Config::default()).run(input, change_request)
}

/// SHA-256 over the serialized input followed by the request text
pub fn fingerprint(input: &ProfilerInput, change_request: &str) -> String {
    let mut hasher = Sha256::new();
    // BTreeMap fields keep the serialization order stable
    hasher.update(serde_json::to_vec(input).unwrap_or_default());
    hasher.update(b"\n");
    hasher.update(change_request.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AssessmentPipeline {
    classifier: Box<dyn Classifier>,
    profiler: RepositoryProfiler,
    analyzer: ImpactAnalyzer,
    generator: RecommendationGenerator,
    synthesizer: MetricsSynthesizer,
    assembler: ReportAssembler,
    timestamp: Option<DateTime<Utc>>,
}

impl AssessmentPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: Box::new(KeywordClassifier::new()),
            profiler: RepositoryProfiler::new().with_project_type(config.project.project_type),
            analyzer: ImpactAnalyzer::new().with_max_evidence(config.analysis.max_evidence_per_item),
            generator: RecommendationGenerator::new()
                .with_detailed_top_n(config.report.detailed_recommendations),
            synthesizer: MetricsSynthesizer::new()
                .with_weekly_rate(config.financial.weekly_rate)
                .with_currency(config.financial.currency.clone()),
            assembler: ReportAssembler::new().with_diagrams(config.report.include_diagrams),
            timestamp: None,
        }
    }

    /// Swap in a different text classifier
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Pin `generatedAt` for reproducible output
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[instrument(skip_all, fields(files = input.files.len(), text_len = change_request.len()))]
    pub fn run(&self, input: &ProfilerInput, change_request: &str) -> Report {
        let mut faults = Vec::new();

        let profile = run_stage("profiler", &mut faults, || self.profiler.profile(input));

        let context = run_stage("classifier", &mut faults, || {
            self.classifier.classify(change_request)
        });

        let analysis = run_stage("impact", &mut faults, || {
            self.analyzer.analyze(&profile, &context, input)
        });

        let recommendations = run_stage("recommendations", &mut faults, || {
            self.generator.generate(&profile, &context, &analysis, input)
        });

        let security_present = profile.quality.security_level.is_present();
        let metrics = match panic::catch_unwind(AssertUnwindSafe(|| {
            self.synthesizer.synthesize(
                profile.file_count,
                security_present,
                &context,
                &analysis,
                &recommendations,
            )
        })) {
            Ok(metrics) => metrics,
            Err(payload) => {
                record_fault("metrics", payload.as_ref(), &mut faults);
                // Formulas over empty aggregates cannot fault
                self.synthesizer.synthesize(
                    0,
                    security_present,
                    &ChangeContext::default(),
                    &ImpactAnalysis::default(),
                    &RecommendationSet::default(),
                )
            }
        };

        let analysis_id = fingerprint(input, change_request);
        let generated_at = self.timestamp.unwrap_or_else(Utc::now);
        let inputs = ReportInputs {
            profile: &profile,
            analysis: &analysis,
            recommendations: &recommendations,
            metrics: &metrics,
            faults: &faults,
        };

        let report = self.assembler.assemble(&inputs, analysis_id, generated_at);

        info!(
            impacts = analysis.items.len(),
            recommendations = recommendations.recommendations.len(),
            faults = faults.len(),
            "Analysis complete"
        );
        report
    }
}

/// Run one stage, substituting its default value on panic
fn run_stage<T, F>(stage: &str, faults: &mut Vec<StageFault>, f: F) -> T
where
    T: Default,
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            record_fault(stage, payload.as_ref(), faults);
            T::default()
        }
    }
}

fn record_fault(stage: &str, payload: &(dyn Any + Send), faults: &mut Vec<StageFault>) {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    warn!(stage, %message, "Stage recovered from internal fault");
    faults.push(StageFault {
        stage: stage.to_string(),
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ChangeType, Scope};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn pipeline() -> AssessmentPipeline {
        AssessmentPipeline::new(&Config::default()).with_timestamp(fixed_time())
    }

    fn vector_repo() -> ProfilerInput {
        let mut files: Vec<String> = (0..20)
            .map(|i| format!("src/vector/store_{}.py", i))
            .collect();
        files.push("app.py".to_string());
        files.push("requirements.txt".to_string());
        ProfilerInput::new(files).with_dependency("qdrant-client", "1.7.0")
    }

    struct PanickingClassifier;

    impl Classifier for PanickingClassifier {
        fn classify(&self, _text: &str) -> ChangeContext {
            panic!("classifier exploded")
        }
    }

    #[test]
    fn test_empty_request_yields_complete_report() {
        let report = pipeline().run(&vector_repo(), "");
        assert_eq!(report.sections.len(), 10);
        assert!(!report.has_diagnostics());

        let summary = report.section(SectionId::ExecutiveSummary).expect("summary");
        assert!(summary.content.paragraphs[0].contains("enhancement"));
        assert!(summary.content.paragraphs[0].contains("medium scope"));
    }

    #[test]
    fn test_run_is_deterministic() {
        let text = "Migrate our vector store to Qdrant and add caching";
        let a = pipeline().run(&vector_repo(), text);
        let b = pipeline().run(&vector_repo(), text);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_tracks_inputs() {
        let input = vector_repo();
        let a = fingerprint(&input, "Add caching");
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint(&input, "Add caching"));
        assert_ne!(a, fingerprint(&input, "Add caching now"));
    }

    #[test]
    fn test_panicking_stage_degrades_to_partial_report() {
        let report = pipeline()
            .with_classifier(Box::new(PanickingClassifier))
            .run(&vector_repo(), "Migrate to Qdrant");

        assert!(report.has_diagnostics());
        let diagnostics = report.section(SectionId::PipelineDiagnostics).expect("diagnostics");
        assert_eq!(diagnostics.sequence, 11);
        let rows = &diagnostics.content.tables[0].rows;
        assert_eq!(rows[0][0], "classifier");
        assert_eq!(rows[0][1], "classifier exploded");
    }

    #[test]
    fn test_large_migration_scenario() {
        let files: Vec<String> = (0..1200).map(|i| format!("src/mod_{}.rs", i)).collect();
        let input = ProfilerInput::new(files);
        let report = pipeline().run(
            &input,
            "Large migration: migrate the entire platform database to Postgres",
        );

        let business = report.section(SectionId::BusinessValue).expect("business");
        assert!(business.content.paragraphs[0].contains("18 weeks"));
    }

    #[test]
    fn test_analyze_uses_defaults() {
        let report = analyze(&vector_repo(), "Add an index to speed up queries");
        assert_eq!(report.analysis_id, fingerprint(&vector_repo(), "Add an index to speed up queries"));
        assert_eq!(report.sections.len(), 10);
    }

    #[test]
    fn test_classifier_is_pluggable() {
        struct FixedClassifier;
        impl Classifier for FixedClassifier {
            fn classify(&self, text: &str) -> ChangeContext {
                ChangeContext {
                    raw_text: text.to_string(),
                    change_type: ChangeType::Bugfix,
                    scope: Scope::Small,
                    ..ChangeContext::default()
                }
            }
        }

        let report = pipeline()
            .with_classifier(Box::new(FixedClassifier))
            .run(&vector_repo(), "anything");
        let summary = report.section(SectionId::ExecutiveSummary).expect("summary");
        assert!(summary.content.paragraphs[0].contains("bugfix"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_report_deterministic(text in "[a-zA-Z ]{0,60}") {
            let a = pipeline().run(&vector_repo(), &text);
            let b = pipeline().run(&vector_repo(), &text);
            prop_assert_eq!(a, b);
        }
    }
}
