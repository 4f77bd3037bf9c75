//! Impact Analyzer
//!
//! Cross-references the current-state profile with the change context and
//! emits an ordered list of [`ImpactItem`]s:
//!
//! 1. Direct impacts for each named component, in context order
//! 2. Direct impacts for concepts with no component of their natural type
//! 3. Indirect impacts, single hop, in the order of their triggers
//!
//! Direct items carry file evidence found by token-bounded hint matches on the
//! path list. Indirect items carry wildcard evidence that is resolved with
//! `glob`.

mod propagation;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use self::propagation::{CONCEPT_TARGETS, rule_for};
use super::classifier::{ChangeContext, Component};
use super::profiler::{CurrentStateProfile, ProfilerInput};
use super::types::{Effort, ImpactKind, RiskLevel};
use crate::constants::{impact, snapshot};
use crate::types::{Evidence, log_filter_warn};

// =============================================================================
// Types
// =============================================================================

/// Where an impact item came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImpactOrigin {
    Direct,
    Indirect {
        #[serde(rename = "triggeredBy")]
        triggered_by: String,
    },
}

/// Predicted change to one system component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactItem {
    pub component: String,
    pub change_type: ImpactKind,
    pub effort: Effort,
    pub risk: RiskLevel,
    pub evidence: Vec<Evidence>,
    pub origin: ImpactOrigin,
    /// Files matched before the evidence cap was applied
    pub matched_files: usize,
}

impl ImpactItem {
    pub fn is_direct(&self) -> bool {
        self.origin == ImpactOrigin::Direct
    }
}

/// Expected evidence that could not be found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub component: String,
    pub reason: String,
}

/// Output of the impact analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub items: Vec<ImpactItem>,
    pub ambiguities: Vec<Ambiguity>,
}

impl ImpactAnalysis {
    pub fn direct(&self) -> impl Iterator<Item = &ImpactItem> {
        self.items.iter().filter(|i| i.is_direct())
    }

    pub fn indirect(&self) -> impl Iterator<Item = &ImpactItem> {
        self.items.iter().filter(|i| !i.is_direct())
    }

    pub fn has_kind(&self, kind: ImpactKind) -> bool {
        self.items.iter().any(|i| i.change_type == kind)
    }

    pub fn max_risk(&self) -> Option<RiskLevel> {
        self.items.iter().map(|i| i.risk).max()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Analyzer
// =============================================================================

/// Impact analyzer
#[derive(Debug, Clone)]
pub struct ImpactAnalyzer {
    max_evidence: usize,
}

impl Default for ImpactAnalyzer {
    fn default() -> Self {
        Self {
            max_evidence: snapshot::MAX_EVIDENCE_PER_ITEM,
        }
    }
}

impl ImpactAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_evidence(mut self, max_evidence: usize) -> Self {
        self.max_evidence = max_evidence.max(1);
        self
    }

    pub fn analyze(
        &self,
        profile: &CurrentStateProfile,
        context: &ChangeContext,
        input: &ProfilerInput,
    ) -> ImpactAnalysis {
        let lowered: Vec<String> = input.files.iter().map(|f| f.to_lowercase()).collect();
        let mut analysis = ImpactAnalysis::default();

        for component in &context.components {
            let item = self.component_impact(component, input, &lowered);
            analysis.items.push(item);
        }

        for target in CONCEPT_TARGETS {
            if !context.has_concept(target.concept) {
                continue;
            }
            let covered = target
                .natural_type
                .is_some_and(|t| context.components_of(t).next().is_some());
            if covered {
                continue;
            }
            let item = self.direct_item(
                target.target,
                target.kind,
                target.path_hints,
                input,
                &lowered,
            );
            analysis.items.push(item);
        }

        for item in &analysis.items {
            if item.evidence.is_empty() {
                analysis.ambiguities.push(Ambiguity {
                    component: item.component.clone(),
                    reason: if profile.file_count == 0 {
                        "repository file listing is empty".to_string()
                    } else {
                        "no profiled file matched this component".to_string()
                    },
                });
            }
        }

        let indirect = self.propagate(&analysis.items, &lowered);
        for item in indirect {
            let resolved = item.matched_files > 0;
            if !resolved {
                analysis.ambiguities.push(Ambiguity {
                    component: item.component.clone(),
                    reason: format!(
                        "wildcard evidence {} matched no profiled file",
                        item.evidence.first().map(|e| e.file.as_str()).unwrap_or("")
                    ),
                });
            }
            analysis.items.push(item);
        }

        info!(
            direct = analysis.direct().count(),
            indirect = analysis.indirect().count(),
            ambiguities = analysis.ambiguities.len(),
            "Analyzed impact"
        );
        analysis
    }

    fn component_impact(
        &self,
        component: &Component,
        input: &ProfilerInput,
        lowered: &[String],
    ) -> ImpactItem {
        let hints = component.path_hints();
        let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
        let mut item = self.direct_item(
            &component.display_name(),
            component.impact_kind(),
            &hint_refs,
            input,
            lowered,
        );
        if has_production_marker(&component.name) {
            item.risk = escalate(item.effort);
        }
        item
    }

    fn direct_item(
        &self,
        name: &str,
        kind: ImpactKind,
        hints: &[&str],
        input: &ProfilerInput,
        lowered: &[String],
    ) -> ImpactItem {
        let matched: Vec<usize> = lowered
            .iter()
            .enumerate()
            .filter(|(_, path)| hints.iter().any(|h| hint_matches(path, h)))
            .map(|(index, _)| index)
            .collect();

        let effort = Effort::from_file_count(matched.len());
        let in_production = matched
            .iter()
            .any(|&index| has_production_marker(&lowered[index]));
        let risk = if in_production {
            escalate(effort)
        } else {
            base_risk(effort)
        };

        let evidence = matched
            .iter()
            .take(self.max_evidence)
            .map(|&index| {
                let path = &input.files[index];
                let evidence = Evidence::file(path.clone());
                match first_matching_line(input, path, hints) {
                    Some(line) => evidence.with_lines(line, line),
                    None => evidence,
                }
            })
            .collect();

        debug!(component = name, matched = matched.len(), %effort, "Direct impact");

        ImpactItem {
            component: name.to_string(),
            change_type: kind,
            effort,
            risk,
            evidence,
            origin: ImpactOrigin::Direct,
            matched_files: matched.len(),
        }
    }

    /// Apply propagation rules once to each direct item, first trigger wins
    fn propagate(&self, direct: &[ImpactItem], lowered: &[String]) -> Vec<ImpactItem> {
        let mut indirect: Vec<ImpactItem> = Vec::new();

        for item in direct {
            let Some(rule) = rule_for(item.change_type) else {
                continue;
            };
            let duplicate = indirect.iter().any(|i| i.component == rule.target)
                || direct.iter().any(|d| d.component == rule.target);
            if duplicate {
                continue;
            }

            let resolved = log_filter_warn(Pattern::new(rule.evidence_glob), "invalid evidence glob")
                .map(|pattern| lowered.iter().filter(|p| pattern.matches(p)).count())
                .unwrap_or(0);

            indirect.push(ImpactItem {
                component: rule.target.to_string(),
                change_type: rule.kind,
                effort: rule.effort,
                risk: rule.risk,
                evidence: vec![Evidence::file(rule.evidence_glob)],
                origin: ImpactOrigin::Indirect {
                    triggered_by: item.component.clone(),
                },
                matched_files: resolved,
            });
        }

        indirect
    }
}

fn base_risk(effort: Effort) -> RiskLevel {
    match effort {
        Effort::S => RiskLevel::Low,
        Effort::M | Effort::L => RiskLevel::Medium,
        Effort::XL => RiskLevel::High,
    }
}

fn escalate(effort: Effort) -> RiskLevel {
    if effort == Effort::XL {
        RiskLevel::Critical
    } else {
        RiskLevel::High
    }
}

/// Production markers match whole path or name tokens, so `products/` does not count
fn has_production_marker(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| impact::PRODUCTION_MARKERS.contains(&token))
}

/// Whether `hint` occurs in `text` at a token boundary.
///
/// An occurrence must start the text or follow a non-alphanumeric character,
/// so `pg` never matches `img.jpg` and `app/` never matches `webapp/`. Hints
/// shorter than four characters must also end at a boundary; longer ones may
/// run on (`vector` matches `vectors/`). Hints opening or closing with
/// punctuation (`.tsx`, `models/`) carry their own boundary on that side.
fn hint_matches(text: &str, hint: &str) -> bool {
    if hint.is_empty() {
        return false;
    }
    let opens_bounded = hint.starts_with(|c: char| !c.is_alphanumeric());
    let closes_bounded = hint.ends_with(|c: char| !c.is_alphanumeric())
        || hint.chars().count() >= impact::HINT_MIN_PREFIX_CHARS;

    text.match_indices(hint).any(|(start, _)| {
        let before_ok = opens_bounded
            || text[..start]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = closes_bounded
            || text[start + hint.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// First 1-based line of a sampled file mentioning any hint
fn first_matching_line(input: &ProfilerInput, path: &str, hints: &[&str]) -> Option<u32> {
    let content = input.raw_contents.get(path)?;
    content
        .lines()
        .position(|line| {
            let line = line.to_lowercase();
            hints.iter().any(|h| hint_matches(&line, h))
        })
        .and_then(|index| u32::try_from(index + 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::{Classifier, ComponentType, KeywordClassifier};
    use crate::pipeline::profiler::RepositoryProfiler;
    use crate::pipeline::types::Concept;
    use proptest::prelude::*;

    fn context_with(components: Vec<Component>) -> ChangeContext {
        ChangeContext {
            components,
            ..Default::default()
        }
    }

    fn analyze(context: &ChangeContext, input: &ProfilerInput) -> ImpactAnalysis {
        let profile = RepositoryProfiler::new().profile(input);
        ImpactAnalyzer::new().analyze(&profile, context, input)
    }

    #[test]
    fn test_qdrant_scenario() {
        let files: Vec<String> = (0..20).map(|i| format!("src/vector/store_{}.py", i)).collect();
        let input = ProfilerInput::new(files);
        let context = context_with(vec![Component::new(ComponentType::Database, "qdrant")]);

        let analysis = analyze(&context, &input);

        let qdrant = &analysis.items[0];
        assert_eq!(qdrant.component, "Qdrant");
        assert_eq!(qdrant.effort, Effort::L);
        assert_eq!(qdrant.matched_files, 20);
        assert!(!qdrant.evidence.is_empty());

        let dal = &analysis.items[1];
        assert_eq!(dal.component, "Data Access Layer");
        assert_eq!(dal.effort, Effort::M);
        assert_eq!(dal.risk, RiskLevel::Medium);
        assert!(dal.evidence[0].is_wildcard());
        assert_eq!(
            dal.origin,
            ImpactOrigin::Indirect {
                triggered_by: "Qdrant".to_string()
            }
        );
    }

    #[test]
    fn test_direct_items_precede_indirect_in_component_order() {
        let input = ProfilerInput::new(vec![
            "src/routes/users.js".to_string(),
            "src/db/postgres.js".to_string(),
            "Dockerfile".to_string(),
        ]);
        let context = context_with(vec![
            Component::new(ComponentType::Framework, "express"),
            Component::new(ComponentType::Database, "postgresql"),
            Component::new(ComponentType::Infrastructure, "docker"),
        ]);

        let analysis = analyze(&context, &input);
        let names: Vec<_> = analysis.items.iter().map(|i| i.component.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Express",
                "PostgreSQL",
                "Docker",
                "API Consumers",
                "Data Access Layer",
                "CI/CD Pipeline",
            ]
        );
    }

    #[test]
    fn test_indirect_targets_are_deduplicated() {
        let context = context_with(vec![
            Component::new(ComponentType::Database, "pinecone"),
            Component::new(ComponentType::Database, "qdrant"),
        ]);
        let analysis = analyze(&context, &ProfilerInput::new(vec!["a.py".to_string()]));

        let dal: Vec<_> = analysis
            .indirect()
            .filter(|i| i.component == "Data Access Layer")
            .collect();
        assert_eq!(dal.len(), 1);
        assert_eq!(
            dal[0].origin,
            ImpactOrigin::Indirect {
                triggered_by: "Pinecone".to_string()
            }
        );
    }

    #[test]
    fn test_missing_evidence_is_an_ambiguity() {
        let context = context_with(vec![Component::new(ComponentType::Database, "cassandra")]);
        let analysis = analyze(&context, &ProfilerInput::new(vec!["src/app.js".to_string()]));

        assert_eq!(analysis.items[0].effort, Effort::S);
        assert!(analysis.items[0].evidence.is_empty());
        assert!(analysis.ambiguities.iter().any(|a| a.component == "Cassandra"));
        // "**/models/**" resolves to nothing
        assert!(
            analysis
                .ambiguities
                .iter()
                .any(|a| a.component == "Data Access Layer")
        );
    }

    #[test]
    fn test_production_marker_escalates_risk() {
        let files = vec![
            "deploy/prod/redis.conf".to_string(),
            "src/cache/redis.js".to_string(),
        ];
        let context = context_with(vec![Component::new(ComponentType::Database, "redis")]);
        let analysis = analyze(&context, &ProfilerInput::new(files));
        assert_eq!(analysis.items[0].risk, RiskLevel::High);

        let files = vec!["src/products/redis.js".to_string()];
        let analysis = analyze(&context, &ProfilerInput::new(files));
        assert_eq!(analysis.items[0].risk, RiskLevel::Low);
    }

    #[test]
    fn test_concept_targets_follow_components() {
        let context = KeywordClassifier::new().classify("Add JWT auth to the Express API");
        assert!(context.has_concept(Concept::Security));

        let input = ProfilerInput::new(vec![
            "src/api/users.js".to_string(),
            "src/auth/jwt.js".to_string(),
        ]);
        let analysis = analyze(&context, &input);
        let names: Vec<_> = analysis.direct().map(|i| i.component.as_str()).collect();
        assert_eq!(names[0], "Express");
        assert!(names.contains(&"API Layer"));
        assert!(names.contains(&"Authentication & Authorization"));
    }

    #[test]
    fn test_evidence_carries_line_ranges_from_samples() {
        let input = ProfilerInput::new(vec!["src/vector/client.py".to_string()]).with_content(
            "src/vector/client.py",
            "import os\nfrom qdrant_client import QdrantClient\n",
        );
        let context = context_with(vec![Component::new(ComponentType::Database, "qdrant")]);
        let analysis = analyze(&context, &input);

        assert_eq!(analysis.items[0].evidence[0].line_range, Some((2, 2)));
    }

    #[test]
    fn test_evidence_cap() {
        let files: Vec<String> = (0..40).map(|i| format!("src/embedding/{}.py", i)).collect();
        let input = ProfilerInput::new(files);
        let context = context_with(vec![Component::new(ComponentType::Database, "qdrant")]);
        let profile = RepositoryProfiler::new().profile(&input);
        let analysis = ImpactAnalyzer::new()
            .with_max_evidence(3)
            .analyze(&profile, &context, &input);

        assert_eq!(analysis.items[0].effort, Effort::XL);
        assert_eq!(analysis.items[0].evidence.len(), 3);
        assert_eq!(analysis.items[0].risk, RiskLevel::High);
    }

    #[test]
    fn test_hints_match_at_token_boundaries() {
        assert!(hint_matches("src/db/pg/pool.ts", "pg"));
        assert!(hint_matches("db/schema.sql", "sql"));
        assert!(hint_matches("src/vectors/index.py", "vector"));
        assert!(hint_matches("src/app/page.tsx", "app/"));
        assert!(hint_matches("web/button.tsx", ".tsx"));

        assert!(!hint_matches("assets/img_1.jpg", "pg"));
        assert!(!hint_matches("scripts/upgrade.sh", "pg"));
        assert!(!hint_matches("src/feedback.py", "db"));
        assert!(!hint_matches("src/webapp/index.js", "app/"));
        assert!(!hint_matches("src/mysql.ts", "sql"));
        assert!(!hint_matches("any/path", ""));
    }

    #[test]
    fn test_unrelated_files_do_not_inflate_effort() {
        let mut files: Vec<String> = (0..30).map(|i| format!("assets/img_{}.jpg", i)).collect();
        files.push("scripts/upgrade.sh".to_string());
        files.push("src/feedback.py".to_string());
        files.push("src/webapp/main.js".to_string());
        let input = ProfilerInput::new(files);
        let context = context_with(vec![
            Component::new(ComponentType::Database, "postgresql"),
            Component::new(ComponentType::Database, "sqlite"),
            Component::new(ComponentType::Framework, "nextjs"),
        ]);

        let analysis = analyze(&context, &input);
        for item in analysis.direct() {
            assert_eq!(item.matched_files, 0, "{}", item.component);
            assert_eq!(item.effort, Effort::S);
            assert_eq!(item.risk, RiskLevel::Low);
        }
    }

    const VOCABULARY_SAMPLE: &[(ComponentType, &str)] = &[
        (ComponentType::Database, "postgresql"),
        (ComponentType::Database, "qdrant"),
        (ComponentType::Database, "redis"),
        (ComponentType::Framework, "express"),
        (ComponentType::Framework, "django"),
        (ComponentType::Service, "stripe"),
        (ComponentType::Service, "kafka"),
        (ComponentType::Infrastructure, "docker"),
        (ComponentType::Infrastructure, "kubernetes"),
    ];

    const PATH_SAMPLE: &[&str] = &[
        "src/db/postgres.ts",
        "src/vector/store.py",
        "src/cache/redis.js",
        "src/routes/users.js",
        "app/views.py",
        "src/payment/stripe.ts",
        "src/events/consumer.ts",
        "Dockerfile",
        "k8s/deployment.yaml",
        "deploy/prod/app.yaml",
        "README.md",
    ];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_direct_items_precede_indirect_in_component_order(
            picked in prop::sample::subsequence(VOCABULARY_SAMPLE.to_vec(), 0..=VOCABULARY_SAMPLE.len())
                .prop_shuffle(),
            paths in prop::collection::vec(prop::sample::select(PATH_SAMPLE.to_vec()), 0..12),
        ) {
            let components: Vec<Component> = picked
                .iter()
                .map(|(kind, name)| Component::new(*kind, *name))
                .collect();
            let context = context_with(components.clone());
            let input = ProfilerInput::new(paths.iter().map(|p| p.to_string()).collect());
            let analysis = analyze(&context, &input);

            let first_indirect = analysis
                .items
                .iter()
                .position(|i| i.origin != ImpactOrigin::Direct)
                .unwrap_or(analysis.items.len());
            prop_assert!(analysis.items[first_indirect..]
                .iter()
                .all(|i| i.origin != ImpactOrigin::Direct));

            let expected: Vec<String> = components.iter().map(|c| c.display_name()).collect();
            let leading: Vec<String> = analysis
                .items
                .iter()
                .take(components.len())
                .map(|i| i.component.clone())
                .collect();
            prop_assert_eq!(leading, expected);

            let direct_names: Vec<&str> = analysis.items[..first_indirect]
                .iter()
                .map(|i| i.component.as_str())
                .collect();
            let trigger_positions: Vec<usize> = analysis.items[first_indirect..]
                .iter()
                .filter_map(|i| match &i.origin {
                    ImpactOrigin::Indirect { triggered_by } => {
                        direct_names.iter().position(|n| n == triggered_by)
                    }
                    ImpactOrigin::Direct => None,
                })
                .collect();
            prop_assert_eq!(trigger_positions.len(), analysis.items.len() - first_indirect);
            prop_assert!(trigger_positions.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
