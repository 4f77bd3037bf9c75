//! Repository Profiler
//!
//! Converts a file listing, a dependency manifest and a small sample of file
//! contents into a [`CurrentStateProfile`]. Detection is heuristic: file
//! names, extensions, path fragments and dependency names are matched against
//! the static tables in [`rules`].
//!
//! ## Degradation
//! The profiler never fails. Missing inputs downgrade the affected fact to
//! `unknown` and the reason is recorded in [`CurrentStateProfile::unknown_facts`].

pub mod rules;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::{debug, info};

use self::rules::{
    API_DEPENDENCIES, AUTHENTICATION, BROKER_DEPENDENCIES, CAPABILITY_RULES, CI_PATH_FRAGMENTS,
    CONTAINER_FILES, DATA_DEPENDENCIES, ENTITY_DIRECTORIES, ENTITY_EXCLUDES, MONITORING_DEPENDENCIES,
    MONITORING_FILES, MONOREPO_FILES, PACKAGE_MANIFESTS, ROUTE_PATTERNS, SECURITY_DEPENDENCIES,
    SECURITY_PATH_FRAGMENTS, SERVERLESS_FILES, SOURCE_EXTENSIONS, TECH_RULES, TESTING_DEPENDENCIES,
    TEST_PATH_FRAGMENTS, Tier, UI_DEPENDENCIES, UTILITY_DEPENDENCIES, dependency_matches,
};
use super::types::{ComplexityLevel, PostureLevel, ProjectType};
use crate::constants::profiler::{self as limits, quality};
use crate::types::{extension_lower, file_name_lower, log_filter_warn};

pub use self::rules::TechType;

// =============================================================================
// Input
// =============================================================================

/// Raw repository signals supplied by the snapshot collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilerInput {
    /// Repository-relative file paths
    pub files: Vec<String>,
    /// Dependency name -> version
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Path -> content for manifests and a few route files
    #[serde(default)]
    pub raw_contents: BTreeMap<String, String>,
}

impl ProfilerInput {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    pub fn with_dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), version.into());
        self
    }

    pub fn with_content(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.raw_contents.insert(path.into(), content.into());
        self
    }
}

// =============================================================================
// Profile
// =============================================================================

/// A detected technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechFact {
    #[serde(rename = "type")]
    pub tech_type: TechType,
    pub name: String,
    pub evidence_count: usize,
}

/// Overall repository layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    Monorepo,
    Layered,
    Modular,
    Flat,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    pub patterns: BTreeSet<String>,
    pub structure: Structure,
    pub complexity_level: ComplexityLevel,
    /// Route registrations found in the sampled contents
    pub route_count: usize,
}

/// Dependency buckets, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyCategory {
    Core,
    Data,
    Api,
    Ui,
    Testing,
    Utilities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityPosture {
    pub test_coverage: PostureLevel,
    pub documentation_level: PostureLevel,
    pub monitoring_level: PostureLevel,
    pub security_level: PostureLevel,
    /// Recorded for reporting, not scored
    pub ci_configured: bool,
    pub score: u32,
    pub level: PostureLevel,
}

/// A fact that could not be observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownFact {
    pub fact: String,
    pub reason: String,
}

/// Abstract current-state profile of the repository. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStateProfile {
    pub tech_stack: Vec<TechFact>,
    pub architecture: Architecture,
    pub dependencies: BTreeMap<DependencyCategory, Vec<String>>,
    pub capabilities: BTreeSet<String>,
    pub quality: QualityPosture,
    pub data_entities: Vec<String>,
    pub project_type: ProjectType,
    pub file_count: usize,
    pub unknown_facts: Vec<UnknownFact>,
}

impl CurrentStateProfile {
    pub fn has_tech(&self, name: &str) -> bool {
        self.tech_stack.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    pub fn has_pattern(&self, name: &str) -> bool {
        self.architecture.patterns.contains(name)
    }

    pub fn tech_of_type(&self, tech_type: TechType) -> impl Iterator<Item = &TechFact> {
        self.tech_stack.iter().filter(move |t| t.tech_type == tech_type)
    }

    pub fn has_authentication(&self) -> bool {
        self.has_capability(AUTHENTICATION)
    }
}

// =============================================================================
// Pattern Names
// =============================================================================

pub const PATTERN_CONTAINERIZED: &str = "Containerized";
pub const PATTERN_SERVICE_ORIENTED: &str = "Service-oriented";
pub const PATTERN_MODULAR: &str = "Modular";
pub const PATTERN_LAYERED: &str = "Layered";
pub const PATTERN_MONOREPO: &str = "Monorepo";
pub const PATTERN_EVENT_DRIVEN: &str = "Event-driven";
pub const PATTERN_SERVERLESS: &str = "Serverless";
pub const PATTERN_CI_CD: &str = "CI/CD";

static ROUTE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ROUTE_PATTERNS
        .iter()
        .filter_map(|pattern| log_filter_warn(Regex::new(pattern), "invalid route pattern"))
        .collect()
});

// =============================================================================
// Profiler
// =============================================================================

/// Repository profiler
#[derive(Debug, Clone, Default)]
pub struct RepositoryProfiler {
    project_type_override: Option<ProjectType>,
}

/// Lowercased view of the input computed once per run
struct Signals<'a> {
    paths: Vec<(String, &'a str)>,
    dependencies: Vec<String>,
}

impl<'a> Signals<'a> {
    fn new(input: &'a ProfilerInput) -> Self {
        Self {
            paths: input
                .files
                .iter()
                .map(|f| (f.to_lowercase(), f.as_str()))
                .collect(),
            dependencies: input.dependencies.keys().map(|d| d.to_lowercase()).collect(),
        }
    }

    fn has_dependency_in(&self, names: &[&str]) -> bool {
        self.dependencies.iter().any(|d| names.contains(&d.as_str()))
    }

    fn count_paths_containing(&self, fragments: &[&str]) -> usize {
        self.paths
            .iter()
            .filter(|(lower, _)| fragments.iter().any(|f| lower.contains(f)))
            .count()
    }

    fn has_file_named(&self, names: &[&str]) -> bool {
        self.paths
            .iter()
            .any(|(lower, _)| names.contains(&file_name_lower(lower).as_str()))
    }
}

impl RepositoryProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a project type instead of detecting it
    pub fn with_project_type(mut self, project_type: Option<ProjectType>) -> Self {
        self.project_type_override = project_type;
        self
    }

    /// Build the current-state profile
    pub fn profile(&self, input: &ProfilerInput) -> CurrentStateProfile {
        let signals = Signals::new(input);
        let mut unknown_facts = Vec::new();

        if input.files.is_empty() {
            unknown_facts.push(UnknownFact {
                fact: "architecture".to_string(),
                reason: "empty file listing".to_string(),
            });
        }
        if input.dependencies.is_empty() {
            unknown_facts.push(UnknownFact {
                fact: "dependencies".to_string(),
                reason: "no dependency manifest".to_string(),
            });
        }
        if input.raw_contents.is_empty() {
            unknown_facts.push(UnknownFact {
                fact: "apiRoutes".to_string(),
                reason: "no file contents sampled".to_string(),
            });
        }

        let tech_stack = Self::detect_tech_stack(&signals);
        let architecture = Self::detect_architecture(input, &signals);
        let dependencies = Self::categorize_dependencies(&signals);
        let capabilities = Self::detect_capabilities(&signals);
        let quality = Self::assess_quality(input, &signals);
        let data_entities = Self::extract_data_entities(&signals);

        let project_type = self
            .project_type_override
            .unwrap_or_else(|| Self::detect_project_type(&tech_stack, &architecture, &signals));

        info!(
            files = input.files.len(),
            tech = tech_stack.len(),
            capabilities = capabilities.len(),
            score = quality.score,
            "Profiled repository"
        );

        CurrentStateProfile {
            tech_stack,
            architecture,
            dependencies,
            capabilities,
            quality,
            data_entities,
            project_type,
            file_count: input.files.len(),
            unknown_facts,
        }
    }

    fn detect_tech_stack(signals: &Signals<'_>) -> Vec<TechFact> {
        let mut facts = Vec::new();

        for rule in TECH_RULES {
            let dep_hits = signals
                .dependencies
                .iter()
                .filter(|d| rule.dependencies.contains(&d.as_str()))
                .count();

            let file_hits = signals
                .paths
                .iter()
                .filter(|(lower, _)| {
                    let name = file_name_lower(lower);
                    rule.filenames.contains(&name.as_str())
                        || extension_lower(lower)
                            .is_some_and(|ext| rule.extensions.contains(&ext.as_str()))
                        || rule.path_fragments.iter().any(|f| lower.contains(f))
                })
                .count();

            let evidence_count = dep_hits + file_hits;
            if evidence_count > 0 {
                facts.push(TechFact {
                    tech_type: rule.tech_type,
                    name: rule.name.to_string(),
                    evidence_count,
                });
            }
        }

        debug!("Detected {} tech facts", facts.len());
        facts
    }

    fn detect_architecture(input: &ProfilerInput, signals: &Signals<'_>) -> Architecture {
        let file_count = input.files.len();
        let mut patterns = BTreeSet::new();

        if signals.has_file_named(CONTAINER_FILES) {
            patterns.insert(PATTERN_CONTAINERIZED.to_string());
        }

        let route_count = Self::count_routes(input);
        if route_count >= limits::SERVICE_ORIENTED_ROUTE_MATCHES {
            patterns.insert(PATTERN_SERVICE_ORIENTED.to_string());
        }

        if file_count > limits::MODULAR_FILE_COUNT {
            patterns.insert(PATTERN_MODULAR.to_string());
        }

        let has_dir = |dir: &str| {
            signals
                .paths
                .iter()
                .any(|(lower, _)| lower.split('/').any(|seg| seg == dir))
        };
        let layered = (has_dir("controllers") || has_dir("handlers") || has_dir("routes"))
            && (has_dir("services") || has_dir("models"));
        if layered {
            patterns.insert(PATTERN_LAYERED.to_string());
        }

        let workspace_manifests = signals
            .paths
            .iter()
            .filter(|(lower, _)| {
                (lower.contains("packages/") || lower.contains("apps/"))
                    && PACKAGE_MANIFESTS.contains(&file_name_lower(lower).as_str())
            })
            .count();
        let monorepo = workspace_manifests >= 2 || signals.has_file_named(MONOREPO_FILES);
        if monorepo {
            patterns.insert(PATTERN_MONOREPO.to_string());
        }

        if signals.has_dependency_in(BROKER_DEPENDENCIES) {
            patterns.insert(PATTERN_EVENT_DRIVEN.to_string());
        }

        if signals.has_file_named(SERVERLESS_FILES) {
            patterns.insert(PATTERN_SERVERLESS.to_string());
        }

        if signals.count_paths_containing(CI_PATH_FRAGMENTS) > 0 {
            patterns.insert(PATTERN_CI_CD.to_string());
        }

        let structure = if file_count == 0 {
            Structure::Unknown
        } else if monorepo {
            Structure::Monorepo
        } else if layered {
            Structure::Layered
        } else if file_count > limits::MODULAR_FILE_COUNT {
            Structure::Modular
        } else {
            Structure::Flat
        };

        let complexity_level = if file_count == 0 {
            ComplexityLevel::Unknown
        } else if file_count > limits::HIGH_COMPLEXITY_FILE_COUNT {
            ComplexityLevel::High
        } else if file_count > limits::MEDIUM_COMPLEXITY_FILE_COUNT {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Low
        };

        Architecture {
            patterns,
            structure,
            complexity_level,
            route_count,
        }
    }

    /// Count route registrations across sampled contents
    fn count_routes(input: &ProfilerInput) -> usize {
        input
            .raw_contents
            .values()
            .map(|content| {
                ROUTE_REGEXES
                    .iter()
                    .map(|re| re.find_iter(content).count())
                    .sum::<usize>()
            })
            .sum()
    }

    fn categorize_dependencies(
        signals: &Signals<'_>,
    ) -> BTreeMap<DependencyCategory, Vec<String>> {
        let tables: [(DependencyCategory, &[&str]); 5] = [
            (DependencyCategory::Testing, TESTING_DEPENDENCIES),
            (DependencyCategory::Data, DATA_DEPENDENCIES),
            (DependencyCategory::Api, API_DEPENDENCIES),
            (DependencyCategory::Ui, UI_DEPENDENCIES),
            (DependencyCategory::Utilities, UTILITY_DEPENDENCIES),
        ];

        let mut categorized: BTreeMap<DependencyCategory, Vec<String>> = BTreeMap::new();
        for name in &signals.dependencies {
            let category = tables
                .iter()
                .find(|(_, tokens)| tokens.iter().any(|t| dependency_matches(name, t)))
                .map(|(category, _)| *category)
                .unwrap_or(DependencyCategory::Core);
            categorized.entry(category).or_default().push(name.clone());
        }
        categorized
    }

    fn detect_capabilities(signals: &Signals<'_>) -> BTreeSet<String> {
        CAPABILITY_RULES
            .iter()
            .filter(|rule| {
                signals.has_dependency_in(rule.dependencies)
                    || signals.count_paths_containing(rule.path_fragments) > 0
            })
            .map(|rule| rule.name.to_string())
            .collect()
    }

    fn assess_quality(input: &ProfilerInput, signals: &Signals<'_>) -> QualityPosture {
        if input.files.is_empty() {
            return QualityPosture {
                score: quality::BASE,
                ..Default::default()
            };
        }

        let is_test = |lower: &str| {
            let name = file_name_lower(lower);
            TEST_PATH_FRAGMENTS.iter().any(|f| lower.contains(f))
                || lower.starts_with("test/")
                || lower.starts_with("tests/")
                || name.starts_with("test_")
        };
        let test_files = signals.paths.iter().filter(|(l, _)| is_test(l)).count();
        let source_files = signals
            .paths
            .iter()
            .filter(|(l, _)| {
                !is_test(l)
                    && extension_lower(l).is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.as_str()))
            })
            .count();

        let test_coverage = if test_files == 0 {
            PostureLevel::None
        } else {
            let ratio = test_files as f64 / source_files.max(1) as f64;
            if ratio >= limits::TEST_RATIO_HIGH {
                PostureLevel::High
            } else if ratio >= limits::TEST_RATIO_MEDIUM {
                PostureLevel::Medium
            } else {
                PostureLevel::Low
            }
        };

        let has_readme = signals
            .paths
            .iter()
            .any(|(l, _)| file_name_lower(l).starts_with("readme"));
        let has_docs_dir = signals
            .paths
            .iter()
            .any(|(l, _)| l.starts_with("docs/") || l.contains("/docs/"));
        let has_markdown = signals
            .paths
            .iter()
            .any(|(l, _)| extension_lower(l).is_some_and(|e| e == "md" || e == "rst"));
        let documentation_level = match (has_readme, has_docs_dir, has_markdown) {
            (true, true, _) => PostureLevel::High,
            (true, false, _) | (false, true, _) => PostureLevel::Medium,
            (false, false, true) => PostureLevel::Low,
            (false, false, false) => PostureLevel::None,
        };

        let monitoring_deps = signals
            .dependencies
            .iter()
            .filter(|d| MONITORING_DEPENDENCIES.contains(&d.as_str()))
            .count();
        let monitoring_files = signals.count_paths_containing(MONITORING_FILES) > 0;
        let monitoring_level = match (monitoring_deps, monitoring_files) {
            (n, _) if n >= 2 => PostureLevel::High,
            (1, _) => PostureLevel::Medium,
            (_, true) => PostureLevel::Low,
            _ if input.dependencies.is_empty() => PostureLevel::Unknown,
            _ => PostureLevel::None,
        };

        let security_deps = signals.has_dependency_in(SECURITY_DEPENDENCIES);
        let security_files = signals.count_paths_containing(SECURITY_PATH_FRAGMENTS) > 0;
        let security_level = match (security_deps, security_files) {
            (true, true) => PostureLevel::High,
            (true, false) | (false, true) => PostureLevel::Medium,
            (false, false) if input.dependencies.is_empty() => PostureLevel::Unknown,
            (false, false) => PostureLevel::None,
        };

        let ci_configured = signals.count_paths_containing(CI_PATH_FRAGMENTS) > 0;

        let mut score = quality::BASE;
        if test_coverage.is_present() {
            score += quality::TESTS;
        }
        if documentation_level.is_present() {
            score += quality::DOCS;
        }
        if monitoring_level.is_present() {
            score += quality::MONITORING;
        }
        if security_level.is_present() {
            score += quality::SECURITY;
        }

        let level = if score >= quality::HIGH_THRESHOLD {
            PostureLevel::High
        } else if score >= quality::MEDIUM_THRESHOLD {
            PostureLevel::Medium
        } else {
            PostureLevel::Low
        };

        QualityPosture {
            test_coverage,
            documentation_level,
            monitoring_level,
            security_level,
            ci_configured,
            score,
            level,
        }
    }

    fn extract_data_entities(signals: &Signals<'_>) -> Vec<String> {
        let mut entities = BTreeSet::new();

        for (_, original) in &signals.paths {
            let mut segments: Vec<&str> = original.split('/').filter(|s| !s.is_empty()).collect();
            let Some(file) = segments.pop() else {
                continue;
            };
            let in_entity_dir = segments
                .last()
                .is_some_and(|dir| ENTITY_DIRECTORIES.contains(&dir.to_lowercase().as_str()));
            if !in_entity_dir {
                continue;
            }

            let stem = file.split('.').next().unwrap_or(file);
            if stem.is_empty() || ENTITY_EXCLUDES.contains(&stem.to_lowercase().as_str()) {
                continue;
            }
            entities.insert(to_entity_name(stem));
        }

        entities.into_iter().collect()
    }

    fn detect_project_type(
        tech_stack: &[TechFact],
        architecture: &Architecture,
        signals: &Signals<'_>,
    ) -> ProjectType {
        if architecture.structure == Structure::Monorepo {
            return ProjectType::Monorepo;
        }

        let tier_of = |fact: &TechFact| {
            TECH_RULES
                .iter()
                .find(|r| r.name == fact.name)
                .map(|r| r.tier)
                .unwrap_or(Tier::None)
        };
        let has_tier = |tier: Tier| tech_stack.iter().any(|f| tier_of(f) == tier);

        let frontend = has_tier(Tier::Frontend);
        let backend = has_tier(Tier::Backend);

        match (frontend, backend) {
            (true, true) => ProjectType::FullStack,
            (false, true) => ProjectType::Backend,
            (true, false) => ProjectType::Frontend,
            (false, false) if has_tier(Tier::Data) => ProjectType::DataPlatform,
            (false, false) if signals.has_file_named(PACKAGE_MANIFESTS) => ProjectType::Library,
            _ => ProjectType::Unknown,
        }
    }
}

/// `user_profile` / `user-profile` / `userProfile` -> `UserProfile`
fn to_entity_name(stem: &str) -> String {
    stem.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(crate::types::capitalize_first)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn express_input() -> ProfilerInput {
        ProfilerInput::new(vec![
            "/server/routes/auth.js".to_string(),
            "/server/index.js".to_string(),
            "package.json".to_string(),
        ])
        .with_dependency("express", "^4.18.0")
    }

    #[test]
    fn test_express_auth_scenario() {
        let profile = RepositoryProfiler::new().profile(&express_input());

        assert!(profile.tech_stack.iter().any(|t| {
            t.tech_type == TechType::Framework && t.name == "Express"
        }));
        assert!(profile.has_tech("express"));
        assert!(!profile.has_tech("django"));
        assert!(profile.has_authentication());
        assert_eq!(profile.project_type, ProjectType::Backend);
    }

    #[test]
    fn test_evidence_count_sums_signals() {
        let input = ProfilerInput::new(vec![
            "Dockerfile".to_string(),
            "docker-compose.yml".to_string(),
        ]);
        let profile = RepositoryProfiler::new().profile(&input);

        let docker = profile
            .tech_stack
            .iter()
            .find(|t| t.name == "Docker")
            .unwrap();
        assert_eq!(docker.evidence_count, 2);
        assert!(profile.has_pattern(PATTERN_CONTAINERIZED));
    }

    #[test]
    fn test_service_oriented_needs_twenty_routes() {
        let routes: String = (0..20)
            .map(|i| format!("router.get('/r{}', handler);\n", i))
            .collect();
        let input = ProfilerInput::new(vec!["src/routes/index.js".to_string()])
            .with_content("src/routes/index.js", routes);
        let profile = RepositoryProfiler::new().profile(&input);
        assert_eq!(profile.architecture.route_count, 20);
        assert!(profile.has_pattern(PATTERN_SERVICE_ORIENTED));

        let input = ProfilerInput::new(vec!["src/routes/index.js".to_string()])
            .with_content("src/routes/index.js", "router.get('/a', h);\n");
        let profile = RepositoryProfiler::new().profile(&input);
        assert!(!profile.has_pattern(PATTERN_SERVICE_ORIENTED));
    }

    #[test]
    fn test_file_count_thresholds() {
        let files: Vec<String> = (0..1001).map(|i| format!("src/f{}.js", i)).collect();
        let profile = RepositoryProfiler::new().profile(&ProfilerInput::new(files));
        assert!(profile.has_pattern(PATTERN_MODULAR));
        assert_eq!(profile.architecture.complexity_level, ComplexityLevel::High);

        let files: Vec<String> = (0..300).map(|i| format!("src/f{}.js", i)).collect();
        let profile = RepositoryProfiler::new().profile(&ProfilerInput::new(files));
        assert!(!profile.has_pattern(PATTERN_MODULAR));
        assert_eq!(profile.architecture.complexity_level, ComplexityLevel::Medium);
    }

    #[test]
    fn test_quality_score_weights() {
        let input = ProfilerInput::new(vec![
            "README.md".to_string(),
            "src/app.js".to_string(),
            "src/auth/login.js".to_string(),
            "tests/app.test.js".to_string(),
        ])
        .with_dependency("winston", "3")
        .with_dependency("express", "4");
        let profile = RepositoryProfiler::new().profile(&input);

        // base 50 + tests 20 + docs 10 + monitoring 10 + security 10
        assert_eq!(profile.quality.score, 100);
        assert_eq!(profile.quality.level, PostureLevel::High);
    }

    #[test]
    fn test_quality_without_signals_is_low() {
        let input = ProfilerInput::new(vec!["main.go".to_string()]).with_dependency("cobra", "1");
        let profile = RepositoryProfiler::new().profile(&input);
        assert_eq!(profile.quality.score, 50);
        assert_eq!(profile.quality.level, PostureLevel::Low);
        assert_eq!(profile.quality.test_coverage, PostureLevel::None);
    }

    #[test]
    fn test_empty_input_degrades_to_unknown() {
        let profile = RepositoryProfiler::new().profile(&ProfilerInput::default());

        assert_eq!(profile.architecture.structure, Structure::Unknown);
        assert_eq!(profile.architecture.complexity_level, ComplexityLevel::Unknown);
        assert_eq!(profile.quality.level, PostureLevel::Unknown);
        assert_eq!(profile.project_type, ProjectType::Unknown);
        assert!(profile.unknown_facts.iter().any(|f| f.fact == "architecture"));
        assert!(profile.unknown_facts.iter().any(|f| f.fact == "dependencies"));
    }

    #[test]
    fn test_dependency_categories() {
        let input = ProfilerInput::default()
            .with_dependency("jest", "29")
            .with_dependency("pg", "8")
            .with_dependency("express", "4")
            .with_dependency("react", "18")
            .with_dependency("lodash", "4")
            .with_dependency("left-pad", "1");
        let profile = RepositoryProfiler::new().profile(&input);

        let category = |c| profile.dependencies.get(&c).cloned().unwrap_or_default();
        assert_eq!(category(DependencyCategory::Testing), vec!["jest"]);
        assert_eq!(category(DependencyCategory::Data), vec!["pg"]);
        assert_eq!(category(DependencyCategory::Api), vec!["express"]);
        assert_eq!(category(DependencyCategory::Ui), vec!["react"]);
        assert_eq!(category(DependencyCategory::Utilities), vec!["lodash"]);
        assert_eq!(category(DependencyCategory::Core), vec!["left-pad"]);
    }

    #[test]
    fn test_data_entities_and_layering() {
        let input = ProfilerInput::new(vec![
            "src/controllers/user.js".to_string(),
            "src/models/user.js".to_string(),
            "src/models/order_item.js".to_string(),
            "src/models/index.js".to_string(),
        ]);
        let profile = RepositoryProfiler::new().profile(&input);

        assert_eq!(profile.data_entities, vec!["OrderItem", "User"]);
        assert_eq!(profile.architecture.structure, Structure::Layered);
    }

    #[test]
    fn test_project_type_detection_and_override() {
        let input = ProfilerInput::new(vec!["src/App.tsx".to_string()])
            .with_dependency("react", "18")
            .with_dependency("express", "4");
        let profile = RepositoryProfiler::new().profile(&input);
        assert_eq!(profile.project_type, ProjectType::FullStack);

        let profile = RepositoryProfiler::new()
            .with_project_type(Some(ProjectType::Library))
            .profile(&input);
        assert_eq!(profile.project_type, ProjectType::Library);
    }

    #[test]
    fn test_monorepo_detection() {
        let input = ProfilerInput::new(vec![
            "packages/api/package.json".to_string(),
            "packages/web/package.json".to_string(),
        ]);
        let profile = RepositoryProfiler::new().profile(&input);
        assert!(profile.has_pattern(PATTERN_MONOREPO));
        assert_eq!(profile.project_type, ProjectType::Monorepo);
    }

    #[test]
    fn test_profile_is_deterministic() {
        let input = express_input();
        let a = RepositoryProfiler::new().profile(&input);
        let b = RepositoryProfiler::new().profile(&input);
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_profile_is_deterministic(
            files in prop::collection::vec(
                "[a-z]{1,8}(/[a-z_]{1,8}){0,3}\\.(js|py|rs|ts|md|json|yml|tf)",
                0..40,
            ),
            deps in prop::collection::btree_map(
                prop::sample::select(vec![
                    "express", "django", "pg", "redis", "jest", "prometheus-client",
                    "passport", "kafkajs", "react", "boto3",
                ]),
                "[0-9]\\.[0-9]",
                0..5,
            ),
        ) {
            let mut input = ProfilerInput::new(files);
            for (name, version) in deps {
                input = input.with_dependency(name, version);
            }
            let a = RepositoryProfiler::new().profile(&input);
            let b = RepositoryProfiler::new().profile(&input);
            prop_assert_eq!(a.file_count, input.files.len());
            prop_assert_eq!(a, b);
        }
    }
}
