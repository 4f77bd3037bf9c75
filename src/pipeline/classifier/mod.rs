//! Change-Request Classifier
//!
//! Turns free text into a [`ChangeContext`]. The default [`KeywordClassifier`]
//! is heuristic keyword matching; the [`Classifier`] trait lets another
//! implementation replace it without touching the rest of the pipeline.

mod vocabulary;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

use super::types::{ChangeType, Concept, ImpactKind, Scope};
use crate::types::{capitalize_first, log_filter_warn};

pub use vocabulary::ComponentType;
pub(crate) use vocabulary::{COMPONENT_VOCABULARY, component_def};
use vocabulary::{CHANGE_TYPE_PATTERNS, CONCEPT_PATTERNS, SCOPE_PATTERNS, STOP_WORDS};

// =============================================================================
// Types
// =============================================================================

/// Change request as supplied by the intake collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ChangeRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title and description joined into the classifier's input text
    pub fn text(&self) -> String {
        let title = self.title.trim();
        let description = self.description.trim();
        match (title.is_empty(), description.is_empty()) {
            (true, true) => String::new(),
            (false, true) => title.to_string(),
            (true, false) => description.to_string(),
            (false, false) => format!("{}\n\n{}", title, description),
        }
    }
}

/// A named technical component found in the change request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Canonical lowercase name
    pub name: String,
}

impl Component {
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Self {
        Self {
            component_type,
            name: name.into().to_lowercase(),
        }
    }

    pub fn display_name(&self) -> String {
        component_def(&self.name)
            .map(|def| def.display_name.to_string())
            .unwrap_or_else(|| capitalize_first(&self.name))
    }

    /// Kind of impact a change to this component predicts
    pub fn impact_kind(&self) -> ImpactKind {
        component_def(&self.name)
            .map(|def| def.impact_kind)
            .unwrap_or(match self.component_type {
                ComponentType::Database => ImpactKind::Schema,
                ComponentType::Framework => ImpactKind::Logic,
                ComponentType::Service => ImpactKind::Config,
                ComponentType::Infrastructure => ImpactKind::Infra,
            })
    }

    /// Path fragments that locate files touching this component
    pub fn path_hints(&self) -> Vec<String> {
        let mut hints = vec![self.name.clone()];
        if let Some(def) = component_def(&self.name) {
            for hint in def.path_hints {
                if !hints.iter().any(|h| h == hint) {
                    hints.push(hint.to_string());
                }
            }
        }
        hints
    }
}

/// Structured reading of a change request. Immutable once derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContext {
    pub raw_text: String,
    pub concepts: BTreeSet<Concept>,
    pub change_type: ChangeType,
    pub components: Vec<Component>,
    pub scope: Scope,
    pub keywords: BTreeSet<String>,
}

impl ChangeContext {
    pub fn has_concept(&self, concept: Concept) -> bool {
        self.concepts.contains(&concept)
    }

    pub fn components_of(&self, component_type: ComponentType) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.component_type == component_type)
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Pluggable text → context capability
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> ChangeContext;
}

static CONCEPT_REGEXES: LazyLock<Vec<(Concept, Regex)>> =
    LazyLock::new(|| compile_family(CONCEPT_PATTERNS, "invalid concept pattern"));

static CHANGE_TYPE_REGEXES: LazyLock<Vec<(ChangeType, Regex)>> =
    LazyLock::new(|| compile_family(CHANGE_TYPE_PATTERNS, "invalid change-type pattern"));

static SCOPE_REGEXES: LazyLock<Vec<(Scope, Regex)>> =
    LazyLock::new(|| compile_family(SCOPE_PATTERNS, "invalid scope pattern"));

fn compile_family<T: Copy>(patterns: &[(T, &str)], context: &str) -> Vec<(T, Regex)> {
    patterns
        .iter()
        .filter_map(|(tag, pattern)| log_filter_warn(Regex::new(pattern), context).map(|re| (*tag, re)))
        .collect()
}

/// Keyword-family classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn detect_concepts(text: &str) -> BTreeSet<Concept> {
        CONCEPT_REGEXES
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(concept, _)| *concept)
            .collect()
    }

    fn detect_change_type(text: &str) -> ChangeType {
        CHANGE_TYPE_REGEXES
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(change_type, _)| *change_type)
            .unwrap_or_default()
    }

    fn detect_scope(text: &str) -> Scope {
        SCOPE_REGEXES
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(scope, _)| *scope)
            .unwrap_or_default()
    }

    /// Components in order of first appearance, deduplicated
    fn extract_components(normalized: &str) -> Vec<Component> {
        let mut hits: Vec<(usize, usize)> = COMPONENT_VOCABULARY
            .iter()
            .enumerate()
            .filter_map(|(index, def)| {
                def.aliases
                    .iter()
                    .filter_map(|alias| normalized.find(&format!(" {} ", alias)))
                    .min()
                    .map(|pos| (pos, index))
            })
            .collect();
        hits.sort();

        hits.into_iter()
            .map(|(_, index)| {
                let def = &COMPONENT_VOCABULARY[index];
                Component::new(def.component_type, def.key)
            })
            .collect()
    }

    fn extract_keywords(tokens: &[String]) -> BTreeSet<String> {
        tokens
            .iter()
            .filter(|t| t.chars().count() >= 3)
            .filter(|t| t.chars().any(|c| c.is_alphabetic()))
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .filter(|t| {
                !COMPONENT_VOCABULARY
                    .iter()
                    .any(|def| def.aliases.contains(&t.as_str()))
            })
            .cloned()
            .collect()
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> ChangeContext {
        if text.trim().is_empty() {
            debug!("Empty change request, using default context");
            return ChangeContext {
                raw_text: text.to_string(),
                ..Default::default()
            };
        }

        let tokens = tokenize(text);
        let normalized = format!(" {} ", tokens.join(" "));

        let context = ChangeContext {
            raw_text: text.to_string(),
            concepts: Self::detect_concepts(text),
            change_type: Self::detect_change_type(text),
            components: Self::extract_components(&normalized),
            scope: Self::detect_scope(text),
            keywords: Self::extract_keywords(&tokens),
        };

        debug!(
            change_type = %context.change_type,
            scope = %context.scope,
            concepts = context.concepts.len(),
            components = context.components.len(),
            "Classified change request"
        );
        context
    }
}

/// Lowercase tokens; `.`, `-`, `+` and `#` stay inside tokens (`next.js`, `c#`)
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '#')))
        .map(|t| t.trim_matches(|c| c == '.' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
