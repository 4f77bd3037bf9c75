//! Mermaid Source Validation
//!
//! Lenient structural checks for the diagram sources the report assembler
//! generates. The Mermaid runtime remains the real parser; this only catches
//! templates that were interpolated into something clearly broken.
//!
//! Supported kinds: flowchart, sequenceDiagram, erDiagram.

use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Er,
}

impl DiagramKind {
    fn from_header(line: &str) -> Option<Self> {
        let lower = line.trim().to_lowercase();
        if lower.starts_with("flowchart") || lower.starts_with("graph") {
            Some(Self::Flowchart)
        } else if lower.starts_with("sequencediagram") {
            Some(Self::Sequence)
        } else if lower.starts_with("erdiagram") {
            Some(Self::Er)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidIssueType {
    EmptyDiagram,
    UnknownDiagramType,
    KindMismatch,
    UnbalancedBrackets,
    MismatchedQuotes,
    DanglingEdge,
    UnexpectedEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidIssue {
    /// 1-based line within the diagram source
    pub line: usize,
    pub issue_type: MermaidIssueType,
    pub description: String,
}

impl MermaidIssue {
    fn new(line: usize, issue_type: MermaidIssueType, description: impl Into<String>) -> Self {
        Self {
            line,
            issue_type,
            description: description.into(),
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

pub struct MermaidValidator;

impl MermaidValidator {
    /// Validate one diagram source against the kind it claims to be
    pub fn validate(kind: DiagramKind, source: &str) -> Vec<MermaidIssue> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return vec![MermaidIssue::new(1, MermaidIssueType::EmptyDiagram, "Diagram is empty")];
        }

        let header = trimmed.lines().next().unwrap_or_default();
        let Some(detected) = DiagramKind::from_header(header) else {
            return vec![MermaidIssue::new(
                1,
                MermaidIssueType::UnknownDiagramType,
                format!("Unknown diagram type: '{}'", header.chars().take(30).collect::<String>()),
            )];
        };

        let mut issues = Vec::new();
        if detected != kind {
            issues.push(MermaidIssue::new(
                1,
                MermaidIssueType::KindMismatch,
                format!("Expected {:?} diagram, found {:?}", kind, detected),
            ));
        }

        match detected {
            DiagramKind::Flowchart => issues.extend(Self::check_flowchart_edges(trimmed)),
            DiagramKind::Sequence => issues.extend(Self::check_sequence_blocks(trimmed)),
            DiagramKind::Er => issues.extend(Self::check_er_relationships(trimmed)),
        }

        // ER cardinality markers such as `||--o{` are not brackets
        let skip_relationships = detected == DiagramKind::Er;
        if let Some(issue) = Self::check_balanced_brackets(trimmed, skip_relationships) {
            issues.push(issue);
        }
        if let Some(issue) = Self::check_quotes(trimmed) {
            issues.push(issue);
        }

        if issues.is_empty() {
            debug!(kind = ?kind, "Diagram is valid");
        }
        issues
    }

    pub fn is_valid(kind: DiagramKind, source: &str) -> bool {
        Self::validate(kind, source).is_empty()
    }

    // =========================================================================
    // Per-kind checks
    // =========================================================================

    fn check_flowchart_edges(content: &str) -> Vec<MermaidIssue> {
        const ARROWS: [&str; 4] = ["-.->", "==>", "-->", "---"];

        let mut issues = Vec::new();
        for (i, line) in content.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || trimmed.starts_with("%%")
                || trimmed.starts_with("subgraph")
                || trimmed == "end"
                || trimmed.starts_with("style")
                || trimmed.starts_with("classDef")
            {
                continue;
            }

            let Some((idx, arrow)) = ARROWS
                .iter()
                .filter_map(|a| trimmed.find(a).map(|idx| (idx, *a)))
                .min_by_key(|(idx, _)| *idx)
            else {
                continue;
            };

            let source = trimmed[..idx].trim();
            let mut target = trimmed[idx + arrow.len()..].trim();
            if let Some(labelled) = target.strip_prefix('|') {
                target = labelled.split_once('|').map(|(_, rest)| rest.trim()).unwrap_or("");
            }

            if source.is_empty() || target.is_empty() {
                issues.push(MermaidIssue::new(
                    i + 1,
                    MermaidIssueType::DanglingEdge,
                    "Edge has no source or target",
                ));
            }
        }
        issues
    }

    fn check_sequence_blocks(content: &str) -> Vec<MermaidIssue> {
        const BLOCKS: [&str; 7] = ["loop", "alt", "opt", "par", "critical", "break", "rect"];

        let mut issues = Vec::new();
        let mut depth = 0usize;
        for (i, line) in content.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed == "end" {
                if depth == 0 {
                    issues.push(MermaidIssue::new(
                        i + 1,
                        MermaidIssueType::UnexpectedEnd,
                        "'end' without a matching block",
                    ));
                } else {
                    depth -= 1;
                }
            } else if BLOCKS
                .iter()
                .any(|kw| trimmed.split_whitespace().next() == Some(*kw))
            {
                depth += 1;
            }
        }

        if depth > 0 {
            issues.push(MermaidIssue::new(
                1,
                MermaidIssueType::UnexpectedEnd,
                format!("{} unclosed block(s)", depth),
            ));
        }
        issues
    }

    fn check_er_relationships(content: &str) -> Vec<MermaidIssue> {
        let mut issues = Vec::new();
        for (i, line) in content.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            // Relationship lines look like `A ||--o{ B : label`
            if trimmed.contains("--") && !trimmed.contains(':') {
                issues.push(MermaidIssue::new(
                    i + 1,
                    MermaidIssueType::DanglingEdge,
                    "Relationship is missing its label",
                ));
            }
        }
        issues
    }

    // =========================================================================
    // Universal checks
    // =========================================================================

    fn check_balanced_brackets(content: &str, skip_relationships: bool) -> Option<MermaidIssue> {
        let (mut brace, mut bracket, mut paren) = (0i32, 0i32, 0i32);
        let mut in_string = false;

        for (i, line) in content.lines().enumerate() {
            if skip_relationships && line.contains("--") {
                continue;
            }
            for ch in line.chars() {
                if ch == '"' {
                    in_string = !in_string;
                    continue;
                }
                if in_string {
                    continue;
                }
                match ch {
                    '{' => brace += 1,
                    '}' => brace -= 1,
                    '[' => bracket += 1,
                    ']' => bracket -= 1,
                    '(' => paren += 1,
                    ')' => paren -= 1,
                    _ => {}
                }
                if brace < 0 || bracket < 0 || paren < 0 {
                    return Some(MermaidIssue::new(
                        i + 1,
                        MermaidIssueType::UnbalancedBrackets,
                        "Closing bracket without matching opening",
                    ));
                }
            }
        }

        (brace != 0 || bracket != 0 || paren != 0).then(|| {
            MermaidIssue::new(
                1,
                MermaidIssueType::UnbalancedBrackets,
                format!(
                    "Unbalanced brackets: braces={}, brackets={}, parens={}",
                    brace, bracket, paren
                ),
            )
        })
    }

    fn check_quotes(content: &str) -> Option<MermaidIssue> {
        let count = content.chars().filter(|c| *c == '"').count();
        (count % 2 != 0).then(|| {
            MermaidIssue::new(1, MermaidIssueType::MismatchedQuotes, "Unmatched double quotes")
        })
    }
}

/// Strip characters that would break a quoted Mermaid label
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '"' | '[' | ']' | '(' | ')' | '{' | '}' | '|' | '<' | '>' | ';' => ' ',
            _ => c,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_flowchart() {
        let source = "flowchart TD\n    A[\"Start\"] --> B{\"Decision\"}\n    B -->|Yes| C[\"Act\"]\n";
        assert!(MermaidValidator::is_valid(DiagramKind::Flowchart, source));
    }

    #[test]
    fn test_dangling_edge() {
        let source = "flowchart TD\n    A -->\n";
        let issues = MermaidValidator::validate(DiagramKind::Flowchart, source);
        assert!(issues.iter().any(|i| i.issue_type == MermaidIssueType::DanglingEdge));
        assert_eq!(issues[0].line, 2);
    }

    #[test]
    fn test_unbalanced_brackets() {
        let source = "flowchart TD\n    A{Start --> B\n";
        let issues = MermaidValidator::validate(DiagramKind::Flowchart, source);
        assert!(issues.iter().any(|i| i.issue_type == MermaidIssueType::UnbalancedBrackets));
    }

    #[test]
    fn test_brackets_inside_quotes_are_ignored() {
        let source = "flowchart LR\n    A[\"list[0]\"] --> B[\"ok\"]\n";
        assert!(MermaidValidator::is_valid(DiagramKind::Flowchart, source));
    }

    #[test]
    fn test_sequence_blocks() {
        let ok = "sequenceDiagram\n    A->>B: hi\n    alt ok\n    B-->>A: yes\n    end\n";
        assert!(MermaidValidator::is_valid(DiagramKind::Sequence, ok));

        let extra_end = "sequenceDiagram\n    A->>B: hi\n    end\n";
        assert!(!MermaidValidator::is_valid(DiagramKind::Sequence, extra_end));

        let unclosed = "sequenceDiagram\n    loop every minute\n    A->>B: ping\n";
        assert!(!MermaidValidator::is_valid(DiagramKind::Sequence, unclosed));
    }

    #[test]
    fn test_er_relationship_needs_label() {
        let ok = "erDiagram\n    USER ||--o{ ORDER : places\n    USER {\n        string id\n    }\n";
        assert!(MermaidValidator::is_valid(DiagramKind::Er, ok));
        let bad = "erDiagram\n    USER ||--o{ ORDER\n";
        assert!(!MermaidValidator::is_valid(DiagramKind::Er, bad));
    }

    #[test]
    fn test_empty_and_unknown() {
        let empty = MermaidValidator::validate(DiagramKind::Er, "  \n");
        assert_eq!(empty[0].issue_type, MermaidIssueType::EmptyDiagram);

        let unknown = MermaidValidator::validate(DiagramKind::Flowchart, "pie\n  \"a\" : 1\n");
        assert_eq!(unknown[0].issue_type, MermaidIssueType::UnknownDiagramType);
    }

    #[test]
    fn test_kind_mismatch() {
        let issues = MermaidValidator::validate(DiagramKind::Er, "flowchart TD\n    A --> B\n");
        assert!(issues.iter().any(|i| i.issue_type == MermaidIssueType::KindMismatch));
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Auth & \"Login\" [v2]"), "Auth & Login v2");
        assert_eq!(sanitize_label("API (REST)"), "API REST");
    }
}
