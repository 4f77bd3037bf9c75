//! Fixed diagram templates
//!
//! Each builder interpolates names that already exist in an upstream artifact
//! into a fixed Mermaid shape. No graph is inferred from the names.

use super::mermaid::{DiagramKind, sanitize_label};
use super::SectionStrategy;
use crate::pipeline::impact::{ImpactAnalysis, ImpactOrigin};
use crate::pipeline::profiler::{CurrentStateProfile, TechType};

/// A generated diagram source
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagram {
    pub kind: DiagramKind,
    pub title: String,
    pub source: String,
}

impl Diagram {
    fn new(kind: DiagramKind, title: &str, source: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            source,
        }
    }
}

/// Layer chain from the strategy, with detected frameworks hanging off the
/// first layer and data stores off the last.
pub fn architecture_flowchart(strategy: &SectionStrategy, profile: &CurrentStateProfile) -> Diagram {
    let mut lines = vec!["flowchart TD".to_string()];

    for (i, layer) in strategy.layers.iter().enumerate() {
        lines.push(format!("    L{}[\"{}\"]", i, sanitize_label(layer)));
    }
    for i in 1..strategy.layers.len() {
        lines.push(format!("    L{} --> L{}", i - 1, i));
    }

    let last = strategy.layers.len().saturating_sub(1);
    let attachments = [(TechType::Framework, 0usize), (TechType::Database, last)];
    let mut node = 0;
    for (tech_type, layer) in attachments {
        for tech in profile.tech_of_type(tech_type) {
            lines.push(format!(
                "    T{}[(\"{}\")] --- L{}",
                node,
                sanitize_label(&tech.name),
                layer
            ));
            node += 1;
        }
    }

    Diagram::new(DiagramKind::Flowchart, "Current architecture", lines.join("\n"))
}

/// Change request fanning out to direct items; indirect items hang off the
/// item that triggered them with a dotted edge.
pub fn impact_flowchart(analysis: &ImpactAnalysis) -> Diagram {
    let mut lines = vec![
        "flowchart LR".to_string(),
        "    CR((\"Change request\"))".to_string(),
    ];

    for (i, item) in analysis.items.iter().enumerate() {
        lines.push(format!(
            "    I{}[\"{} ({})\"]",
            i,
            sanitize_label(&item.component),
            item.effort
        ));
    }

    for (i, item) in analysis.items.iter().enumerate() {
        match &item.origin {
            ImpactOrigin::Direct => lines.push(format!("    CR --> I{}", i)),
            ImpactOrigin::Indirect { triggered_by } => {
                let parent = analysis
                    .items
                    .iter()
                    .position(|p| p.is_direct() && &p.component == triggered_by);
                match parent {
                    Some(p) => lines.push(format!("    I{} -.-> I{}", p, i)),
                    None => lines.push(format!("    CR -.-> I{}", i)),
                }
            }
        }
    }

    Diagram::new(DiagramKind::Flowchart, "Change impact", lines.join("\n"))
}

/// One entity block per detected data entity, no relationships
pub fn entity_diagram(entities: &[String]) -> Option<Diagram> {
    if entities.is_empty() {
        return None;
    }

    let mut lines = vec!["erDiagram".to_string()];
    for entity in entities {
        let name: String = entity
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() {
            continue;
        }
        lines.push(format!("    {} {{", name.to_uppercase()));
        lines.push("        string id".to_string());
        lines.push("    }".to_string());
    }

    (lines.len() > 1).then(|| Diagram::new(DiagramKind::Er, "Data entities", lines.join("\n")))
}

/// Request/response walk through the strategy's layers
pub fn request_sequence(strategy: &SectionStrategy) -> Diagram {
    let mut lines = vec![
        "sequenceDiagram".to_string(),
        "    participant C as Client".to_string(),
    ];
    for (i, layer) in strategy.layers.iter().enumerate() {
        lines.push(format!("    participant L{} as {}", i, sanitize_label(layer)));
    }

    let mut prev = "C".to_string();
    for i in 0..strategy.layers.len() {
        let next = format!("L{}", i);
        lines.push(format!("    {}->>{}: request", prev, next));
        prev = next;
    }
    for i in (0..strategy.layers.len()).rev() {
        let to = if i == 0 { "C".to_string() } else { format!("L{}", i - 1) };
        lines.push(format!("    L{}-->>{}: response", i, to));
    }

    Diagram::new(DiagramKind::Sequence, "Request flow", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::impact::ImpactItem;
    use crate::pipeline::profiler::TechFact;
    use crate::pipeline::report::mermaid::MermaidValidator;
    use crate::pipeline::report::strategy_for;
    use crate::pipeline::types::{Effort, ImpactKind, ProjectType, RiskLevel};

    fn impact(component: &str, origin: ImpactOrigin) -> ImpactItem {
        ImpactItem {
            component: component.to_string(),
            change_type: ImpactKind::Schema,
            effort: Effort::M,
            risk: RiskLevel::Medium,
            evidence: Vec::new(),
            origin,
            matched_files: 0,
        }
    }

    #[test]
    fn test_architecture_flowchart_is_valid() {
        let profile = CurrentStateProfile {
            tech_stack: vec![
                TechFact {
                    tech_type: TechType::Framework,
                    name: "Express".to_string(),
                    evidence_count: 2,
                },
                TechFact {
                    tech_type: TechType::Database,
                    name: "PostgreSQL".to_string(),
                    evidence_count: 1,
                },
            ],
            ..CurrentStateProfile::default()
        };
        let diagram = architecture_flowchart(strategy_for(ProjectType::Backend), &profile);
        assert!(diagram.source.contains("Express"));
        assert!(diagram.source.contains("T1[(\"PostgreSQL\")] --- L2"));
        assert!(MermaidValidator::is_valid(diagram.kind, &diagram.source));
    }

    #[test]
    fn test_impact_flowchart_links_indirect_to_trigger() {
        let analysis = ImpactAnalysis {
            items: vec![
                impact("Qdrant", ImpactOrigin::Direct),
                impact(
                    "Data Access Layer",
                    ImpactOrigin::Indirect {
                        triggered_by: "Qdrant".to_string(),
                    },
                ),
            ],
            ambiguities: Vec::new(),
        };
        let diagram = impact_flowchart(&analysis);
        assert!(diagram.source.contains("CR --> I0"));
        assert!(diagram.source.contains("I0 -.-> I1"));
        assert!(MermaidValidator::is_valid(diagram.kind, &diagram.source));
    }

    #[test]
    fn test_entity_diagram() {
        assert!(entity_diagram(&[]).is_none());
        let diagram = entity_diagram(&["OrderItem".to_string(), "User".to_string()])
            .expect("entities present");
        assert!(diagram.source.contains("ORDERITEM {"));
        assert!(MermaidValidator::is_valid(diagram.kind, &diagram.source));
    }

    #[test]
    fn test_request_sequence_is_valid() {
        let diagram = request_sequence(strategy_for(ProjectType::Frontend));
        assert!(diagram.source.starts_with("sequenceDiagram"));
        assert!(diagram.source.contains("C->>L0: request"));
        assert!(diagram.source.contains("L0-->>C: response"));
        assert!(MermaidValidator::is_valid(diagram.kind, &diagram.source));
    }
}
