//! Petri-net projection
//!
//! Each step expands to `place_in -> transition -> place_out` with two
//! structural edges; each valid arc becomes one edge
//! `place_out(source) -> place_in(target)`. Projecting N steps with M
//! valid arcs yields exactly 3N nodes and 2N+M edges.

use crate::ast::Document;
use crate::graph::degree::Degrees;
use crate::graph::view::{Edge, Node, NodeKind, ViewGraph};
use crate::layout::PositionMap;

pub fn place_in_id(step: &str) -> String {
    format!("{step}__place_in")
}

pub fn transition_id(step: &str) -> String {
    format!("{step}__transition")
}

pub fn place_out_id(step: &str) -> String {
    format!("{step}__place_out")
}

pub fn project(document: &Document, positions: &PositionMap, degrees: &Degrees) -> ViewGraph {
    let mut graph = ViewGraph::default();
    for step in &document.workflow {
        let id = step.step.as_str();
        let initial = degrees.in_degree(id) == 0;
        let terminal = degrees.out_degree(id) == 0;

        graph.nodes.push(Node {
            id: place_in_id(id),
            label: step.step.clone(),
            desc: None,
            kind: NodeKind::Place {
                initial,
                terminal: false,
            },
            position: None,
        });
        graph.nodes.push(Node {
            id: transition_id(id),
            label: step.step.clone(),
            desc: step.desc.clone(),
            kind: NodeKind::Transition,
            position: positions.get(id).copied(),
        });
        graph.nodes.push(Node {
            id: place_out_id(id),
            label: step.step.clone(),
            desc: None,
            kind: NodeKind::Place {
                initial: false,
                terminal,
            },
            position: None,
        });

        graph.edges.push(Edge {
            id: format!("{id}__flow_in"),
            source: place_in_id(id),
            target: transition_id(id),
            when: None,
        });
        graph.edges.push(Edge {
            id: format!("{id}__flow_out"),
            source: transition_id(id),
            target: place_out_id(id),
            when: None,
        });
    }

    for step in &document.workflow {
        for (index, arc) in degrees.valid_arcs(step).enumerate() {
            graph.edges.push(Edge {
                id: format!("{}->{}:{}", step.step, arc.step, index),
                source: place_out_id(&step.step),
                target: place_in_id(&arc.step),
                when: arc.when.clone(),
            });
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;
    use crate::graph::{self, ViewMode};

    const DIAMOND: &str = r#"
workflow:
  - step: start
    next:
      arcs:
        - step: warm
          when: "{{ temp > 20 }}"
        - step: cold
  - step: warm
    next:
      arcs:
        - step: end
  - step: cold
    next:
      arcs:
        - step: end
  - step: end
"#;

    #[test]
    fn node_and_edge_counts() {
        let doc = parse(DIAMOND).unwrap();
        let g = graph::project(&doc, &PositionMap::new(), ViewMode::Petri);
        // 4 steps, 4 valid arcs: 3N nodes, 2N+M edges
        assert_eq!(g.nodes.len(), 12);
        assert_eq!(g.edges.len(), 12);
    }

    #[test]
    fn markings_follow_transition_degrees() {
        let doc = parse(DIAMOND).unwrap();
        let g = graph::project(&doc, &PositionMap::new(), ViewMode::Petri);
        let kind = |id: &str| {
            g.nodes
                .iter()
                .find(|n| n.id == id)
                .map(|n| n.kind)
                .unwrap()
        };
        assert_eq!(
            kind("start__place_in"),
            NodeKind::Place {
                initial: true,
                terminal: false
            }
        );
        assert_eq!(
            kind("end__place_out"),
            NodeKind::Place {
                initial: false,
                terminal: true
            }
        );
        assert_eq!(
            kind("warm__place_in"),
            NodeKind::Place {
                initial: false,
                terminal: false
            }
        );
    }

    #[test]
    fn arc_edges_connect_places_not_transitions() {
        let doc = parse(DIAMOND).unwrap();
        let g = graph::project(&doc, &PositionMap::new(), ViewMode::Petri);
        let arc_edge = g
            .edges
            .iter()
            .find(|e| e.source == "start__place_out" && e.target == "warm__place_in")
            .unwrap();
        assert!(arc_edge.when.is_some());
    }
}
