//! View projection properties: flowchart shapes and Petri structure

use skein::dsl::parse;
use skein::graph::{project, NodeKind, ViewMode};
use skein::layout::PositionMap;

#[test]
fn two_step_chain_is_terminator_to_terminator() {
    let doc = parse(
        r#"
workflow:
  - step: start
    next:
      arcs:
        - step: end
  - step: end
"#,
    )
    .unwrap();
    let graph = project(&doc, &PositionMap::new(), ViewMode::Flowchart);
    let kind = |id: &str| graph.nodes.iter().find(|n| n.id == id).unwrap().kind;
    assert_eq!(kind("start"), NodeKind::Terminator);
    assert_eq!(kind("end"), NodeKind::Terminator);
}

#[test]
fn petri_counts_are_3n_nodes_and_2n_plus_m_edges() {
    let doc = parse(
        r#"
workflow:
  - step: start
    next:
      arcs:
        - step: warm
          when: "{{ temp > 20 }}"
        - step: cold
        - step: ghost
  - step: warm
    next:
      arcs:
        - step: end
  - step: cold
    next:
      arcs:
        - step: end
  - step: end
"#,
    )
    .unwrap();
    // N = 4 steps, M = 4 valid arcs (the ghost arc does not count)
    let graph = project(&doc, &PositionMap::new(), ViewMode::Petri);
    assert_eq!(graph.nodes.len(), 3 * 4);
    assert_eq!(graph.edges.len(), 2 * 4 + 4);

    let places = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Place { .. }))
        .count();
    let transitions = graph
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Transition)
        .count();
    assert_eq!(places, 8);
    assert_eq!(transitions, 4);
}

#[test]
fn petri_markings_mark_entries_and_exits() {
    let doc = parse(
        r#"
workflow:
  - step: start
    next:
      arcs:
        - step: end
  - step: end
"#,
    )
    .unwrap();
    let graph = project(&doc, &PositionMap::new(), ViewMode::Petri);
    let kind = |id: &str| graph.nodes.iter().find(|n| n.id == id).unwrap().kind;
    assert_eq!(
        kind("start__place_in"),
        NodeKind::Place {
            initial: true,
            terminal: false
        }
    );
    assert_eq!(
        kind("start__place_out"),
        NodeKind::Place {
            initial: false,
            terminal: false
        }
    );
    assert_eq!(
        kind("end__place_in"),
        NodeKind::Place {
            initial: false,
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
}

#[test]
fn all_views_share_the_same_valid_edge_set() {
    let doc = parse(
        r#"
workflow:
  - step: a
    next:
      arcs:
        - step: b
        - step: missing
  - step: b
"#,
    )
    .unwrap();
    let positions = PositionMap::new();
    let steps = project(&doc, &positions, ViewMode::StepGraph);
    let flow = project(&doc, &positions, ViewMode::Flowchart);
    let petri = project(&doc, &positions, ViewMode::Petri);
    assert_eq!(steps.edges.len(), 1);
    assert_eq!(flow.edges.len(), 1);
    // petri adds 2 structural edges per step on top of the 1 arc
    assert_eq!(petri.edges.len(), 2 * 2 + 1);
}
