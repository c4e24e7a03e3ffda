//! Flowchart projection
//!
//! Shape rule, first match wins:
//! 1. terminator - in-degree 0 or out-degree 0
//! 2. decision   - out-degree > 1, or any outgoing arc with a
//!    non-trivial guard
//! 3. subprocess - the step's single task calls another playbook
//! 4. process    - everything else

use crate::ast::{Document, Step};
use crate::condition::is_trivial_when;
use crate::graph::degree::Degrees;
use crate::graph::view::{Edge, Node, NodeKind, ViewGraph};
use crate::layout::PositionMap;

pub fn project(document: &Document, positions: &PositionMap, degrees: &Degrees) -> ViewGraph {
    let mut graph = ViewGraph::default();
    for step in &document.workflow {
        graph.nodes.push(Node {
            id: step.step.clone(),
            label: step.step.clone(),
            desc: step.desc.clone(),
            kind: classify(step, degrees),
            position: positions.get(&step.step).copied(),
        });
        for (index, arc) in degrees.valid_arcs(step).enumerate() {
            graph.edges.push(Edge {
                id: format!("{}->{}:{}", step.step, arc.step, index),
                source: step.step.clone(),
                target: arc.step.clone(),
                when: arc.when.clone(),
            });
        }
    }
    graph
}

fn classify(step: &Step, degrees: &Degrees) -> NodeKind {
    let id = step.step.as_str();
    if degrees.in_degree(id) == 0 || degrees.out_degree(id) == 0 {
        return NodeKind::Terminator;
    }
    let branching = degrees.out_degree(id) > 1
        || degrees
            .valid_arcs(step)
            .any(|arc| !is_trivial_when(arc.when.as_deref()));
    if branching {
        return NodeKind::Decision;
    }
    let tasks = step
        .tool
        .as_ref()
        .map(|tool| tool.to_kind_list())
        .unwrap_or_default();
    if let [only] = tasks.as_slice() {
        if only.references_playbook() {
            return NodeKind::Subprocess;
        }
    }
    NodeKind::Process
}
