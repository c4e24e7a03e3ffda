//! Graph Module - visual projections of a document
//!
//! One document, three derived views:
//! - `step-graph`: one node per step, one edge per valid arc
//! - `flowchart`: same edges, nodes classified into flowchart shapes
//! - `petri`: each step expands to place_in / transition / place_out
//!
//! Degree computation only counts arcs whose target step currently
//! exists; dangling arcs never reach a projection (and are never
//! deleted from the document by projecting).

mod degree;
mod flowchart;
mod petri;
mod view;

pub use degree::Degrees;
pub use view::{Edge, Node, NodeKind, ViewGraph, ViewMode};

use crate::ast::Document;
use crate::layout::PositionMap;

/// Project a document plus stored positions into one view
pub fn project(document: &Document, positions: &PositionMap, view: ViewMode) -> ViewGraph {
    let degrees = Degrees::compute(document);
    match view {
        ViewMode::StepGraph => step_graph(document, positions, &degrees),
        ViewMode::Flowchart => flowchart::project(document, positions, &degrees),
        ViewMode::Petri => petri::project(document, positions, &degrees),
    }
}

fn step_graph(document: &Document, positions: &PositionMap, degrees: &Degrees) -> ViewGraph {
    let mut graph = ViewGraph::default();
    for step in &document.workflow {
        graph.nodes.push(Node {
            id: step.step.clone(),
            label: step.step.clone(),
            desc: step.desc.clone(),
            kind: NodeKind::Step,
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
