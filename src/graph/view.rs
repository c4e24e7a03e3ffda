//! View-graph types shared by the three projections

use serde::Serialize;
use std::str::FromStr;

use crate::layout::Position;

/// Which projection to derive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    StepGraph,
    Flowchart,
    Petri,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step-graph" | "steps" => Ok(ViewMode::StepGraph),
            "flowchart" => Ok(ViewMode::Flowchart),
            "petri" | "petri-net" => Ok(ViewMode::Petri),
            other => Err(format!(
                "unknown view '{other}' (expected step-graph, flowchart or petri)"
            )),
        }
    }
}

/// Nodes and edges of one projection, serializable for the designer
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Node classification, per view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum NodeKind {
    /// Step-graph: plain step node
    Step,
    /// Flowchart: entry or exit step (in-degree or out-degree 0)
    Terminator,
    /// Flowchart: branching step
    Decision,
    /// Flowchart: step delegating to another playbook
    Subprocess,
    /// Flowchart: everything else
    Process,
    /// Petri: place, with structural markings
    Place { initial: bool, terminal: bool },
    /// Petri: transition
    Transition,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Guard label for conditional arcs; structural edges carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}
