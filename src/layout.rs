//! Layout Store - persisted step positions
//!
//! Positions live outside the document, keyed by playbook path with
//! schema `{step_name: {x, y}}`. The store is the only shared mutable
//! resource of the engine; it is read through one accessor and written
//! only by the committer and by an explicit auto-layout request.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::ast::Document;

/// 2D canvas position of a step
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Step name to position. BTreeMap keeps serialization deterministic.
pub type PositionMap = BTreeMap<String, Position>;

/// Persistence collaborator for step positions
pub trait LayoutStore {
    fn get(&self, key: &str) -> Option<PositionMap>;
    fn set(&mut self, key: &str, positions: &PositionMap);
}

/// In-memory store, the default for embedded use and tests
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    entries: FxHashMap<String, PositionMap>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn get(&self, key: &str) -> Option<PositionMap> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, positions: &PositionMap) {
        self.entries.insert(key.to_string(), positions.clone());
    }
}

/// JSON-file-backed store used by the CLI.
///
/// The whole file is one JSON object `{playbook_path: {step: {x, y}}}`;
/// it is re-read on every get so external edits are picked up.
#[derive(Debug)]
pub struct JsonFileLayoutStore {
    path: PathBuf,
}

impl JsonFileLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileLayoutStore { path: path.into() }
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, PositionMap>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read layout file {:?}", self.path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse layout file {:?}", self.path))
    }

    fn write_all(&self, all: &BTreeMap<String, PositionMap>) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(all).context("Failed to encode layout file")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write layout file {:?}", self.path))
    }
}

impl LayoutStore for JsonFileLayoutStore {
    fn get(&self, key: &str) -> Option<PositionMap> {
        match self.read_all() {
            Ok(all) => all.get(key).cloned(),
            Err(err) => {
                tracing::warn!(%err, "layout file unreadable, treating as empty");
                None
            }
        }
    }

    fn set(&mut self, key: &str, positions: &PositionMap) {
        let result = self.read_all().and_then(|mut all| {
            all.insert(key.to_string(), positions.clone());
            self.write_all(&all)
        });
        if let Err(err) = result {
            tracing::warn!(%err, "failed to persist layout");
        }
    }
}

const COLUMN_GAP: f64 = 260.0;
const ROW_GAP: f64 = 140.0;

/// Deterministic layered placement: columns by BFS depth over valid
/// arcs, rows by encounter order within a column. Steps unreachable
/// from any entry step fall back to their workflow index as depth.
pub fn auto_layout(document: &Document) -> PositionMap {
    let ids: FxHashSet<&str> = document.workflow.iter().map(|s| s.step.as_str()).collect();

    let mut in_degree: FxHashMap<&str, usize> =
        document.workflow.iter().map(|s| (s.step.as_str(), 0)).collect();
    for step in &document.workflow {
        for arc in step.arcs() {
            if ids.contains(arc.step.as_str()) {
                *in_degree.entry(arc.step.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut depth: FxHashMap<&str, usize> = FxHashMap::default();
    let mut queue: std::collections::VecDeque<&str> = document
        .workflow
        .iter()
        .map(|s| s.step.as_str())
        .filter(|id| in_degree[id] == 0)
        .collect();
    for &id in &queue {
        depth.insert(id, 0);
    }
    // Longest-path layering, capped at the step count so cycles
    // cannot relax forever.
    while let Some(current) = queue.pop_front() {
        let next_depth = depth[current] + 1;
        if next_depth >= ids.len() {
            continue;
        }
        if let Some(step) = document.step(current) {
            for arc in step.arcs() {
                if let Some(&target) = ids.get(arc.step.as_str()) {
                    if depth.get(target).is_none_or(|d| *d < next_depth) {
                        depth.insert(target, next_depth);
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    let mut rows_used: FxHashMap<usize, usize> = FxHashMap::default();
    let mut positions = PositionMap::new();
    for (index, step) in document.workflow.iter().enumerate() {
        let column = depth.get(step.step.as_str()).copied().unwrap_or(index);
        let row = rows_used.entry(column).or_insert(0);
        positions.insert(
            step.step.clone(),
            Position::new(column as f64 * COLUMN_GAP, *row as f64 * ROW_GAP),
        );
        *row += 1;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryLayoutStore::new();
        let mut positions = PositionMap::new();
        positions.insert("start".into(), Position::new(10.0, 20.0));
        store.set("examples/weather", &positions);
        assert_eq!(store.get("examples/weather"), Some(positions));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn auto_layout_orders_by_depth() {
        let doc = parse(
            r#"
workflow:
  - step: start
    next: middle
  - step: middle
    next: end
  - step: end
"#,
        )
        .unwrap();
        let positions = auto_layout(&doc);
        assert!(positions["start"].x < positions["middle"].x);
        assert!(positions["middle"].x < positions["end"].x);
    }

    #[test]
    fn siblings_share_a_column() {
        let doc = parse(
            r#"
workflow:
  - step: start
    next:
      arcs:
        - step: warm
        - step: cold
  - step: warm
  - step: cold
"#,
        )
        .unwrap();
        let positions = auto_layout(&doc);
        assert_eq!(positions["warm"].x, positions["cold"].x);
        assert_ne!(positions["warm"].y, positions["cold"].y);
    }
}
