//! Editor Session - explicit state for one open playbook
//!
//! No ambient singletons: every operation goes through a session
//! handle owning the canonical document, the last text the engine
//! emitted, the invalid/stale flags and the layout store.
//!
//! Ordering rule: externally supplied text is authoritative. Loading
//! it rebuilds the document and derived state (callers must drop any
//! drafts they still hold), with one exception - text identical to
//! the engine's own last emitted output is a no-op, which is what
//! breaks edit/re-normalize feedback loops.

use tracing::{debug, info, warn};

use crate::ast::Document;
use crate::commit;
use crate::draft::{MetadataDraft, StepDraft};
use crate::dsl::{normalize, parse, serialize};
use crate::error::EngineError;
use crate::graph::{self, ViewGraph, ViewMode};
use crate::layout::{auto_layout, LayoutStore, Position, PositionMap};

/// What `load_text` did with the incoming text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Text was parsed and the document rebuilt wholesale
    Loaded,
    /// Text matched the engine's own last output; nothing changed
    Unchanged,
}

pub struct EditorSession<S: LayoutStore> {
    store: S,
    document: Document,
    positions: PositionMap,
    last_emitted: Option<String>,
    invalid: bool,
    view: ViewMode,
}

impl<S: LayoutStore> EditorSession<S> {
    pub fn new(store: S) -> Self {
        EditorSession {
            store,
            document: Document::default(),
            positions: PositionMap::new(),
            last_emitted: None,
            invalid: false,
            view: ViewMode::StepGraph,
        }
    }

    /// The canonical document. While the session is invalid this is
    /// the previous (stale) document, kept visible for the designer.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// True after a failed `load_text`: the document is stale and all
    /// mutations are rejected until valid text arrives.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    /// Record a dragged node position. Persisted by the next commit;
    /// the session itself never writes the store here.
    pub fn update_position(&mut self, step: &str, position: Position) {
        self.positions.insert(step.to_string(), position);
    }

    /// Load externally supplied DSL text.
    ///
    /// On parse failure the session flips to read-only invalid mode
    /// and keeps the previous document visible.
    pub fn load_text(&mut self, text: &str) -> Result<LoadOutcome, EngineError> {
        if self.last_emitted.as_deref() == Some(text) {
            debug!("ignoring echo of our own output");
            return Ok(LoadOutcome::Unchanged);
        }
        match parse(text) {
            Ok(mut document) => {
                normalize(&mut document);
                self.positions = self
                    .store
                    .get(document.layout_key())
                    .unwrap_or_default();
                self.document = document;
                self.invalid = false;
                self.last_emitted = None;
                info!(steps = self.document.workflow.len(), "document rebuilt from text");
                Ok(LoadOutcome::Loaded)
            }
            Err(err) => {
                warn!(%err, "invalid DSL text, session is read-only");
                self.invalid = true;
                Err(err.into())
            }
        }
    }

    /// Serialize the canonical document and remember the output so the
    /// next identical `load_text` is recognized as our own echo.
    pub fn emit(&mut self) -> Result<String, EngineError> {
        let text = serialize(&self.document)?;
        self.last_emitted = Some(text.clone());
        Ok(text)
    }

    /// Project the current document (stale or not) into a view
    pub fn project(&self, view: ViewMode) -> ViewGraph {
        graph::project(&self.document, &self.positions, view)
    }

    pub fn current_view(&self) -> ViewMode {
        self.view
    }

    /// Switch the active view and project it. Works on a stale
    /// document too; switching views never mutates anything.
    pub fn switch_view(&mut self, view: ViewMode) -> ViewGraph {
        self.view = view;
        self.project(view)
    }

    /// Open a draft for one step
    pub fn draft_step(&self, name: &str) -> Result<StepDraft, EngineError> {
        self.document
            .step(name)
            .map(StepDraft::from_step)
            .ok_or_else(|| EngineError::UnknownStep(name.to_string()))
    }

    /// Open a draft for the root metadata
    pub fn draft_metadata(&self) -> MetadataDraft {
        MetadataDraft::from_metadata(&self.document.metadata)
    }

    /// Validate a step draft and merge it. Atomic: any validation
    /// error leaves the document and emitted text untouched.
    /// Returns the final step id (renames may be re-suffixed) and the
    /// re-serialized text.
    pub fn apply_step_draft(
        &mut self,
        draft: &StepDraft,
    ) -> Result<(String, String), EngineError> {
        self.ensure_editable()?;
        let edited = draft.to_step()?;
        let mut steps = self.document.workflow.clone();
        let final_name = commit::replace_step(&mut steps, draft.original_name(), edited)?;
        if final_name != draft.original_name() {
            if let Some(position) = self.positions.remove(draft.original_name()) {
                self.positions.insert(final_name.clone(), position);
            }
        }
        let text = self.commit_steps(steps)?;
        Ok((final_name, text))
    }

    /// Validate and merge the root metadata draft
    pub fn apply_metadata_draft(&mut self, draft: &MetadataDraft) -> Result<String, EngineError> {
        self.ensure_editable()?;
        let metadata = draft.to_metadata()?;
        let mut document = self.document.clone();
        document.metadata = metadata;
        let steps = document.workflow.clone();
        let (document, text) =
            commit::commit(&document, steps, &self.positions, &mut self.store)?;
        self.document = document;
        self.last_emitted = Some(text.clone());
        Ok(text)
    }

    /// Add a fresh step; colliding names are re-suffixed
    pub fn add_step(&mut self, name: &str) -> Result<(String, String), EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        let final_name = commit::add_step(&mut steps, name);
        let text = self.commit_steps(steps)?;
        Ok((final_name, text))
    }

    /// Rename a step, cascading through every referencing arc
    pub fn rename_step(&mut self, old: &str, new: &str) -> Result<(String, String), EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        let final_name = commit::rename_step(&mut steps, old, new)?;
        if let Some(position) = self.positions.remove(old) {
            self.positions.insert(final_name.clone(), position);
        }
        let text = self.commit_steps(steps)?;
        Ok((final_name, text))
    }

    /// Delete a step, stripping referencing arcs and its layout entry
    pub fn delete_step(&mut self, name: &str) -> Result<String, EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        let mut positions = self.positions.clone();
        commit::delete_step(&mut steps, &mut positions, name)?;
        self.positions = positions;
        self.commit_steps(steps)
    }

    /// Draw an arc between two existing steps
    pub fn connect_arc(&mut self, source: &str, target: &str) -> Result<String, EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        commit::connect_arc(&mut steps, source, target)?;
        self.commit_steps(steps)
    }

    /// Remove every arc `source -> target`
    pub fn remove_arc(&mut self, source: &str, target: &str) -> Result<String, EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        commit::remove_arc(&mut steps, source, target)?;
        self.commit_steps(steps)
    }

    /// Explicit integrity pass over dangling arcs (never implicit)
    pub fn prune_dangling_arcs(&mut self) -> Result<(usize, String), EngineError> {
        self.ensure_editable()?;
        let mut steps = self.document.workflow.clone();
        let pruned = commit::prune_dangling_arcs(&mut steps);
        let text = self.commit_steps(steps)?;
        Ok((pruned, text))
    }

    /// Recompute positions with the layered auto-layout and persist
    /// them - the one store write outside the committer.
    pub fn auto_layout(&mut self) -> Result<&PositionMap, EngineError> {
        self.ensure_editable()?;
        self.positions = auto_layout(&self.document);
        self.store
            .set(self.document.layout_key(), &self.positions);
        info!(steps = self.positions.len(), "auto layout persisted");
        Ok(&self.positions)
    }

    fn ensure_editable(&self) -> Result<(), EngineError> {
        if self.invalid {
            Err(EngineError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn commit_steps(&mut self, steps: Vec<crate::ast::Step>) -> Result<String, EngineError> {
        let (document, text) =
            commit::commit(&self.document, steps, &self.positions, &mut self.store)?;
        self.document = document;
        self.last_emitted = Some(text.clone());
        Ok(text)
    }
}
