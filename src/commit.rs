//! Mutation Committer - validated merges into the canonical document
//!
//! The workflow list is always replaced wholesale (never patched
//! field-by-field) before serialization, which guarantees canonical
//! key order and drops stale fields. Cascades keep the invariants:
//! renames rewrite arcs everywhere, deletes strip referencing arcs
//! and the layout entry.

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::ast::{Document, Step};
use crate::dsl::{normalize, serialize, unique_name};
use crate::error::{EngineError, ValidationError};
use crate::layout::{LayoutStore, PositionMap};

/// Replace the workflow wholesale, normalize, serialize and persist
/// the layout. Returns the final document and its canonical text.
pub fn commit<S: LayoutStore + ?Sized>(
    document: &Document,
    steps: Vec<Step>,
    positions: &PositionMap,
    store: &mut S,
) -> Result<(Document, String), EngineError> {
    let mut doc = document.clone();
    doc.workflow = steps;
    normalize(&mut doc);
    let text = serialize(&doc)?;
    store.set(doc.layout_key(), positions);
    info!(steps = doc.workflow.len(), "committed workflow");
    Ok((doc, text))
}

/// Swap the step that was drafted under `original_name` for its edited
/// replacement, cascading a rename through every arc. A colliding new
/// name is re-suffixed; an empty new name keeps the original. Returns
/// the final step id.
pub fn replace_step(
    steps: &mut [Step],
    original_name: &str,
    mut edited: Step,
) -> Result<String, EngineError> {
    let index = steps
        .iter()
        .position(|s| s.step == original_name)
        .ok_or_else(|| EngineError::UnknownStep(original_name.to_string()))?;

    if edited.step.trim().is_empty() {
        edited.step = original_name.to_string();
    }

    let mut final_name = edited.step.clone();
    if final_name != original_name {
        let others: FxHashSet<String> = steps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.step.clone())
            .collect();
        if others.contains(&final_name) {
            final_name = unique_name(&final_name, &others);
            debug!(requested = %edited.step, got = %final_name, "rename collided, re-suffixed");
        }
        edited.step = final_name.clone();
        rewrite_arcs(steps, original_name, &final_name);
        // self-loops on the edited copy rename too
        rewrite_arcs(std::slice::from_mut(&mut edited), original_name, &final_name);
    }

    steps[index] = edited;
    Ok(final_name)
}

/// Append a fresh step, de-duplicating its name against the existing
/// ids. An empty name gets the positional `step_{n}` id first.
pub fn add_step(steps: &mut Vec<Step>, name: &str) -> String {
    let ids: FxHashSet<String> = steps.iter().map(|s| s.step.clone()).collect();
    let mut name = name.trim().to_string();
    if name.is_empty() {
        name = format!("step_{}", steps.len() + 1);
    }
    if ids.contains(&name) {
        name = unique_name(&name, &ids);
    }
    steps.push(Step::named(name.clone()));
    info!(step = %name, "added step");
    name
}

/// Rename a step in place (no other edits), cascading through arcs
pub fn rename_step(
    steps: &mut [Step],
    old_name: &str,
    new_name: &str,
) -> Result<String, EngineError> {
    if new_name.trim().is_empty() {
        return Err(ValidationError::required("step").into());
    }
    let mut edited = steps
        .iter()
        .find(|s| s.step == old_name)
        .cloned()
        .ok_or_else(|| EngineError::UnknownStep(old_name.to_string()))?;
    edited.step = new_name.trim().to_string();
    replace_step(steps, old_name, edited)
}

/// Delete a step: remove it from the workflow, strip every arc that
/// referenced it and drop its layout entry.
pub fn delete_step(
    steps: &mut Vec<Step>,
    positions: &mut PositionMap,
    name: &str,
) -> Result<(), EngineError> {
    let index = steps
        .iter()
        .position(|s| s.step == name)
        .ok_or_else(|| EngineError::UnknownStep(name.to_string()))?;
    steps.remove(index);
    for step in steps.iter_mut() {
        strip_arcs_to(step, name);
    }
    positions.remove(name);
    info!(step = name, "deleted step");
    Ok(())
}

/// Add an unconditional arc `source -> target` unless one already
/// exists. Only the owning step's arc list is touched.
pub fn connect_arc(steps: &mut [Step], source: &str, target: &str) -> Result<bool, EngineError> {
    if !steps.iter().any(|s| s.step == target) {
        return Err(EngineError::UnknownStep(target.to_string()));
    }
    let step = steps
        .iter_mut()
        .find(|s| s.step == source)
        .ok_or_else(|| EngineError::UnknownStep(source.to_string()))?;
    if step.arcs().iter().any(|a| a.step == target) {
        return Ok(false);
    }
    step.arcs_mut().push(crate::ast::Arc::to_step(target));
    Ok(true)
}

/// Remove every arc `source -> target`. Returns how many were removed.
pub fn remove_arc(steps: &mut [Step], source: &str, target: &str) -> Result<usize, EngineError> {
    let step = steps
        .iter_mut()
        .find(|s| s.step == source)
        .ok_or_else(|| EngineError::UnknownStep(source.to_string()))?;
    let before = step.arcs().len();
    if let Some(next) = step.next.as_mut() {
        next.arcs.retain(|a| a.step != target);
        let after = next.arcs.len();
        if next.arcs.is_empty() && next.spec.is_none() {
            step.next = None;
        }
        return Ok(before - after);
    }
    Ok(0)
}

/// Explicit integrity pass: strip arcs whose target no longer exists.
/// Never run implicitly - reads and ordinary saves keep dangling arcs.
pub fn prune_dangling_arcs(steps: &mut [Step]) -> usize {
    let ids: FxHashSet<String> = steps.iter().map(|s| s.step.clone()).collect();
    let mut pruned = 0;
    for step in steps.iter_mut() {
        if let Some(next) = step.next.as_mut() {
            let before = next.arcs.len();
            next.arcs.retain(|a| ids.contains(&a.step));
            pruned += before - next.arcs.len();
            if next.arcs.is_empty() && next.spec.is_none() {
                step.next = None;
            }
        }
    }
    if pruned > 0 {
        info!(pruned, "pruned dangling arcs");
    }
    pruned
}

fn rewrite_arcs(steps: &mut [Step], old_name: &str, new_name: &str) {
    for step in steps.iter_mut() {
        if let Some(next) = step.next.as_mut() {
            for arc in next.arcs.iter_mut() {
                if arc.step == old_name {
                    arc.step = new_name.to_string();
                }
            }
        }
    }
}

fn strip_arcs_to(step: &mut Step, target: &str) {
    if let Some(next) = step.next.as_mut() {
        next.arcs.retain(|a| a.step != target);
        if next.arcs.is_empty() && next.spec.is_none() {
            step.next = None;
        }
    }
}
