//! Step id repair
//!
//! Two repairs keep the workflow editable as a graph: steps without a
//! name get `step_{i+1}`, and duplicates get a numeric suffix scanned
//! against already-seen ids. Both are idempotent.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::ast::{Document, Step};

/// Normalize a whole document in place
pub fn normalize(document: &mut Document) {
    normalize_workflow(&mut document.workflow);
}

/// Assign missing step names and de-duplicate colliding ones.
///
/// `normalize_workflow` is idempotent: a second pass over its own
/// output changes nothing.
pub fn normalize_workflow(steps: &mut [Step]) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for (index, step) in steps.iter_mut().enumerate() {
        let mut name = step.step.trim().to_string();
        if name.is_empty() {
            name = format!("step_{}", index + 1);
            debug!(step = %name, "assigned missing step name");
        }
        if seen.contains(&name) {
            let renamed = unique_name(&name, &seen);
            debug!(from = %name, to = %renamed, "de-duplicated step name");
            name = renamed;
        }
        seen.insert(name.clone());
        step.step = name;
    }
}

/// First `base_{n}` (n = 2, 3, ...) not present in `seen`.
///
/// Best-effort, not guaranteed minimal: the counter simply keeps
/// advancing past pre-existing literal `base_2`-style ids.
pub fn unique_name(base: &str, seen: &FxHashSet<String>) -> String {
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
