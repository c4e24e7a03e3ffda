//! Valid-arc degree bookkeeping
//!
//! An arc only counts when its target step exists in the workflow.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{Arc, Document, Step};

/// In/out degrees over valid arcs, plus the live id set
pub struct Degrees {
    ids: FxHashSet<String>,
    in_degree: FxHashMap<String, usize>,
    out_degree: FxHashMap<String, usize>,
}

impl Degrees {
    pub fn compute(document: &Document) -> Self {
        let ids: FxHashSet<String> =
            document.workflow.iter().map(|s| s.step.clone()).collect();
        let mut in_degree: FxHashMap<String, usize> = FxHashMap::default();
        let mut out_degree: FxHashMap<String, usize> = FxHashMap::default();
        for step in &document.workflow {
            for arc in step.arcs() {
                if ids.contains(&arc.step) {
                    *out_degree.entry(step.step.clone()).or_insert(0) += 1;
                    *in_degree.entry(arc.step.clone()).or_insert(0) += 1;
                }
            }
        }
        Degrees {
            ids,
            in_degree,
            out_degree,
        }
    }

    pub fn exists(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.in_degree.get(id).copied().unwrap_or(0)
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.out_degree.get(id).copied().unwrap_or(0)
    }

    /// The step's arcs whose target exists
    pub fn valid_arcs<'a>(&'a self, step: &'a Step) -> impl Iterator<Item = &'a Arc> {
        step.arcs().iter().filter(|arc| self.exists(&arc.step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    #[test]
    fn dangling_targets_do_not_count() {
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
        let degrees = Degrees::compute(&doc);
        assert_eq!(degrees.out_degree("a"), 1);
        assert_eq!(degrees.in_degree("b"), 1);
        assert_eq!(degrees.in_degree("missing"), 0);
        assert!(!degrees.exists("missing"));
    }
}
