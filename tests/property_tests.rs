//! Property-based tests over generated workflows
//!
//! Uses proptest to check the engine's core guarantees on arbitrary
//! step/arc combinations, including duplicate and empty ids and
//! dangling arc targets.

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use skein::ast::{Arc, Document, Step};
use skein::dsl::{normalize, parse, serialize};
use skein::graph::{project, ViewMode};
use skein::layout::PositionMap;

prop_compose! {
    /// A step name: often valid, sometimes empty, sometimes colliding
    fn arb_name()(name in prop_oneof![
        4 => "[a-z][a-z0-9_]{0,6}".prop_map(String::from),
        1 => Just(String::new()),
        1 => Just("fetch".to_string()),
    ]) -> String {
        name
    }
}

prop_compose! {
    fn arb_workflow()(
        names in prop::collection::vec(arb_name(), 0..8),
        arc_targets in prop::collection::vec(prop::collection::vec(0usize..10, 0..3), 0..8),
        guards in prop::collection::vec(proptest::bool::ANY, 0..24),
    ) -> Document {
        let mut document = Document::default();
        document.metadata.name = "generated".to_string();
        let mut guard_iter = guards.into_iter();
        for (i, name) in names.iter().enumerate() {
            let mut step = Step::named(name.clone());
            if let Some(targets) = arc_targets.get(i) {
                for &t in targets {
                    // target may or may not exist; dangling arcs are legal
                    let mut arc = Arc::to_step(names.get(t).cloned().unwrap_or_else(|| format!("ghost_{t}")));
                    if guard_iter.next().unwrap_or(false) {
                        arc.when = Some("{{ outcome.status == 'ok' }}".to_string());
                    }
                    step.arcs_mut().push(arc);
                }
            }
            document.workflow.push(step);
        }
        document
    }
}

proptest! {
    /// Normalization yields pairwise-distinct ids and is idempotent
    #[test]
    fn normalize_makes_ids_unique_and_is_idempotent(mut document in arb_workflow()) {
        normalize(&mut document);
        let ids: Vec<&str> = document.workflow.iter().map(|s| s.step.as_str()).collect();
        let unique: FxHashSet<&&str> = ids.iter().collect();
        prop_assert_eq!(ids.len(), unique.len(), "duplicate ids: {:?}", ids);

        let mut again = document.clone();
        normalize(&mut again);
        prop_assert_eq!(document, again);
    }

    /// serialize(parse(serialize(parse(t)))) == serialize(parse(t))
    #[test]
    fn serialization_reaches_a_fixed_point(mut document in arb_workflow()) {
        normalize(&mut document);
        let text = serialize(&document).unwrap();
        let first = serialize(&parse(&text).unwrap()).unwrap();
        let second = serialize(&parse(&first).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Petri projection always yields 3N nodes and 2N+M edges
    #[test]
    fn petri_counts_hold_for_any_workflow(mut document in arb_workflow()) {
        normalize(&mut document);
        let ids: FxHashSet<&str> = document.workflow.iter().map(|s| s.step.as_str()).collect();
        let n = document.workflow.len();
        let m: usize = document
            .workflow
            .iter()
            .map(|s| s.arcs().iter().filter(|a| ids.contains(a.step.as_str())).count())
            .sum();
        let graph = project(&document, &PositionMap::new(), ViewMode::Petri);
        prop_assert_eq!(graph.nodes.len(), 3 * n);
        prop_assert_eq!(graph.edges.len(), 2 * n + m);
    }

    /// Projections never mutate the document they project
    #[test]
    fn projection_is_read_only(mut document in arb_workflow()) {
        normalize(&mut document);
        let before = document.clone();
        for view in [ViewMode::StepGraph, ViewMode::Flowchart, ViewMode::Petri] {
            let _ = project(&document, &PositionMap::new(), view);
        }
        prop_assert_eq!(before, document);
    }
}
