//! Step drafts with per-group dirty tracking

use serde_yaml::Value;

use crate::ast::{NextBlock, Step, ToolDef};
use crate::draft::arc::ArcDraft;
use crate::draft::task::TaskDraft;
use crate::draft::{mapping_to_yaml, parse_yaml_mapping, DraftGroup};
use crate::error::ValidationError;

/// Step name, description and the freeform object fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasicsDraft {
    pub name: String,
    pub desc: String,
    pub spec_yaml: String,
    pub loop_yaml: String,
    pub extra_yaml: String,
}

/// Editable buffer for one step.
///
/// Groups (basics / tasks / policy / arcs) are compared against a
/// structural baseline captured at creation, so the designer can
/// apply or discard each group on its own.
#[derive(Debug, Clone)]
pub struct StepDraft {
    /// The committed step this draft was opened for; rename detection
    /// and group discards work against it
    original: Step,
    pub basics: BasicsDraft,
    pub tasks: Vec<TaskDraft>,
    pub arcs: Vec<ArcDraft>,
    baseline_basics: Option<Value>,
    baseline_tasks: Option<Value>,
    baseline_policy: Option<Value>,
    baseline_arcs: Option<Value>,
}

impl StepDraft {
    pub fn from_step(step: &Step) -> Self {
        let tasks: Vec<TaskDraft> = step
            .tool
            .as_ref()
            .map(|tool| tool.to_kind_list().iter().map(TaskDraft::from_task).collect())
            .unwrap_or_default();
        let arcs: Vec<ArcDraft> = step.arcs().iter().map(ArcDraft::from_arc).collect();

        let mut draft = StepDraft {
            original: step.clone(),
            basics: BasicsDraft {
                name: step.step.clone(),
                desc: step.desc.clone().unwrap_or_default(),
                spec_yaml: mapping_to_yaml(step.spec.as_ref()),
                loop_yaml: mapping_to_yaml(step.loop_.as_ref()),
                extra_yaml: mapping_to_yaml(Some(&step.extra)),
            },
            tasks,
            arcs,
            baseline_basics: None,
            baseline_tasks: None,
            baseline_policy: None,
            baseline_arcs: None,
        };
        draft.baseline_basics = draft.group_value(DraftGroup::Basics);
        draft.baseline_tasks = draft.group_value(DraftGroup::Tasks);
        draft.baseline_policy = draft.group_value(DraftGroup::Policy);
        draft.baseline_arcs = draft.group_value(DraftGroup::Arcs);
        draft
    }

    /// The step id this draft was opened for
    pub fn original_name(&self) -> &str {
        &self.original.step
    }

    /// Throw away one group's pending edits, leaving the others alone
    pub fn discard(&mut self, group: DraftGroup) {
        let fresh = StepDraft::from_step(&self.original);
        match group {
            DraftGroup::Basics => self.basics = fresh.basics,
            DraftGroup::Arcs => self.arcs = fresh.arcs,
            DraftGroup::Tasks => {
                if self.tasks.len() == fresh.tasks.len() {
                    for (task, reset) in self.tasks.iter_mut().zip(fresh.tasks) {
                        task.name = reset.name;
                        task.kind = reset.kind;
                        task.extra_yaml = reset.extra_yaml;
                        task.spec_rest_yaml = reset.spec_rest_yaml;
                    }
                } else {
                    // pipeline reshaped; rule edits cannot be kept
                    self.tasks = fresh.tasks;
                }
            }
            DraftGroup::Policy => {
                if self.tasks.len() == fresh.tasks.len() {
                    for (task, reset) in self.tasks.iter_mut().zip(fresh.tasks) {
                        task.rules = reset.rules;
                    }
                } else {
                    self.tasks = fresh.tasks;
                }
            }
        }
    }

    /// True when the draft's current content for `group` differs
    /// structurally from the baseline. A group that no longer
    /// converts cleanly is dirty by definition.
    pub fn dirty(&self, group: DraftGroup) -> bool {
        let current = self.group_value(group);
        let baseline = match group {
            DraftGroup::Basics => &self.baseline_basics,
            DraftGroup::Tasks => &self.baseline_tasks,
            DraftGroup::Policy => &self.baseline_policy,
            DraftGroup::Arcs => &self.baseline_arcs,
        };
        match (current, baseline) {
            (Some(now), Some(then)) => now != *then,
            _ => true,
        }
    }

    pub fn dirty_any(&self) -> bool {
        [
            DraftGroup::Basics,
            DraftGroup::Tasks,
            DraftGroup::Policy,
            DraftGroup::Arcs,
        ]
        .into_iter()
        .any(|g| self.dirty(g))
    }

    /// Structural projection of one group, `None` when the group
    /// currently fails validation.
    fn group_value(&self, group: DraftGroup) -> Option<Value> {
        match group {
            DraftGroup::Basics => {
                let spec = parse_yaml_mapping("spec", &self.basics.spec_yaml).ok()?;
                let loop_ = parse_yaml_mapping("loop", &self.basics.loop_yaml).ok()?;
                let extra = parse_yaml_mapping("extra", &self.basics.extra_yaml).ok()?;
                serde_yaml::to_value((
                    self.basics.name.trim(),
                    self.basics.desc.trim(),
                    spec,
                    loop_,
                    extra,
                ))
                .ok()
            }
            DraftGroup::Tasks => {
                let tasks: Vec<_> = self
                    .tasks
                    .iter()
                    .map(|t| {
                        t.to_task().map(|mut task| {
                            // policy dirt belongs to the policy group
                            if let Some(spec) = task.spec.as_mut() {
                                spec.policy = None;
                            }
                            task
                        })
                    })
                    .collect::<Result<_, _>>()
                    .ok()?;
                serde_yaml::to_value(tasks).ok()
            }
            DraftGroup::Policy => {
                let rules: Vec<Vec<_>> = self
                    .tasks
                    .iter()
                    .map(|t| t.rules.iter().map(|r| r.to_rule()).collect::<Result<_, _>>())
                    .collect::<Result<_, _>>()
                    .ok()?;
                serde_yaml::to_value(rules).ok()
            }
            DraftGroup::Arcs => {
                let arcs: Vec<_> = self
                    .arcs
                    .iter()
                    .map(|a| a.to_arc())
                    .collect::<Result<_, _>>()
                    .ok()?;
                serde_yaml::to_value(arcs).ok()
            }
        }
    }

    /// Validate and convert the whole draft back into a step.
    ///
    /// All-or-nothing: the first field-scoped error aborts the
    /// conversion and nothing is committed.
    pub fn to_step(&self) -> Result<Step, ValidationError> {
        let mut step = Step::named(self.basics.name.trim());

        let desc = self.basics.desc.trim();
        if !desc.is_empty() {
            step.desc = Some(desc.to_string());
        }
        step.spec = parse_yaml_mapping("spec", &self.basics.spec_yaml)?;
        step.loop_ = parse_yaml_mapping("loop", &self.basics.loop_yaml)?;
        step.extra = parse_yaml_mapping("extra", &self.basics.extra_yaml)?.unwrap_or_default();

        if !self.tasks.is_empty() {
            let tasks = self
                .tasks
                .iter()
                .map(|t| t.to_task())
                .collect::<Result<Vec<_>, _>>()?;
            step.tool = Some(ToolDef::KindList(tasks));
        }

        // next.spec is not editable in a draft; carried through verbatim
        let next_spec = self.original.next.as_ref().and_then(|n| n.spec.clone());
        let arcs = self
            .arcs
            .iter()
            .map(|a| a.to_arc())
            .collect::<Result<Vec<_>, _>>()?;
        if !arcs.is_empty() || next_spec.is_some() {
            step.next = Some(NextBlock { spec: next_spec, arcs });
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    fn fixture_step() -> Step {
        let doc = parse(
            r#"
workflow:
  - step: fetch
    desc: "Fetch weather"
    tool:
      - name: call
        kind: http
        endpoint: "https://api.example.com"
        spec:
          policy:
            rules:
              - when: "{{ outcome.status == 'error' }}"
                then:
                  do: retry
                  attempts: 3
    next:
      arcs:
        - step: report
          when: "{{ outcome.status == 'ok' }}"
"#,
        )
        .unwrap();
        doc.workflow[0].clone()
    }

    #[test]
    fn fresh_draft_is_clean_everywhere() {
        let draft = StepDraft::from_step(&fixture_step());
        assert!(!draft.dirty(DraftGroup::Basics));
        assert!(!draft.dirty(DraftGroup::Tasks));
        assert!(!draft.dirty(DraftGroup::Policy));
        assert!(!draft.dirty(DraftGroup::Arcs));
        assert!(!draft.dirty_any());
    }

    #[test]
    fn groups_are_dirty_independently() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.basics.desc = "Fetch forecast".into();
        assert!(draft.dirty(DraftGroup::Basics));
        assert!(!draft.dirty(DraftGroup::Tasks));
        assert!(!draft.dirty(DraftGroup::Policy));
        assert!(!draft.dirty(DraftGroup::Arcs));

        draft.basics.desc = "Fetch weather".into();
        draft.arcs[0].when.clear();
        assert!(!draft.dirty(DraftGroup::Basics));
        assert!(draft.dirty(DraftGroup::Arcs));
    }

    #[test]
    fn policy_edits_do_not_dirty_tasks() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.tasks[0].rules[0].then.attempts = "5".into();
        assert!(draft.dirty(DraftGroup::Policy));
        assert!(!draft.dirty(DraftGroup::Tasks));
    }

    #[test]
    fn invalid_group_counts_as_dirty() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.basics.spec_yaml = "not: [valid".into();
        assert!(draft.dirty(DraftGroup::Basics));
    }

    #[test]
    fn unchanged_draft_round_trips_to_the_same_step() {
        let step = fixture_step();
        let draft = StepDraft::from_step(&step);
        assert_eq!(draft.to_step().unwrap(), step);
    }

    #[test]
    fn discard_resets_one_group_only() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.basics.desc = "changed".into();
        draft.arcs[0].when = "{{ rewritten }}".into();
        draft.discard(DraftGroup::Arcs);
        assert!(!draft.dirty(DraftGroup::Arcs));
        assert!(draft.dirty(DraftGroup::Basics));
    }

    #[test]
    fn discard_policy_keeps_task_edits() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.tasks[0].kind = "postgres".into();
        draft.tasks[0].rules[0].then.attempts = "9".into();
        draft.discard(DraftGroup::Policy);
        assert!(!draft.dirty(DraftGroup::Policy));
        assert!(draft.dirty(DraftGroup::Tasks));
    }

    #[test]
    fn validation_is_all_or_nothing() {
        let mut draft = StepDraft::from_step(&fixture_step());
        draft.tasks[0].rules[0].when = " ".into();
        let err = draft.to_step().unwrap_err();
        assert_eq!(err.to_string(), "when is required");
    }
}
