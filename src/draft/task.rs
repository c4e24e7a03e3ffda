//! Task pipeline drafts
//!
//! Whatever legacy encoding the document carries, the pipeline editor
//! works on the uniform `{name, kind, extra, spec}` shape and the
//! committed document always gets the kind-tagged list back.

use crate::ast::{Policy, Task, TaskSpec};
use crate::draft::policy::RuleDraft;
use crate::draft::{mapping_to_yaml, parse_yaml_mapping};
use crate::error::ValidationError;

/// One editable task in the pipeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub name: String,
    pub kind: String,
    /// Tool-specific configuration as a YAML snippet
    pub extra_yaml: String,
    /// `spec` minus the policy block, edited separately from rules
    pub spec_rest_yaml: String,
    pub rules: Vec<RuleDraft>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        let (rules, spec_rest) = match &task.spec {
            Some(spec) => (
                spec.policy
                    .as_ref()
                    .map(|p| p.rules.iter().map(RuleDraft::from_rule).collect())
                    .unwrap_or_default(),
                mapping_to_yaml(Some(&spec.rest)),
            ),
            None => (Vec::new(), String::new()),
        };
        TaskDraft {
            name: task.name.clone().unwrap_or_default(),
            kind: task.kind.clone(),
            extra_yaml: mapping_to_yaml(Some(&task.extra)),
            spec_rest_yaml: spec_rest,
            rules,
        }
    }

    pub fn to_task(&self) -> Result<Task, ValidationError> {
        let mut task = Task::default();
        let name = self.name.trim();
        if !name.is_empty() {
            task.name = Some(name.to_string());
        }
        task.kind = self.kind.trim().to_string();
        if task.kind.is_empty() {
            return Err(ValidationError::required("kind"));
        }
        task.extra = parse_yaml_mapping("tool", &self.extra_yaml)?.unwrap_or_default();

        let rest = parse_yaml_mapping("spec", &self.spec_rest_yaml)?;
        let policy = if self.rules.is_empty() {
            None
        } else {
            let rules = self
                .rules
                .iter()
                .map(RuleDraft::to_rule)
                .collect::<Result<Vec<_>, _>>()?;
            Some(Policy { rules })
        };
        if rest.is_some() || policy.is_some() {
            task.spec = Some(TaskSpec {
                policy,
                rest: rest.unwrap_or_default(),
            });
        }
        Ok(task)
    }
}
