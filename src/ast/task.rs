//! Task pipeline and the three legacy tool encodings

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::ast::Policy;

/// Tool kinds that call out to another playbook
pub const SUBPLAYBOOK_KINDS: &[&str] = &["playbook", "playbooks"];

/// One unit of work in a step's pipeline
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Task {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool type (http, python, postgres, playbooks, ...)
    #[serde(default)]
    pub kind: String,

    /// Tool-specific configuration the core passes through untouched
    #[serde(flatten)]
    pub extra: Mapping,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<TaskSpec>,
}

impl Task {
    /// True when this task hands control to another playbook
    pub fn references_playbook(&self) -> bool {
        SUBPLAYBOOK_KINDS.contains(&self.kind.as_str())
    }

    /// Rules of this task's retry/branch policy, empty when none
    pub fn policy_rules(&self) -> &[crate::ast::PolicyRule] {
        self.spec
            .as_ref()
            .and_then(|s| s.policy.as_ref())
            .map(|p| p.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Build a task out of a loose legacy mapping. `label` is the
    /// wrapping key of the one-key-wrapped encoding; it becomes the
    /// name unless the body carries its own.
    fn from_fields(label: Option<&str>, fields: &Mapping) -> Task {
        let mut task = Task::default();
        for (key, value) in fields {
            match key.as_str() {
                Some("name") => {
                    if let Some(name) = value.as_str() {
                        task.name = Some(name.to_string());
                        continue;
                    }
                }
                Some("kind") => {
                    if let Some(kind) = value.as_str() {
                        task.kind = kind.to_string();
                        continue;
                    }
                }
                Some("spec") => {
                    if let Ok(spec) = serde_yaml::from_value::<TaskSpec>(value.clone()) {
                        task.spec = Some(spec);
                        continue;
                    }
                }
                _ => {}
            }
            task.extra.insert(key.clone(), value.clone());
        }
        if task.name.is_none() {
            task.name = label.map(str::to_string);
        }
        task
    }

    fn from_legacy_mapping(fields: &Mapping) -> Task {
        if fields.contains_key(Value::from("kind")) {
            return Task::from_fields(None, fields);
        }
        if fields.len() == 1 {
            if let Some((Value::String(label), Value::Mapping(body))) = fields.iter().next() {
                return Task::from_fields(Some(label.as_str()), body);
            }
        }
        // Unrecognized shape: keep every key so nothing is lost
        Task {
            extra: fields.clone(),
            ..Task::default()
        }
    }
}

/// Task `spec` block carrying the optional policy
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TaskSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,

    #[serde(flatten)]
    pub rest: Mapping,
}

/// A step's `tool` entry.
///
/// Three encodings occur in the wild: a single task object, a list of
/// one-key-wrapped objects (`{label: {...task}}`) and a list of
/// kind-tagged objects (`{kind, ...}`). All three normalize to the
/// kind-tagged list, which is also the only form ever serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolDef {
    Single(Task),
    KindList(Vec<Task>),
    WrappedList(Vec<Mapping>),
}

impl ToolDef {
    /// Normalize any encoding into the uniform kind-tagged list
    pub fn to_kind_list(&self) -> Vec<Task> {
        match self {
            ToolDef::Single(task) => vec![task.clone()],
            ToolDef::KindList(tasks) => tasks.clone(),
            ToolDef::WrappedList(items) => {
                items.iter().map(Task::from_legacy_mapping).collect()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ToolDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            mapping @ Value::Mapping(_) => {
                let task = serde_yaml::from_value(mapping).map_err(DeError::custom)?;
                Ok(ToolDef::Single(task))
            }
            Value::Sequence(items) => {
                let mut mappings = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Mapping(m) => mappings.push(m),
                        other => {
                            return Err(DeError::custom(format!(
                                "tool entries must be mappings, got {other:?}"
                            )))
                        }
                    }
                }
                let kind_key = Value::from("kind");
                if mappings.iter().all(|m| m.contains_key(&kind_key)) {
                    let tasks = mappings
                        .into_iter()
                        .map(|m| serde_yaml::from_value(Value::Mapping(m)))
                        .collect::<Result<Vec<Task>, _>>()
                        .map_err(DeError::custom)?;
                    Ok(ToolDef::KindList(tasks))
                } else {
                    Ok(ToolDef::WrappedList(mappings))
                }
            }
            other => Err(DeError::custom(format!(
                "tool must be a task or list of tasks, got {other:?}"
            ))),
        }
    }
}

impl Serialize for ToolDef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_kind_list().serialize(serializer)
    }
}
