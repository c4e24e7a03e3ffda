//! Workflow steps and their outgoing arcs

use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::ast::ToolDef;

/// A named workflow-graph node bundling a task pipeline and an
/// outgoing `next` clause.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Step {
    /// Unique id within `workflow`. Empty ids are repaired by the
    /// normalizer before the document is considered canonical.
    #[serde(default)]
    pub step: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Mapping>,

    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_: Option<Mapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolDef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextBlock>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Step {
    pub fn named(name: impl Into<String>) -> Self {
        Step {
            step: name.into(),
            desc: None,
            spec: None,
            loop_: None,
            tool: None,
            next: None,
            extra: Mapping::new(),
        }
    }

    /// Outgoing arcs, empty slice when the step has no `next` clause
    pub fn arcs(&self) -> &[Arc] {
        self.next.as_ref().map(|n| n.arcs.as_slice()).unwrap_or(&[])
    }

    pub fn arcs_mut(&mut self) -> &mut Vec<Arc> {
        &mut self.next.get_or_insert_with(NextBlock::default).arcs
    }
}

/// The `next` clause of a step.
///
/// Canonical form is a mapping `{spec?, arcs}`. Two legacy encodings are
/// accepted on input and rewritten on the next serialization: a bare
/// target string and a bare list of arcs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NextBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Mapping>,

    pub arcs: Vec<Arc>,
}

impl<'de> Deserialize<'de> for NextBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // unknown keys here would be dropped on re-serialization, so
        // they fail the parse instead
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct NextRaw {
            #[serde(default)]
            spec: Option<Mapping>,
            #[serde(default)]
            arcs: Vec<Arc>,
        }

        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(target) => Ok(NextBlock {
                spec: None,
                arcs: vec![Arc::to_step(target)],
            }),
            Value::Sequence(items) => {
                let arcs = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(target) => Ok(Arc::to_step(target)),
                        other => serde_yaml::from_value::<Arc>(other).map_err(DeError::custom),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NextBlock { spec: None, arcs })
            }
            other @ Value::Mapping(_) => {
                let raw: NextRaw = serde_yaml::from_value(other).map_err(DeError::custom)?;
                Ok(NextBlock {
                    spec: raw.spec,
                    arcs: raw.arcs,
                })
            }
            other => Err(DeError::custom(format!(
                "next must be a mapping, list or step name, got {}",
                type_name(&other)
            ))),
        }
    }
}

/// A directed, optionally conditional transition to another step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Arc {
    /// Target step id
    pub step: String,

    /// Templated boolean guard; absent means unconditional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Mapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Mapping>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Arc {
    pub fn to_step(target: impl Into<String>) -> Self {
        Arc {
            step: target.into(),
            when: None,
            args: None,
            spec: None,
            extra: Mapping::new(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_accepts_bare_string() {
        let step: Step = serde_yaml::from_str("step: start\nnext: end").unwrap();
        assert_eq!(step.arcs().len(), 1);
        assert_eq!(step.arcs()[0].step, "end");
    }

    #[test]
    fn next_accepts_bare_arc_list() {
        let step: Step = serde_yaml::from_str(
            r#"
step: start
next:
  - step: warm
    when: "{{ temp > 20 }}"
  - cold
"#,
        )
        .unwrap();
        assert_eq!(step.arcs().len(), 2);
        assert_eq!(step.arcs()[0].step, "warm");
        assert!(step.arcs()[0].when.is_some());
        assert_eq!(step.arcs()[1].step, "cold");
    }

    #[test]
    fn next_canonical_mapping_form() {
        let step: Step = serde_yaml::from_str(
            r#"
step: start
next:
  spec:
    mode: all
  arcs:
    - step: end
      args:
        city: Berlin
"#,
        )
        .unwrap();
        let next = step.next.as_ref().unwrap();
        assert!(next.spec.is_some());
        assert_eq!(next.arcs[0].step, "end");
        assert!(next.arcs[0].args.is_some());
    }

    #[test]
    fn legacy_next_reserializes_as_mapping() {
        let step: Step = serde_yaml::from_str("step: start\nnext: end").unwrap();
        let out = serde_yaml::to_string(&step).unwrap();
        let reparsed: Step = serde_yaml::from_str(&out).unwrap();
        assert_eq!(step, reparsed);
        assert!(out.contains("arcs"));
    }
}
