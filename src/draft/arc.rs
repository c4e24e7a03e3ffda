//! Arc drafts

use crate::ast::Arc;
use crate::draft::{mapping_to_yaml, parse_yaml_mapping};
use crate::error::ValidationError;

/// One editable outgoing transition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArcDraft {
    /// Target step id
    pub target: String,
    /// Guard expression; empty means unconditional
    pub when: String,
    pub args_yaml: String,
    pub spec_yaml: String,
}

impl ArcDraft {
    pub fn from_arc(arc: &Arc) -> Self {
        ArcDraft {
            target: arc.step.clone(),
            when: arc.when.clone().unwrap_or_default(),
            args_yaml: mapping_to_yaml(arc.args.as_ref()),
            spec_yaml: mapping_to_yaml(arc.spec.as_ref()),
        }
    }

    pub fn to_arc(&self) -> Result<Arc, ValidationError> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(ValidationError::required("step"));
        }
        let mut arc = Arc::to_step(target);
        let when = self.when.trim();
        if !when.is_empty() {
            arc.when = Some(when.to_string());
        }
        arc.args = parse_yaml_mapping("args", &self.args_yaml)?;
        arc.spec = parse_yaml_mapping("spec", &self.spec_yaml)?;
        Ok(arc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_required() {
        let draft = ArcDraft::default();
        assert_eq!(draft.to_arc().unwrap_err().to_string(), "step is required");
    }

    #[test]
    fn args_must_be_object_shaped() {
        let draft = ArcDraft {
            target: "end".into(),
            args_yaml: "- a\n- b".into(),
            ..ArcDraft::default()
        };
        assert_eq!(
            draft.to_arc().unwrap_err().to_string(),
            "args must be a mapping"
        );
    }

    #[test]
    fn round_trip() {
        let arc: Arc = serde_yaml::from_str(
            r#"
step: report
when: "{{ outcome.status == 'ok' }}"
args:
  city: Berlin
"#,
        )
        .unwrap();
        let draft = ArcDraft::from_arc(&arc);
        assert_eq!(draft.to_arc().unwrap(), arc);
    }
}
