//! Draft Module - per-entity edit buffers
//!
//! A draft holds pending edits separate from the committed document.
//! At creation it captures a structural baseline per logical group
//! (basics / tasks / policy / arcs) so each group can be compared,
//! applied or discarded independently. Freeform object fields
//! (spec, loop, extra, args, set_ctx, set_iter) are edited as YAML
//! snippets and must parse back to mappings.
//!
//! Conversions back to AST types are fallible; a validation error
//! aborts the apply and leaves the canonical document untouched.

mod arc;
mod meta;
mod policy;
mod step;
mod task;

pub use arc::ArcDraft;
pub use meta::MetadataDraft;
pub use policy::{RuleDraft, RuleMode, ThenDraft};
pub use step::{BasicsDraft, StepDraft};
pub use task::TaskDraft;

use serde_yaml::{Mapping, Value};

use crate::error::ValidationError;

/// Logical draft groups tracked independently for dirty state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftGroup {
    Basics,
    Tasks,
    Policy,
    Arcs,
}

/// Render an optional mapping as an editable YAML snippet
pub(crate) fn mapping_to_yaml(mapping: Option<&Mapping>) -> String {
    match mapping {
        Some(m) if !m.is_empty() => serde_yaml::to_string(m).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Parse an edited YAML snippet back into a mapping.
///
/// Empty input means "field absent". Non-mapping YAML is rejected with
/// a field-scoped error so spec/loop/tool/next/extra/args stay
/// object-shaped.
pub(crate) fn parse_yaml_mapping(
    field: &str,
    text: &str,
) -> Result<Option<Mapping>, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_yaml::from_str(trimmed).map_err(|err| ValidationError::InvalidYaml {
            field: field.to_string(),
            details: err.to_string(),
        })?;
    match value {
        Value::Mapping(m) => Ok(Some(m)),
        _ => Err(ValidationError::not_a_mapping(field)),
    }
}
