//! Top-level playbook document

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::ast::Step;

/// Schema version emitted for documents that omit `apiVersion`
pub const API_VERSION: &str = "noetl.io/v2";

/// Document kind emitted for documents that omit `kind`
pub const KIND_PLAYBOOK: &str = "Playbook";

/// A parsed playbook document - the single source of truth all views
/// and re-serialized text derive from.
///
/// Field order here is the canonical key order of emitted text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keychain: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<Mapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook: Option<Value>,

    #[serde(default)]
    pub workflow: Vec<Step>,

    /// Author content this core does not model
    #[serde(flatten)]
    pub extra: Mapping,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND_PLAYBOOK.to_string()
}

impl Default for Document {
    fn default() -> Self {
        Document {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: Metadata::default(),
            keychain: None,
            executor: None,
            workload: None,
            workbook: None,
            workflow: Vec::new(),
            extra: Mapping::new(),
        }
    }
}

impl Document {
    /// Look up a step by id
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.workflow.iter().find(|s| s.step == name)
    }

    /// The layout-store key for this document (playbook path, falling
    /// back to the metadata name when no path is registered).
    pub fn layout_key(&self) -> &str {
        self.metadata
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.metadata.name)
    }
}

/// Playbook metadata block
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_header() {
        let doc: Document = serde_yaml::from_str("workflow: []").unwrap();
        assert_eq!(doc.api_version, API_VERSION);
        assert_eq!(doc.kind, KIND_PLAYBOOK);
        assert!(doc.workflow.is_empty());
    }

    #[test]
    fn layout_key_prefers_path() {
        let doc: Document = serde_yaml::from_str(
            r#"
metadata:
  name: weather
  path: examples/weather
workflow: []
"#,
        )
        .unwrap();
        assert_eq!(doc.layout_key(), "examples/weather");
    }

    #[test]
    fn unknown_top_level_keys_survive() {
        let doc: Document = serde_yaml::from_str(
            r#"
metadata:
  name: t
annotations:
  team: data
workflow: []
"#,
        )
        .unwrap();
        assert!(doc.extra.contains_key(Value::from("annotations")));
    }
}
