//! Root metadata draft

use serde_yaml::Value;

use crate::ast::Metadata;
use crate::error::ValidationError;

/// Editable playbook metadata (name, path, version, description)
#[derive(Debug, Clone)]
pub struct MetadataDraft {
    /// Unmodeled metadata keys, carried through verbatim
    extra: serde_yaml::Mapping,
    pub name: String,
    pub path: String,
    pub version: String,
    pub description: String,
    baseline: Option<Value>,
}

impl MetadataDraft {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let mut draft = MetadataDraft {
            extra: metadata.extra.clone(),
            name: metadata.name.clone(),
            path: metadata.path.clone().unwrap_or_default(),
            version: metadata.version.clone().unwrap_or_default(),
            description: metadata.description.clone().unwrap_or_default(),
            baseline: None,
        };
        draft.baseline = draft.value();
        draft
    }

    pub fn dirty(&self) -> bool {
        match (self.value(), &self.baseline) {
            (Some(now), Some(then)) => now != *then,
            _ => true,
        }
    }

    pub fn to_metadata(&self) -> Result<Metadata, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::required("name"));
        }
        Ok(Metadata {
            name: name.to_string(),
            path: non_empty(&self.path),
            version: non_empty(&self.version),
            description: non_empty(&self.description),
            extra: self.extra.clone(),
        })
    }

    fn value(&self) -> Option<Value> {
        self.to_metadata()
            .ok()
            .and_then(|m| serde_yaml::to_value(m).ok())
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Metadata {
        serde_yaml::from_str(
            r#"
name: weather
path: examples/weather
version: "1.2.0"
"#,
        )
        .unwrap()
    }

    #[test]
    fn fresh_draft_is_clean() {
        let draft = MetadataDraft::from_metadata(&fixture());
        assert!(!draft.dirty());
    }

    #[test]
    fn edits_dirty_the_draft() {
        let mut draft = MetadataDraft::from_metadata(&fixture());
        draft.description = "Weather pipeline".into();
        assert!(draft.dirty());
    }

    #[test]
    fn name_is_required() {
        let mut draft = MetadataDraft::from_metadata(&fixture());
        draft.name = "  ".into();
        assert_eq!(
            draft.to_metadata().unwrap_err().to_string(),
            "name is required"
        );
        assert!(draft.dirty());
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let mut draft = MetadataDraft::from_metadata(&fixture());
        draft.version.clear();
        let metadata = draft.to_metadata().unwrap();
        assert_eq!(metadata.version, None);
        assert_eq!(metadata.path.as_deref(), Some("examples/weather"));
    }
}
