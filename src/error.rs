//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Top-level engine error
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session holds invalid text; mutations are rejected until
    /// valid DSL text is loaded again.
    #[error("document is invalid; editing is disabled until valid DSL text is loaded")]
    ReadOnly,

    #[error("unknown step '{0}'")]
    UnknownStep(String),

    #[error("YAML serialize error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to parse raw DSL text into a document
#[derive(Error, Debug)]
#[error("YAML parse error: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line/column when serde_yaml reports a location
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        ParseError {
            message: err.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}

/// Draft validation failure, scoped to the offending field.
///
/// A failed validation aborts the whole apply: the canonical document
/// and the emitted text stay untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be a mapping")]
    NotAMapping { field: String },

    #[error("{field} must be a number")]
    NotANumber { field: String },

    #[error("{field} is not valid YAML: {details}")]
    InvalidYaml { field: String, details: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required { field: field.into() }
    }

    pub fn not_a_mapping(field: impl Into<String>) -> Self {
        ValidationError::NotAMapping { field: field.into() }
    }

    pub fn not_a_number(field: impl Into<String>) -> Self {
        ValidationError::NotANumber { field: field.into() }
    }

    /// The offending field name
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotAMapping { field }
            | ValidationError::NotANumber { field }
            | ValidationError::InvalidYaml { field, .. } => field,
        }
    }
}

impl FixSuggestion for EngineError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            EngineError::Parse(e) => e.fix_suggestion(),
            EngineError::Validation(e) => e.fix_suggestion(),
            EngineError::ReadOnly => {
                Some("Fix the DSL text and reload it before editing the graph")
            }
            EngineError::UnknownStep(_) => Some("Check the step name against the workflow list"),
            EngineError::Serialize(_) => None,
            EngineError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

impl FixSuggestion for ParseError {
    fn fix_suggestion(&self) -> Option<&str> {
        Some("Check YAML syntax: indentation and quoting")
    }
}

impl FixSuggestion for ValidationError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field } if field == "when" => {
                Some("Give the rule a condition, or switch it to an else rule")
            }
            ValidationError::Required { field } if field == "to" => {
                Some("Pick the task the jump should transfer to")
            }
            ValidationError::Required { .. } => None,
            ValidationError::NotAMapping { .. } => {
                Some("Use key: value pairs; scalars and lists are not accepted here")
            }
            ValidationError::NotANumber { .. } => Some("Use a bare integer, e.g. attempts: 3"),
            ValidationError::InvalidYaml { .. } => {
                Some("Check YAML syntax: indentation and quoting")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_message_is_field_scoped() {
        let err = ValidationError::required("when");
        assert_eq!(err.to_string(), "when is required");
        assert_eq!(err.field(), "when");
    }

    #[test]
    fn parse_error_keeps_location() {
        let bad = serde_yaml::from_str::<serde_yaml::Value>(": : :").unwrap_err();
        let err = ParseError::from(bad);
        assert!(!err.message.is_empty());
    }
}
