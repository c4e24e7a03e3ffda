//! Raw DSL text to a typed document

use crate::ast::Document;
use crate::error::ParseError;

/// Parse raw DSL text.
///
/// Empty (or whitespace-only) text parses to an empty document so a
/// fresh editor buffer is not an error state. Everything else must be
/// a YAML mapping matching the playbook schema.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    if text.trim().is_empty() {
        return Ok(Document::default());
    }
    serde_yaml::from_str(text).map_err(ParseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_an_empty_document() {
        let doc = parse("").unwrap();
        assert!(doc.workflow.is_empty());
    }

    #[test]
    fn scalar_text_is_a_parse_error() {
        assert!(parse("just a string").is_err());
    }

    #[test]
    fn full_playbook_parses() {
        let doc = parse(
            r#"
apiVersion: noetl.io/v2
kind: Playbook
metadata:
  name: weather
  path: examples/weather
workload:
  city: Berlin
workflow:
  - step: start
    desc: "Fetch weather data"
    tool:
      kind: http
      method: GET
      endpoint: "{{ workload.api_url }}/forecast"
    next:
      arcs:
        - step: report
          when: "{{ outcome.status == 'ok' }}"
  - step: report
    tool:
      kind: python
      code: |
        def main():
            return {"status": "done"}
"#,
        )
        .unwrap();
        assert_eq!(doc.metadata.name, "weather");
        assert_eq!(doc.workflow.len(), 2);
        assert_eq!(doc.workflow[0].arcs()[0].step, "report");
    }
}
