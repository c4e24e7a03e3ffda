//! Canonical text emission
//!
//! Serialization is stable: identical logical content always produces
//! identical text. Key order is the struct order of the AST types,
//! extras follow in their parse order, and absent optionals are
//! omitted entirely. Tool pipelines always come out in the
//! kind-tagged-list form regardless of the encoding they arrived in.

use crate::ast::Document;

/// Serialize a document to canonical DSL text
pub fn serialize(document: &Document) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;
    use pretty_assertions::assert_eq;

    const LEGACY: &str = r#"
metadata:
  name: mixed
workflow:
  - step: start
    tool:
      kind: http
      endpoint: "https://api.example.com"
    next: end
  - step: end
    tool:
      - wrap_up:
          kind: python
          code: "def main(): pass"
"#;

    #[test]
    fn serialization_is_stable() {
        let doc = parse(LEGACY).unwrap();
        let a = serialize(&doc).unwrap();
        let b = serialize(&doc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_is_idempotent() {
        let first = serialize(&parse(LEGACY).unwrap()).unwrap();
        let second = serialize(&parse(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn canonical_text_uses_kind_list_and_arc_mapping() {
        let out = serialize(&parse(LEGACY).unwrap()).unwrap();
        assert!(out.contains("arcs:"));
        assert!(out.contains("kind: python"));
        assert!(out.contains("name: wrap_up"));
    }
}
