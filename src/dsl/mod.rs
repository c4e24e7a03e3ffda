//! DSL Module - text to document and back
//!
//! The normalizer side of the sync loop:
//! - `parse`: raw DSL text into a typed [`Document`](crate::ast::Document)
//! - `normalize`: repair missing and duplicate step ids
//! - `serialize`: canonical, byte-stable text from a document
//!
//! `serialize(parse(serialize(parse(t)))) == serialize(parse(t))` for any
//! syntactically valid `t`.

mod normalize;
mod parse;
mod serialize;

// Re-export all public operations
pub use normalize::{normalize, normalize_workflow, unique_name};
pub use parse::parse;
pub use serialize::serialize;
