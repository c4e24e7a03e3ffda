//! AST Module - typed playbook document model
//!
//! Contains the Rust types a DSL text parses into:
//! - `document`: Document, Metadata and the top-level sections
//! - `step`: Step, NextBlock, Arc
//! - `task`: Task, TaskSpec and the three legacy tool encodings
//! - `policy`: Policy, PolicyRule, ThenBlock and the control verbs
//!
//! These types represent the "what" - static structure parsed from YAML.
//! Unknown keys are preserved in insertion-ordered mappings so a read
//! never drops author content.

mod document;
mod policy;
mod step;
mod task;

// Re-export all public types
pub use document::{Document, Metadata, API_VERSION, KIND_PLAYBOOK};
pub use policy::{Backoff, DoAction, ElseBody, ElseRule, Policy, PolicyRule, ThenBlock, WhenRule};
pub use step::{Arc, NextBlock, Step};
pub use task::{Task, TaskSpec, ToolDef, SUBPLAYBOOK_KINDS};
