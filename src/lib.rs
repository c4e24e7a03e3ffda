//! Skein - bidirectional sync core between playbook DSL text and the
//! editable graph model behind the visual designer.
//!
//! Text flows in through [`dsl::parse`], becomes a canonical
//! [`ast::Document`], projects into step-graph / flowchart / Petri
//! views, takes edits through [`draft`] buffers validated by the
//! committer, and flows back out as byte-stable canonical text.

pub mod ast;
pub mod commit;
pub mod condition;
pub mod draft;
pub mod dsl;
pub mod error;
pub mod graph;
pub mod layout;
pub mod resolver;
pub mod session;

pub use ast::Document;
pub use condition::{build_condition, is_trivial_when, CmpOp, Literal, ALWAYS_TRUE};
pub use draft::{
    ArcDraft, DraftGroup, MetadataDraft, RuleDraft, RuleMode, StepDraft, TaskDraft, ThenDraft,
};
pub use error::{EngineError, FixSuggestion, ParseError, ValidationError};
pub use graph::{ViewGraph, ViewMode};
pub use layout::{JsonFileLayoutStore, LayoutStore, MemoryLayoutStore, Position, PositionMap};
pub use session::{EditorSession, LoadOutcome};
