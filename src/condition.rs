//! Condition Builder - templated boolean expressions for arc guards
//!
//! Conditions render as Jinja-style `{{ ... }}` expressions with
//! Python literal tokens (`True`, `False`, `None`), matching what the
//! execution runtime evaluates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The unconditional guard the designer writes on plain transitions
pub const ALWAYS_TRUE: &str = "{{ True }}";

static TRIVIAL_WHEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\{\{\s*)?(?:true|1)(?:\s*\}\})?\s*$").expect("trivial-when regex")
});

/// An absent, empty or always-true guard carries no branching meaning
pub fn is_trivial_when(when: Option<&str>) -> bool {
    match when {
        None => true,
        Some(s) => s.trim().is_empty() || TRIVIAL_WHEN.is_match(s),
    }
}

/// Comparison operators the designer offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Contains => "contains",
        };
        write!(f, "{s}")
    }
}

/// Right-hand literal, typed by the designer
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Literal {
    fn render(&self) -> String {
        match self {
            Literal::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
            Literal::Num(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Null => "None".to_string(),
        }
    }
}

/// Render a templated boolean expression.
///
/// `contains` becomes a membership test; every other operator renders
/// as `left op literal`.
pub fn build_condition(left: &str, op: CmpOp, literal: &Literal) -> String {
    let rhs = literal.render();
    match op {
        CmpOp::Contains => format!("{{{{ {rhs} in {left} }}}}"),
        _ => format!("{{{{ {left} {op} {rhs} }}}}"),
    }
}
