//! Retry/branch policy rules carried by tasks
//!
//! Rules are evaluated in order by the execution runtime: the first
//! matching when-rule applies, else the else-rule if present. This core
//! validates and serializes the shapes; it never runs the state machine.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fmt;
use std::str::FromStr;

/// Policy block under `task.spec.policy`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Policy {
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// A when-rule or an else-rule. The shapes are mutually exclusive:
/// a when-rule must carry `when`, an else-rule must not.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PolicyRule {
    When(WhenRule),
    Else(ElseRule),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhenRule {
    pub when: String,
    pub then: ThenBlock,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElseRule {
    #[serde(rename = "else")]
    pub else_: ElseBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElseBody {
    pub then: ThenBlock,
}

/// Control action taken when a rule matches.
///
/// Only fields the author populated are serialized; the runtime owns
/// the defaults (attempts 3, delay 1.0, backoff none).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThenBlock {
    #[serde(rename = "do")]
    pub do_: DoAction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff: Option<Backoff>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,

    /// Jump target: a task label in the same pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_iter: Option<Mapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_ctx: Option<Mapping>,
}

impl ThenBlock {
    pub fn new(do_: DoAction) -> Self {
        ThenBlock {
            do_,
            attempts: None,
            backoff: None,
            delay: None,
            to: None,
            set_iter: None,
            set_ctx: None,
        }
    }
}

/// The five control verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoAction {
    Continue,
    Retry,
    Jump,
    Break,
    Fail,
}

impl fmt::Display for DoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DoAction::Continue => "continue",
            DoAction::Retry => "retry",
            DoAction::Jump => "jump",
            DoAction::Break => "break",
            DoAction::Fail => "fail",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DoAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(DoAction::Continue),
            "retry" => Ok(DoAction::Retry),
            "jump" => Ok(DoAction::Jump),
            "break" => Ok(DoAction::Break),
            "fail" => Ok(DoAction::Fail),
            other => Err(format!("unknown do action '{other}'")),
        }
    }
}

/// Retry delay scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    None,
    Linear,
    Exponential,
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Backoff::None => "none",
            Backoff::Linear => "linear",
            Backoff::Exponential => "exponential",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Backoff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Backoff::None),
            "linear" => Ok(Backoff::Linear),
            "exponential" => Ok(Backoff::Exponential),
            other => Err(format!("unknown backoff '{other}'")),
        }
    }
}
