//! Policy rule drafts
//!
//! The rule editor reconstructs each `then` block from what the user
//! actually filled in; empty optional fields are omitted from the
//! model entirely rather than serialized as empty or null.

use crate::ast::{Backoff, DoAction, ElseBody, ElseRule, PolicyRule, ThenBlock, WhenRule};
use crate::draft::{mapping_to_yaml, parse_yaml_mapping};
use crate::error::ValidationError;

/// Whether the rule is a when-rule or the else-rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleMode {
    #[default]
    When,
    Else,
}

/// One editable policy rule
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleDraft {
    pub mode: RuleMode,
    /// Condition text; ignored (and not serialized) for else-rules
    pub when: String,
    pub then: ThenDraft,
}

impl RuleDraft {
    pub fn from_rule(rule: &PolicyRule) -> Self {
        match rule {
            PolicyRule::When(w) => RuleDraft {
                mode: RuleMode::When,
                when: w.when.clone(),
                then: ThenDraft::from_then(&w.then),
            },
            PolicyRule::Else(e) => RuleDraft {
                mode: RuleMode::Else,
                when: String::new(),
                then: ThenDraft::from_then(&e.else_.then),
            },
        }
    }

    pub fn to_rule(&self) -> Result<PolicyRule, ValidationError> {
        let then = self.then.to_then()?;
        match self.mode {
            RuleMode::When => {
                let when = self.when.trim();
                if when.is_empty() {
                    return Err(ValidationError::required("when"));
                }
                Ok(PolicyRule::When(WhenRule {
                    when: when.to_string(),
                    then,
                }))
            }
            RuleMode::Else => Ok(PolicyRule::Else(ElseRule {
                else_: ElseBody { then },
            })),
        }
    }
}

/// Editable `then` block. Text fields mirror the designer's inputs;
/// conversion validates numbers and the jump target.
#[derive(Debug, Clone, PartialEq)]
pub struct ThenDraft {
    pub do_: DoAction,
    pub attempts: String,
    pub backoff: Option<Backoff>,
    pub delay: String,
    pub to: String,
    pub set_iter_yaml: String,
    pub set_ctx_yaml: String,
}

impl Default for ThenDraft {
    fn default() -> Self {
        ThenDraft {
            do_: DoAction::Continue,
            attempts: String::new(),
            backoff: None,
            delay: String::new(),
            to: String::new(),
            set_iter_yaml: String::new(),
            set_ctx_yaml: String::new(),
        }
    }
}

impl ThenDraft {
    pub fn from_then(then: &ThenBlock) -> Self {
        ThenDraft {
            do_: then.do_,
            attempts: then.attempts.map(|a| a.to_string()).unwrap_or_default(),
            backoff: then.backoff,
            delay: then.delay.map(|d| d.to_string()).unwrap_or_default(),
            to: then.to.clone().unwrap_or_default(),
            set_iter_yaml: mapping_to_yaml(then.set_iter.as_ref()),
            set_ctx_yaml: mapping_to_yaml(then.set_ctx.as_ref()),
        }
    }

    pub fn to_then(&self) -> Result<ThenBlock, ValidationError> {
        let mut then = ThenBlock::new(self.do_);

        let attempts = self.attempts.trim();
        if !attempts.is_empty() {
            then.attempts = Some(
                attempts
                    .parse::<u32>()
                    .map_err(|_| ValidationError::not_a_number("attempts"))?,
            );
        }

        let delay = self.delay.trim();
        if !delay.is_empty() {
            then.delay = Some(
                delay
                    .parse::<f64>()
                    .map_err(|_| ValidationError::not_a_number("delay"))?,
            );
        }

        then.backoff = self.backoff;

        let to = self.to.trim();
        if self.do_ == DoAction::Jump && to.is_empty() {
            return Err(ValidationError::required("to"));
        }
        if !to.is_empty() {
            then.to = Some(to.to_string());
        }

        then.set_iter = parse_yaml_mapping("set_iter", &self.set_iter_yaml)?;
        then.set_ctx = parse_yaml_mapping("set_ctx", &self.set_ctx_yaml)?;
        Ok(then)
    }
}
