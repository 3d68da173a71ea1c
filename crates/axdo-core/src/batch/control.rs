//! `if-exists` / `if-focused` control-step evaluation (spec §4.7).

use crate::a11y::RoleTag;
use crate::executor::condition::Condition;
use crate::model::{text_matches, Element};

/// `if-exists { condition } then: [..] else: [..]` — the condition branch
/// taken depends on the condition resolving to *exactly one* element,
/// not merely at least one (spec §4.7).
#[derive(Debug, Clone)]
pub struct IfExists {
  pub condition: Condition,
}

impl IfExists {
  #[must_use]
  pub fn is_satisfied(&self, tree: &Element) -> bool {
    self.condition.matches_all(tree).len() == 1
  }
}

/// `if-focused { roles?, text? } then: [..] else: [..]`.
#[derive(Debug, Clone, Default)]
pub struct IfFocused {
  pub roles: Vec<RoleTag>,
  pub text: Option<String>,
}

impl IfFocused {
  #[must_use]
  pub fn is_satisfied(&self, tree: &Element) -> bool {
    let Some(focused) = tree.preorder().find(|e| e.focused) else {
      return false;
    };
    if !self.roles.is_empty() && !self.roles.contains(&focused.role) {
      return false;
    }
    if let Some(text) = &self.text {
      if !text_matches(focused, text, false) {
        return false;
      }
    }
    true
  }
}
