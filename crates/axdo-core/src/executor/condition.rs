//! Wait/assert condition matching (spec §4.8).

use crate::a11y::RoleTag;
use crate::model::{text_matches, Element};
use crate::types::ElementId;

/// A `{for-text, for-role, for-id, gone}` condition.
#[derive(Debug, Clone, Default)]
pub struct Condition {
  pub for_text: Option<String>,
  pub for_role: Option<RoleTag>,
  pub for_id: Option<ElementId>,
  pub gone: bool,
}

impl Condition {
  /// Find the first element in `tree` satisfying every non-empty conjunct.
  pub fn find<'a>(&self, tree: &'a Element) -> Option<&'a Element> {
    tree.preorder().find(|e| {
      self.for_text.as_deref().map_or(true, |t| text_matches(e, t, false))
        && self.for_role.map_or(true, |r| e.role == r)
        && self.for_id.map_or(true, |id| e.id == id)
    })
  }

  /// Whether the condition is satisfied against `tree`: a non-`gone`
  /// condition needs a match; a `gone` condition inverts that.
  pub fn is_satisfied(&self, tree: &Element) -> bool {
    let found = self.find(tree).is_some();
    if self.gone {
      !found
    } else {
      found
    }
  }

  /// Every element in `tree` satisfying every non-empty conjunct, used by
  /// `if-exists` to test for exactly-one-match (spec §4.7) rather than
  /// just presence.
  pub fn matches_all<'a>(&self, tree: &'a Element) -> Vec<&'a Element> {
    tree
      .preorder()
      .filter(|e| {
        self.for_text.as_deref().map_or(true, |t| text_matches(e, t, false))
          && self.for_role.map_or(true, |r| e.role == r)
          && self.for_id.map_or(true, |id| e.id == id)
      })
      .collect()
  }
}

/// Additional property checks `assert` supports beyond presence.
#[derive(Debug, Clone, Default)]
pub struct PropertyChecks {
  pub value: Option<String>,
  pub value_contains: Option<String>,
  pub checked: bool,
  pub unchecked: bool,
  pub enabled: bool,
  pub disabled: bool,
  pub focused: bool,
}

impl PropertyChecks {
  /// Whether every requested check holds for `element`.
  pub fn holds(&self, element: &Element) -> bool {
    if let Some(want) = &self.value {
      if &element.value != want {
        return false;
      }
    }
    if let Some(want) = &self.value_contains {
      if !element.value.contains(want.as_str()) {
        return false;
      }
    }
    if self.checked && !element.selected {
      return false;
    }
    if self.unchecked && element.selected {
      return false;
    }
    if self.enabled && element.enabled != Some(true) {
      return false;
    }
    if self.disabled && element.enabled != Some(false) {
      return false;
    }
    if self.focused && !element.focused {
      return false;
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Bounds;

  fn elem(id: u32, role: RoleTag, title: &str) -> Element {
    Element {
      id: ElementId(id),
      r#ref: crate::types::Ref(format!("r{id}")),
      role,
      subrole: None,
      title: title.into(),
      value: String::new(),
      description: String::new(),
      bounds: Bounds::new(0, 0, 10, 10),
      focused: false,
      selected: false,
      enabled: Some(true),
      actions: vec![],
      children: vec![],
    }
  }

  #[test]
  fn gone_inverts_match() {
    let tree = elem(1, RoleTag::Btn, "Send");
    let present = Condition {
      for_text: Some("Send".into()),
      gone: false,
      ..Default::default()
    };
    let gone = Condition {
      for_text: Some("Send".into()),
      gone: true,
      ..Default::default()
    };
    assert!(present.is_satisfied(&tree));
    assert!(!gone.is_satisfied(&tree));
  }

  #[test]
  fn property_checks_combine_conjunctively() {
    let mut e = elem(1, RoleTag::Chk, "Agree");
    e.selected = true;
    let checks = PropertyChecks {
      checked: true,
      ..Default::default()
    };
    assert!(checks.holds(&e));
    e.selected = false;
    assert!(!checks.holds(&e));
  }

  #[test]
  fn matches_all_counts_every_conjunct_match() {
    let mut root = elem(1, RoleTag::Window, "");
    root.children = vec![elem(2, RoleTag::Btn, "Subject"), elem(3, RoleTag::Input, "Subject")];
    let condition = Condition {
      for_text: Some("Subject".into()),
      ..Default::default()
    };
    assert_eq!(condition.matches_all(&root).len(), 2);
  }
}
