/*! Pre/post-action element snapshots for verification (spec §3.5). */

use crate::model::Element;
use crate::types::{Bounds, ElementId, Ref};

/// State sampled before an action, and re-sampled after, to decide whether
/// the action produced an observable change. Short-lived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
  pub id: ElementId,
  pub r#ref: Ref,
  pub title: String,
  pub value: String,
  pub focused: bool,
  pub selected: bool,
  pub bounds: Bounds,
  pub child_count: usize,
  pub exists: bool,
}

impl ElementSnapshot {
  pub fn capture(element: &Element) -> Self {
    Self {
      id: element.id,
      r#ref: element.r#ref.clone(),
      title: element.title.clone(),
      value: element.value.clone(),
      focused: element.focused,
      selected: element.selected,
      bounds: element.bounds,
      child_count: element.children.len(),
      exists: true,
    }
  }

  /// A snapshot recording that the element no longer exists.
  pub fn missing(id: ElementId, r#ref: Ref) -> Self {
    Self {
      id,
      r#ref,
      title: String::new(),
      value: String::new(),
      focused: false,
      selected: false,
      bounds: Bounds::new(0, 0, 0, 0),
      child_count: 0,
      exists: false,
    }
  }

  /// Whether any sampled field differs from `other`, per spec §3.5: the
  /// pair is "changed" if any sampled field differs, the element
  /// disappeared, or its child count changed.
  pub fn changed_from(&self, before: &ElementSnapshot) -> bool {
    if before.exists && !self.exists {
      return true;
    }
    if !self.exists {
      return false;
    }
    self.title != before.title
      || self.value != before.value
      || self.focused != before.focused
      || self.selected != before.selected
      || self.bounds != before.bounds
      || self.child_count != before.child_count
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::RoleTag;

  fn elem(value: &str) -> Element {
    Element {
      id: ElementId(1),
      r#ref: Ref("r1".into()),
      role: RoleTag::Input,
      subrole: None,
      title: String::new(),
      value: value.into(),
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
  fn value_change_is_detected() {
    let before = ElementSnapshot::capture(&elem("old"));
    let after = ElementSnapshot::capture(&elem("new"));
    assert!(after.changed_from(&before));
  }

  #[test]
  fn no_change_when_identical() {
    let before = ElementSnapshot::capture(&elem("same"));
    let after = ElementSnapshot::capture(&elem("same"));
    assert!(!after.changed_from(&before));
  }

  #[test]
  fn disappearance_counts_as_changed() {
    let before = ElementSnapshot::capture(&elem("x"));
    let after = ElementSnapshot::missing(ElementId(1), Ref("r1".into()));
    assert!(after.changed_from(&before));
  }
}
