/*! The accessibility tree node types (spec §3.1-3.2). */

use crate::a11y::{ActionTag, RoleTag};
use crate::types::{Bounds, ElementId, Ref};
use serde::{Deserialize, Serialize};

/// A node of the accessibility tree as observed at one point in time.
///
/// Constructed by a read against the platform adapter, never mutated
/// afterward (spec §3.1 Lifecycle): an `Element` is a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
  /// Sequential within one read; not stable across reads.
  pub id: ElementId,
  /// Advisory, content-derived identifier; stable-ish across reads.
  pub r#ref: Ref,
  pub role: RoleTag,
  /// Native subrole (e.g. a dialog/sheet marker), preserved verbatim.
  pub subrole: Option<String>,
  pub title: String,
  pub value: String,
  pub description: String,
  pub bounds: Bounds,
  pub focused: bool,
  pub selected: bool,
  /// `None` when the adapter could not determine enabled state.
  pub enabled: Option<bool>,
  pub actions: Vec<ActionTag>,
  pub children: Vec<Element>,
}

impl Element {
  /// Whether any of `{title, value, description}` is non-empty.
  pub fn has_text(&self) -> bool {
    !self.title.is_empty() || !self.value.is_empty() || !self.description.is_empty()
  }

  /// The first non-empty field among title, description, value — the
  /// "stable-looking" text attribute used for ref generation (spec §3.3).
  pub fn primary_text(&self) -> Option<&str> {
    [&self.title, &self.description, &self.value]
      .into_iter()
      .find(|s| !s.is_empty())
      .map(String::as_str)
  }

  /// Whether this element exposes an accessibility `press` action or is of
  /// an interactive role (used by the agent serializer, spec §4.6).
  pub fn is_actionable(&self) -> bool {
    self.actions.contains(&ActionTag::Press) || self.role.is_interactive()
  }

  /// Pre-order iteration over this element and all descendants.
  pub fn preorder(&self) -> PreorderIter<'_> {
    PreorderIter { stack: vec![self] }
  }
}

/// Depth-first pre-order iterator over an [`Element`] subtree.
pub struct PreorderIter<'a> {
  stack: Vec<&'a Element>,
}

impl<'a> Iterator for PreorderIter<'a> {
  type Item = &'a Element;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    for child in node.children.iter().rev() {
      self.stack.push(child);
    }
    Some(node)
  }
}

/// A flattened representation used for diffs, serialization, and
/// scan-filtering (spec §3.2). Flattening is pre-order; `id` order equals
/// flat order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatElement {
  pub id: ElementId,
  pub r#ref: Ref,
  pub role: RoleTag,
  pub subrole: Option<String>,
  pub title: String,
  pub value: String,
  pub description: String,
  pub bounds: Bounds,
  pub focused: bool,
  pub selected: bool,
  pub enabled: Option<bool>,
  pub actions: Vec<ActionTag>,
  /// Ancestor breadcrumb as a short role sequence, e.g.
  /// `window > group > web > form > input`.
  pub path: String,
  /// Number of direct children this element had in the tree it was
  /// flattened from. Needed by the diff/verification "child count changed"
  /// check (spec §3.5) since the flat form drops the nested children.
  pub child_count: usize,
}

impl FlatElement {
  pub fn from_element(element: &Element, path: String) -> Self {
    Self {
      id: element.id,
      r#ref: element.r#ref.clone(),
      role: element.role,
      subrole: element.subrole.clone(),
      title: element.title.clone(),
      value: element.value.clone(),
      description: element.description.clone(),
      bounds: element.bounds,
      focused: element.focused,
      selected: element.selected,
      enabled: element.enabled,
      actions: element.actions.clone(),
      path,
      child_count: element.children.len(),
    }
  }
}

/// A minimal element summary, used in error messages (disambiguation
/// candidates, spec §4.3 step f) and in last-observed-state reporting
/// (spec §7 kind 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
  pub id: ElementId,
  pub role: RoleTag,
  pub title: String,
  pub description: String,
  pub bounds: crate::types::Bounds,
}

impl From<&Element> for ElementSummary {
  fn from(e: &Element) -> Self {
    Self {
      id: e.id,
      role: e.role,
      title: e.title.clone(),
      description: e.description.clone(),
      bounds: e.bounds,
    }
  }
}

impl From<&FlatElement> for ElementSummary {
  fn from(e: &FlatElement) -> Self {
    Self {
      id: e.id,
      role: e.role,
      title: e.title.clone(),
      description: e.description.clone(),
      bounds: e.bounds,
    }
  }
}
