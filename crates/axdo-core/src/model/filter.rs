/*! Tree filtering operations (spec §4.1). */

use crate::a11y::{expand_roles, RoleFilterTag, RoleTag};
use crate::model::{Element, FlatElement};
use crate::types::Bounds;

/// Retain only elements whose role is in `roles` (meta-roles expanded
/// first); an element's children are retained transitively alongside it.
pub fn filter_by_roles(tree: &Element, roles: &[RoleFilterTag]) -> Option<Element> {
  let concrete = expand_roles(roles);
  filter_by_roles_concrete(tree, &concrete)
}

fn filter_by_roles_concrete(node: &Element, roles: &[RoleTag]) -> Option<Element> {
  let children: Vec<Element> = node
    .children
    .iter()
    .filter_map(|c| filter_by_roles_concrete(c, roles))
    .collect();

  if roles.contains(&node.role) || !children.is_empty() {
    let mut kept = node.clone();
    kept.children = children;
    Some(kept)
  } else {
    None
  }
}

/// Strip a trailing parenthesized shortcut suffix, e.g. `"Send (⌘Enter)"` → `"Send"`.
fn strip_shortcut_suffix(text: &str) -> &str {
  let trimmed = text.trim_end();
  if let Some(paren_start) = trimmed.rfind('(') {
    if trimmed.ends_with(')') {
      return trimmed[..paren_start].trim_end();
    }
  }
  trimmed
}

/// Case-insensitive substring/exact match over `{title, value, description}`,
/// shared with the resolver's text-resolution pipeline (spec §4.3).
pub(crate) fn text_matches(element: &Element, query: &str, exact: bool) -> bool {
  if query.is_empty() {
    return true;
  }
  let query_lower = query.to_lowercase();
  let fields = [&element.title, &element.value, &element.description];
  if exact {
    fields
      .into_iter()
      .any(|f| strip_shortcut_suffix(f).to_lowercase() == query_lower)
  } else {
    fields
      .into_iter()
      .any(|f| f.to_lowercase().contains(&query_lower))
  }
}

/// Case-insensitive substring match over `{title, value, description}`.
/// `filter_by_text(tree, "")` returns the whole tree (spec §8 boundary).
pub fn filter_by_text(tree: &Element, query: &str, exact: bool) -> Option<Element> {
  filter_by_text_rec(tree, query, exact)
}

fn filter_by_text_rec(node: &Element, query: &str, exact: bool) -> Option<Element> {
  let children: Vec<Element> = node
    .children
    .iter()
    .filter_map(|c| filter_by_text_rec(c, query, exact))
    .collect();

  if text_matches(node, query, exact) || !children.is_empty() {
    let mut kept = node.clone();
    kept.children = children;
    Some(kept)
  } else {
    None
  }
}

/// Retain exactly the path from root to any focused descendant,
/// preserving ancestors.
pub fn filter_by_focused(tree: &Element) -> Option<Element> {
  if tree.focused {
    let mut kept = tree.clone();
    kept.children = vec![];
    return Some(kept);
  }
  let children: Vec<Element> = tree.children.iter().filter_map(filter_by_focused).collect();
  if children.is_empty() {
    None
  } else {
    let mut kept = tree.clone();
    kept.children = children;
    Some(kept)
  }
}

/// Retain elements whose bounds intersect `bbox`.
pub fn filter_by_bounds(tree: &Element, bbox: Bounds) -> Option<Element> {
  let children: Vec<Element> = tree
    .children
    .iter()
    .filter_map(|c| filter_by_bounds(c, bbox))
    .collect();
  if tree.bounds.intersects(&bbox) || !children.is_empty() {
    let mut kept = tree.clone();
    kept.children = children;
    Some(kept)
  } else {
    None
  }
}

/// Drop elements with zero width or height from a flat list.
pub fn filter_visible(list: &[FlatElement]) -> Vec<FlatElement> {
  list.iter().filter(|e| e.bounds.is_visible()).cloned().collect()
}
