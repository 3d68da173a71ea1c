//! Text-resolution pipeline (spec §4.3 steps a-f).

use std::collections::HashMap;

use crate::a11y::RoleTag;
use crate::model::{text_matches, Element};
use crate::types::{CoreResult, ElementId};

use super::disambiguate;

/// Leaf-preferring match collection: a node matches if its own text/role
/// match, but only when none of its descendants also match — otherwise
/// only the descendant matches are kept.
fn collect_leaf_matches<'a>(node: &'a Element, query: &str, exact: bool, roles: &[RoleTag]) -> Vec<&'a Element> {
  let mut descendant_matches = Vec::new();
  for child in &node.children {
    descendant_matches.extend(collect_leaf_matches(child, query, exact, roles));
  }
  if !descendant_matches.is_empty() {
    return descendant_matches;
  }
  let role_ok = roles.is_empty() || roles.contains(&node.role);
  if role_ok && text_matches(node, query, exact) {
    vec![node]
  } else {
    Vec::new()
  }
}

pub fn resolve_text<'a>(
  search_root: &'a Element,
  query: &str,
  exact: bool,
  roles: &[RoleTag],
  paths: &HashMap<ElementId, Vec<ElementId>>,
  focused_path: Option<&[ElementId]>,
  focused: Option<&Element>,
) -> CoreResult<&'a Element> {
  let matches: Vec<&Element> = collect_leaf_matches(search_root, query, exact, roles)
    .into_iter()
    .filter(|e| e.bounds.is_visible())
    .collect();

  disambiguate::run(matches, paths, focused_path, focused, query)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Bounds, ElementId as Id, Ref};

  fn leaf(id: u32, role: RoleTag, title: &str, bounds: Bounds) -> Element {
    Element {
      id: Id(id),
      r#ref: Ref(format!("r{id}")),
      role,
      subrole: None,
      title: title.into(),
      value: String::new(),
      description: String::new(),
      bounds,
      focused: false,
      selected: false,
      enabled: Some(true),
      actions: vec![],
      children: vec![],
    }
  }

  fn group(id: u32, children: Vec<Element>) -> Element {
    let mut e = leaf(id, RoleTag::Group, "", Bounds::new(0, 0, 800, 600));
    e.children = children;
    e
  }

  #[test]
  fn invisible_matches_are_dropped() {
    let tree = group(
      1,
      vec![leaf(2, RoleTag::Btn, "Send", Bounds::new(0, 0, 0, 0))],
    );
    let paths = HashMap::new();
    let err = resolve_text(&tree, "Send", true, &[], &paths, None, None).unwrap_err();
    assert!(matches!(err, crate::types::CoreError::Resolution(crate::types::ResolutionError::NoMatch { .. })));
  }

  #[test]
  fn leaf_match_wins_over_containing_title() {
    let tree = group(
      1,
      vec![leaf(2, RoleTag::Btn, "Send", Bounds::new(0, 0, 10, 10))],
    );
    let paths = HashMap::new();
    let found = resolve_text(&tree, "Send", true, &[], &paths, None, None).unwrap();
    assert_eq!(found.id, Id(2));
  }

  fn arb_node() -> impl proptest::strategy::Strategy<Value = Element> {
    use proptest::prelude::*;
    let mk = |has_text: bool| leaf(1, RoleTag::Btn, if has_text { "match" } else { "" }, Bounds::new(0, 0, 10, 10));
    let leaf_strategy = any::<bool>().prop_map(mk);
    leaf_strategy.prop_recursive(3, 20, 4, |inner| {
      (any::<bool>(), prop::collection::vec(inner, 0..4)).prop_map(|(has_text, children)| {
        let mut node = leaf(1, RoleTag::Group, if has_text { "match" } else { "" }, Bounds::new(0, 0, 200, 200));
        node.children = children;
        node
      })
    })
  }

  proptest::proptest! {
    /// *Leaf-preference property* (spec §8): none of the elements
    /// `collect_leaf_matches` returns is an ancestor of another.
    #[test]
    fn leaf_preference_never_returns_an_ancestor_of_another_match(tree in arb_node()) {
      let matches = collect_leaf_matches(&tree, "match", false, &[]);
      for a in &matches {
        for b in &matches {
          if std::ptr::eq(*a, *b) {
            continue;
          }
          let b_is_descendant_of_a = a.preorder().any(|d| std::ptr::eq(d, *b));
          proptest::prop_assert!(!b_is_descendant_of_a, "one match is an ancestor of another");
        }
      }
    }
  }
}
