/*! Empty-group pruning (spec §4.1). */

use crate::a11y::RoleTag;
use crate::model::{Element, FlatElement};

fn is_empty_group(e: &Element) -> bool {
  matches!(e.role, RoleTag::Group | RoleTag::Other) && !e.has_text()
}

/// Remove nodes with role `group`/`other` whose title/value/description are
/// all empty; their children are promoted to the removed node's parent,
/// preserving sibling order. Repeated to a fixed point.
pub fn prune_empty_groups(tree: &Element) -> Element {
  let mut current = tree.clone();
  loop {
    let next = prune_one_pass(&current);
    if next == current {
      return next;
    }
    current = next;
  }
}

fn prune_one_pass(node: &Element) -> Element {
  let mut pruned = node.clone();
  pruned.children = node
    .children
    .iter()
    .flat_map(|child| {
      let pruned_child = prune_one_pass(child);
      if is_empty_group(&pruned_child) {
        pruned_child.children
      } else {
        vec![pruned_child]
      }
    })
    .collect();
  pruned
}

/// The flat analogue: drop empty-group nodes from the flat list entirely
/// (the `path` field still captures the structure they occupied).
pub fn prune_empty_groups_flat(list: &[FlatElement]) -> Vec<FlatElement> {
  list
    .iter()
    .filter(|e| !(matches!(e.role, RoleTag::Group | RoleTag::Other) && e.title.is_empty() && e.value.is_empty() && e.description.is_empty()))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Bounds, ElementId, Ref};

  fn node(role: RoleTag, title: &str, children: Vec<Element>) -> Element {
    Element {
      id: ElementId(1),
      r#ref: Ref("r".into()),
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
      children,
    }
  }

  #[test]
  fn empty_group_is_collapsed_and_children_promoted() {
    let tree = node(
      RoleTag::Window,
      "w",
      vec![node(
        RoleTag::Group,
        "",
        vec![node(RoleTag::Btn, "ok", vec![])],
      )],
    );
    let pruned = prune_empty_groups(&tree);
    assert_eq!(pruned.children.len(), 1);
    assert_eq!(pruned.children[0].role, RoleTag::Btn);
  }

  #[test]
  fn nested_empty_groups_collapse_to_fixed_point() {
    let tree = node(
      RoleTag::Window,
      "w",
      vec![node(
        RoleTag::Group,
        "",
        vec![node(RoleTag::Other, "", vec![node(RoleTag::Btn, "ok", vec![])])],
      )],
    );
    let pruned = prune_empty_groups(&tree);
    assert_eq!(pruned.children.len(), 1);
    assert_eq!(pruned.children[0].role, RoleTag::Btn);
  }

  #[test]
  fn non_empty_group_survives() {
    let tree = node(RoleTag::Window, "w", vec![node(RoleTag::Group, "labelled", vec![])]);
    let pruned = prune_empty_groups(&tree);
    assert_eq!(pruned.children.len(), 1);
    assert_eq!(pruned.children[0].role, RoleTag::Group);
  }

  #[test]
  fn idempotent() {
    let tree = node(
      RoleTag::Window,
      "w",
      vec![node(RoleTag::Group, "", vec![node(RoleTag::Btn, "ok", vec![])])],
    );
    let once = prune_empty_groups(&tree);
    let twice = prune_empty_groups(&once);
    assert_eq!(once, twice);
  }

  #[test]
  fn entirely_empty_groups_prune_to_empty_tree() {
    let tree = node(RoleTag::Group, "", vec![node(RoleTag::Other, "", vec![])]);
    let pruned = prune_empty_groups(&tree);
    assert!(pruned.children.is_empty());
  }
}
