//! Property tests for the Element Model's universal invariants (spec §8):
//! an arbitrary-tree strategy feeding a `proptest!` block per invariant.

use proptest::prelude::*;

use crate::a11y::RoleTag;
use crate::types::{Bounds, ElementId, Ref};

use super::{diff, flatten, prune_empty_groups, Element};

const ROLES: &[RoleTag] = &[
  RoleTag::Btn,
  RoleTag::Input,
  RoleTag::Txt,
  RoleTag::Group,
  RoleTag::Other,
];

fn leaf(role: RoleTag, title: String, w: i32, h: i32) -> Element {
  Element {
    id: ElementId(0),
    r#ref: Ref(String::new()),
    role,
    subrole: None,
    title,
    value: String::new(),
    description: String::new(),
    bounds: Bounds::new(0, 0, w, h),
    focused: false,
    selected: false,
    enabled: Some(true),
    actions: vec![],
    children: vec![],
  }
}

fn arb_role() -> impl Strategy<Value = RoleTag> {
  (0..ROLES.len()).prop_map(|i| ROLES[i])
}

/// Bounded-depth arbitrary tree: a handful of leaves, some grouped under
/// intermediate nodes, some with empty text (exercising pruning) and some
/// with zero-area bounds (exercising the visibility filter).
fn arb_tree() -> impl Strategy<Value = Element> {
  let leaf_strategy = (arb_role(), "[a-zA-Z0-9 ]{0,8}", 0i32..50, 0i32..50).prop_map(|(role, title, w, h)| leaf(role, title, w, h));

  leaf_strategy.prop_recursive(4, 64, 8, |inner| {
    (arb_role(), "[a-zA-Z0-9 ]{0,8}", prop::collection::vec(inner, 0..6)).prop_map(|(role, title, children)| {
      let mut node = leaf(role, title, 100, 100);
      node.children = children;
      node
    })
  })
}

fn arb_window() -> impl Strategy<Value = Element> {
  prop::collection::vec(arb_tree(), 0..8).prop_map(|children| {
    let mut tree = leaf(RoleTag::Window, "Window".into(), 800, 600);
    tree.children = children;
    super::finalize_read(&mut tree);
    tree
  })
}

proptest! {
  /// *Read determinism* (spec §8): flattened ids equal 1-based pre-order
  /// position, for any tree shape.
  #[test]
  fn read_determinism(tree in arb_window()) {
    let flat = flatten(&tree);
    for (i, e) in flat.iter().enumerate() {
      prop_assert_eq!(e.id.0 as usize, i + 1);
    }
  }

  /// *Prune idempotence* (spec §8): `prune(prune(t)) == prune(t)`.
  #[test]
  fn prune_idempotence(tree in arb_window()) {
    let once = prune_empty_groups(&tree);
    let twice = prune_empty_groups(&once);
    prop_assert_eq!(once, twice);
  }

  /// *Pruning preserves non-empty nodes* (spec §8): nothing with text, and
  /// nothing outside `{group, other}`, is ever removed by pruning.
  #[test]
  fn prune_preserves_non_empty_and_non_groupish(tree in arb_window()) {
    let before = flatten(&tree);
    let after_roots = flatten(&prune_empty_groups(&tree));
    let survives = |e: &super::FlatElement| -> bool {
      after_roots.iter().any(|a| a.r#ref == e.r#ref)
    };
    for e in &before {
      let has_text = !e.title.is_empty() || !e.value.is_empty() || !e.description.is_empty();
      let groupish = matches!(e.role, RoleTag::Group | RoleTag::Other);
      if has_text || !groupish {
        prop_assert!(survives(e), "non-prunable element {:?} disappeared", e.r#ref);
      }
    }
  }

  /// *Visibility filter* (spec §8): no element surviving `filter_visible`
  /// has zero width or zero height.
  #[test]
  fn visibility_filter_drops_zero_area(tree in arb_window()) {
    let flat = flatten(&tree);
    let visible = super::filter_visible(&flat);
    for e in &visible {
      prop_assert!(e.bounds.w > 0 && e.bounds.h > 0);
    }
  }

  /// *Diff round-trip* (spec §8): re-diffing a tree against itself yields
  /// no added/removed/changed records.
  #[test]
  fn diff_against_self_is_empty(tree in arb_window()) {
    let flat = flatten(&tree);
    let records = diff(&flat, &flat, super::DiffOptions::default());
    prop_assert!(records.is_empty());
  }
}
