//! Display-element side read: a short list of value-bearing static text
//! elements an agent can read without another round trip (spec §4.9).

use crate::a11y::{ActionTag, RoleTag};
use crate::model::{filter_visible, flatten, Element, FlatElement};
use crate::types::{Bounds, Point};

fn is_value_text(e: &FlatElement) -> bool {
  e.role == RoleTag::Txt && !e.value.is_empty() && !e.actions.contains(&ActionTag::Press)
}

/// Value-bearing static text elements from `tree`, sorted by primary flag
/// first (tallest such element) then by distance from `target` (when
/// given), capped at `cap`.
#[must_use]
pub fn display_elements(tree: &Element, target: Option<Bounds>, cap: usize) -> Vec<FlatElement> {
  let mut candidates: Vec<FlatElement> = filter_visible(&flatten(tree)).into_iter().filter(is_value_text).collect();

  let primary_id = candidates.iter().max_by_key(|e| e.bounds.h).filter(|_| candidates.len() > 1).map(|e| e.id);

  let reference: Point = target.map_or(Point::new(0, 0), |b| b.center());

  candidates.sort_by(|a, b| {
    let a_primary = primary_id == Some(a.id);
    let b_primary = primary_id == Some(b.id);
    b_primary.cmp(&a_primary).then_with(|| {
      let da = a.bounds.center().distance(reference);
      let db = b.bounds.center().distance(reference);
      da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
  });

  candidates.truncate(cap);
  candidates
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::RoleTag;
  use crate::types::{ElementId, Ref};

  fn elem(id: u32, value: &str, x: i32, h: i32) -> Element {
    Element {
      id: ElementId(id),
      r#ref: Ref(format!("r{id}")),
      role: RoleTag::Txt,
      subrole: None,
      title: String::new(),
      value: value.into(),
      description: String::new(),
      bounds: Bounds::new(x, 0, 50, h),
      focused: false,
      selected: false,
      enabled: Some(true),
      actions: vec![],
      children: vec![],
    }
  }

  #[test]
  fn sorts_primary_first_then_by_distance() {
    let mut root = elem(1, "", 0, 10);
    root.children = vec![elem(2, "7", 100, 20), elem(3, "result: 7", 10, 40), elem(4, "2", 5, 20)];
    let out = display_elements(&root, Some(Bounds::new(5, 0, 1, 1)), 10);
    assert_eq!(out[0].id.0, 3, "tallest element is primary and sorts first regardless of distance");
    assert_eq!(out[1].id.0, 4, "remaining elements sort by distance to target");
  }

  #[test]
  fn caps_at_limit() {
    let mut root = elem(1, "", 0, 10);
    root.children = (2..10).map(|id| elem(id, "x", i32::from(id) * 10, 10)).collect();
    let out = display_elements(&root, None, 3);
    assert_eq!(out.len(), 3);
  }

  #[test]
  fn single_candidate_is_not_marked_primary_but_still_included() {
    let mut root = elem(1, "", 0, 10);
    root.children = vec![elem(2, "only", 0, 20)];
    let out = display_elements(&root, None, 10);
    assert_eq!(out.len(), 1);
  }
}
