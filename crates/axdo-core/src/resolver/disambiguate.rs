//! The three-rung disambiguation ladder (spec §4.3 step e).

use std::collections::HashMap;

use crate::model::Element;
use crate::types::{Candidate, CoreResult, ElementId, ResolutionError};

fn common_prefix_len(a: &[ElementId], b: &[ElementId]) -> usize {
  a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn to_candidates(matches: &[&Element]) -> Vec<Candidate> {
  matches
    .iter()
    .map(|e| Candidate {
      id: e.id,
      role: e.role,
      title: e.title.clone(),
      description: e.description.clone(),
    })
    .collect()
}

/// Narrow `matches` to at most one element, running each rung only while
/// more than one candidate remains. Returns `Ambiguous` if more than one
/// survives, `NoMatch` if the input was empty.
pub fn run<'a>(
  mut matches: Vec<&'a Element>,
  paths: &HashMap<ElementId, Vec<ElementId>>,
  focused_path: Option<&[ElementId]>,
  focused: Option<&Element>,
  query: &str,
) -> CoreResult<&'a Element> {
  if matches.is_empty() {
    return Err(ResolutionError::NoMatch { query: query.to_string() }.into());
  }
  if matches.len() == 1 {
    #[allow(clippy::indexing_slicing)]
    return Ok(matches[0]);
  }

  // Rung 1: prefer interactive category.
  let interactive: Vec<&Element> = matches.iter().copied().filter(|e| e.role.is_interactive()).collect();
  if matches.len() > 1 && !interactive.is_empty() && interactive.len() < matches.len() {
    matches = interactive;
  }

  // Rung 2: focus proximity.
  if matches.len() > 1 {
    if let Some(focus_path) = focused_path {
      let depths: Vec<usize> = matches
        .iter()
        .map(|e| paths.get(&e.id).map_or(0, |p| common_prefix_len(p, focus_path)))
        .collect();
      if let Some(&max_depth) = depths.iter().max() {
        matches = matches
          .into_iter()
          .zip(depths)
          .filter(|(_, d)| *d == max_depth)
          .map(|(e, _)| e)
          .collect();
      }
    }
  }

  // Rung 3: pick-best-near (closest x to the focused element, tie on y,
  // then shallowest path, then lowest id).
  if matches.len() > 1 {
    if let Some(focus) = focused {
      let focus_x = focus.bounds.center().x;
      matches.sort_by_key(|e| {
        let center = e.bounds.center();
        let path_len = paths.get(&e.id).map_or(usize::MAX, Vec::len);
        ((center.x - focus_x).abs(), center.y, path_len, e.id.0)
      });
      let best = matches.first().copied();
      if let Some(best) = best {
        let best_center = best.bounds.center();
        let best_path_len = paths.get(&best.id).map_or(usize::MAX, Vec::len);
        matches.retain(|e| {
          let c = e.bounds.center();
          (c.x - focus_x).abs() == (best_center.x - focus_x).abs()
            && c.y == best_center.y
            && paths.get(&e.id).map_or(usize::MAX, Vec::len) == best_path_len
        });
      }
    }
  }

  match matches.len() {
    1 => {
      #[allow(clippy::indexing_slicing)]
      Ok(matches[0])
    }
    0 => Err(ResolutionError::NoMatch { query: query.to_string() }.into()),
    _ => Err(
      ResolutionError::Ambiguous {
        query: query.to_string(),
        candidates: to_candidates(&matches),
      }
      .into(),
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::RoleTag;
  use crate::types::{Bounds, Ref};

  fn leaf(id: u32, role: RoleTag) -> Element {
    Element {
      id: ElementId(id),
      r#ref: Ref(format!("r{id}")),
      role,
      subrole: None,
      title: "x".into(),
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
  fn mixed_set_resolves_to_the_single_interactive_member() {
    let btn = leaf(1, RoleTag::Btn);
    let txt = leaf(2, RoleTag::Txt);
    let resolved = run(vec![&btn, &txt], &HashMap::new(), None, None, "q").unwrap();
    assert_eq!(resolved.id, ElementId(1));
  }

  fn arb_roles() -> impl proptest::strategy::Strategy<Value = Vec<RoleTag>> {
    use proptest::prelude::*;
    prop::collection::vec(prop_oneof![Just(RoleTag::Btn), Just(RoleTag::Lnk), Just(RoleTag::Txt), Just(RoleTag::Heading)], 2..6)
  }

  proptest::proptest! {
    /// *Interactive preference* (spec §8): if a candidate set mixes
    /// interactive and static roles, every surviving candidate — whether
    /// `run` resolves outright or reports `Ambiguous` — is interactive.
    #[test]
    fn interactive_preference_drops_static_members_when_mixed(roles in arb_roles()) {
      let elements: Vec<Element> = roles.iter().enumerate().map(|(i, r)| leaf(i as u32 + 1, *r)).collect();
      let refs: Vec<&Element> = elements.iter().collect();
      let has_interactive = refs.iter().any(|e| e.role.is_interactive());
      let has_static = refs.iter().any(|e| !e.role.is_interactive());

      match run(refs, &HashMap::new(), None, None, "q") {
        Ok(winner) => {
          if has_interactive && has_static {
            proptest::prop_assert!(winner.role.is_interactive());
          }
        }
        Err(crate::types::CoreError::Resolution(ResolutionError::Ambiguous { candidates, .. })) => {
          if has_interactive && has_static {
            proptest::prop_assert!(candidates.iter().all(|c| c.role.is_interactive()));
          }
        }
        Err(other) => proptest::prop_assert!(false, "unexpected error: {other:?}"),
      }
    }
  }
}
