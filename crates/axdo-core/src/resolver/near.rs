//! Spatial "near" mode (spec §4.3 "Spatial near mode").

use crate::model::Element;
use crate::types::Point;

/// Half-plane constraint for a `near` search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Left,
  Right,
  Above,
  Below,
}

impl Direction {
  fn qualifies(self, from: Point, to: Point) -> bool {
    match self {
      Self::Left => to.x < from.x,
      Self::Right => to.x > from.x,
      Self::Above => to.y < from.y,
      Self::Below => to.y > from.y,
    }
  }

  fn offset(self, bounds: crate::types::Bounds, px: i32) -> Point {
    let center = bounds.center();
    match self {
      Self::Left => Point::new(bounds.x - px, center.y),
      Self::Right => Point::new(bounds.x + bounds.w + px, center.y),
      Self::Above => Point::new(center.x, bounds.y - px),
      Self::Below => Point::new(center.x, bounds.y + bounds.h + px),
    }
  }
}

const OFFSET_PX: i32 = 20;

/// Find the nearest interactive element to `matched` within `radius`
/// pixels, optionally constrained to a half-plane by `direction`. Falls
/// back to a synthesized offset point when nothing qualifies.
pub fn resolve_near<'a>(
  full_tree: &'a Element,
  matched: &'a Element,
  direction: Option<Direction>,
  radius: f64,
) -> (&'a Element, Option<Point>) {
  let origin = matched.bounds.center();

  let mut best: Option<(&Element, f64)> = None;
  for candidate in full_tree.preorder() {
    if candidate.id == matched.id || !candidate.role.is_interactive() || !candidate.bounds.is_visible() {
      continue;
    }
    let center = candidate.bounds.center();
    if let Some(dir) = direction {
      if !dir.qualifies(origin, center) {
        continue;
      }
    }
    let dist = origin.distance(center);
    if dist > radius {
      continue;
    }
    let better = match best {
      Some((_, best_dist)) => dist < best_dist,
      None => true,
    };
    if better {
      best = Some((candidate, dist));
    }
  }

  if let Some((element, _)) = best {
    return (element, None);
  }

  let side = direction.unwrap_or(Direction::Right);
  (matched, Some(side.offset(matched.bounds, OFFSET_PX)))
}
