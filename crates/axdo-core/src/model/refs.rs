/*!
Stable element ref generation (spec §3.3) and pre-order id assignment
(spec §3.1).

Both are applied to every tree the platform adapter hands back, before the
rest of the engine ever sees it — this is the one place that turns a raw
adapter read into a valid `Element` tree per the invariants in spec §3.1.
*/

use crate::a11y::RoleTag;
use crate::model::Element;
use crate::types::{ElementId, Ref};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

const REF_LEN: usize = 8;
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64, len: usize) -> String {
  let mut out = vec![0u8; len];
  for slot in out.iter_mut().rev() {
    let digit = (n % 36) as usize;
    #[allow(clippy::indexing_slicing)]
    {
      *slot = BASE36_DIGITS[digit];
    }
    n /= 36;
  }
  // Safety: BASE36_DIGITS is ASCII.
  String::from_utf8(out).unwrap_or_default()
}

/// Compute a short, deterministic ref from the stable-looking attribute set
/// in spec §3.3: `{role, non-empty title/description/value, path depth,
/// ordinal among same-role siblings}`.
fn compute_ref(role: RoleTag, text: &str, depth: usize, ordinal: usize) -> Ref {
  let mut hasher = DefaultHasher::new();
  role.hash(&mut hasher);
  text.hash(&mut hasher);
  depth.hash(&mut hasher);
  ordinal.hash(&mut hasher);
  Ref(to_base36(hasher.finish(), REF_LEN))
}

/// Assign refs to every element in the tree, including `root`. Two reads
/// of a structurally-identical tree produce identical refs for the "same"
/// logical element (spec §8 "Refs stable under identity").
pub fn assign_refs(root: &mut Element) {
  let text = root.primary_text().unwrap_or("").to_string();
  root.r#ref = compute_ref(root.role, &text, 0, 0);
  assign_child_refs(root, 1);
}

fn assign_child_refs(node: &mut Element, depth: usize) {
  let mut ordinals: HashMap<RoleTag, usize> = HashMap::new();
  for child in &mut node.children {
    let counter = ordinals.entry(child.role).or_insert(0);
    let ordinal = *counter;
    *counter += 1;
    let text = child.primary_text().unwrap_or("").to_string();
    child.r#ref = compute_ref(child.role, &text, depth, ordinal);
    assign_child_refs(child, depth + 1);
  }
}

/// Assign sequential 1-based ids in pre-order (spec §3.1 invariant:
/// `id` equals the element's 1-based position in a stable pre-order
/// traversal).
pub fn assign_ids(root: &mut Element) {
  let mut next = 1u32;
  assign_ids_rec(root, &mut next);
}

fn assign_ids_rec(node: &mut Element, next: &mut u32) {
  node.id = ElementId(*next);
  *next += 1;
  for child in &mut node.children {
    assign_ids_rec(child, next);
  }
}

/// Apply both id assignment and ref generation to a freshly-read tree.
pub fn finalize_read(root: &mut Element) {
  assign_ids(root);
  assign_refs(root);
}
