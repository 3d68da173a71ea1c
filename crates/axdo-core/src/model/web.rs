/*! Web-content detection (spec §4.1). */

use crate::a11y::RoleTag;
use crate::model::Element;

/// Returns true iff any subtree contains an element with role `web`.
pub fn has_web_content(tree: &Element) -> bool {
  tree.preorder().any(|e| e.role == RoleTag::Web)
}
