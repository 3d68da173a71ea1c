/*!
Closed role-tag vocabulary (spec §3.1) and meta-role expansion (spec §4.1).

Native platform role strings are mapped to this closed set by the
(out-of-scope) platform adapter; unmapped roles collapse to [`RoleTag::Other`].
*/

use serde::{Deserialize, Serialize};

/// Short tag from the closed role set, stored on every [`crate::model::Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoleTag {
  Btn,
  Input,
  Txt,
  Lnk,
  Chk,
  Group,
  #[default]
  Other,
  Web,
  Window,
  Toolbar,
  Cell,
  Row,
  Tab,
  Menu,
  Combo,
  Slider,
  Stepper,
  Heading,
  Static,
}

/// A filter input that expands to a set of concrete [`RoleTag`]s before
/// matching. Meta-roles are valid only in filter inputs — never stored on
/// an `Element` (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFilterTag {
  Concrete(RoleTag),
  /// `interactive` meta-role.
  Interactive,
  /// `text` meta-role.
  Text,
}

/// Concrete roles that `interactive` expands to.
pub const INTERACTIVE_ROLES: &[RoleTag] = &[
  RoleTag::Btn,
  RoleTag::Lnk,
  RoleTag::Input,
  RoleTag::Chk,
  RoleTag::Tab,
  RoleTag::Menu,
  RoleTag::Combo,
  RoleTag::Slider,
  RoleTag::Stepper,
];

/// Concrete roles that `text` expands to.
pub const TEXT_ROLES: &[RoleTag] = &[RoleTag::Txt, RoleTag::Heading, RoleTag::Static];

impl RoleFilterTag {
  /// Expand a meta-role (or pass through a concrete role) into the set of
  /// concrete [`RoleTag`]s it matches.
  pub fn expand(self) -> Vec<RoleTag> {
    match self {
      Self::Concrete(r) => vec![r],
      Self::Interactive => INTERACTIVE_ROLES.to_vec(),
      Self::Text => TEXT_ROLES.to_vec(),
    }
  }
}

/// Expand a list of filter tags (roles and/or meta-roles) into a
/// deduplicated list of concrete [`RoleTag`]s.
pub fn expand_roles(tags: &[RoleFilterTag]) -> Vec<RoleTag> {
  let mut out = Vec::new();
  for tag in tags {
    for role in tag.expand() {
      if !out.contains(&role) {
        out.push(role);
      }
    }
  }
  out
}

impl RoleTag {
  /// Is this role in the `interactive` meta-role's expansion?
  pub fn is_interactive(self) -> bool {
    INTERACTIVE_ROLES.contains(&self)
  }
}
