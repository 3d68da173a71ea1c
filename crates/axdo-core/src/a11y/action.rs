/*! Closed set of accessibility action tags an [`crate::model::Element`] may
expose (spec §3.1). */

use serde::{Deserialize, Serialize};

/// A single accessibility action an element can perform directly (i.e. not
/// via synthesized input), exposed through the `action` executor action
/// (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionTag {
  Press,
  Cancel,
  Pick,
  Increment,
  Decrement,
  Confirm,
  Showmenu,
  Raise,
  Scrolltovisible,
}

impl ActionTag {
  /// Parse the wire-format name used in `action` steps and result fields.
  pub fn parse(name: &str) -> Option<Self> {
    match name {
      "press" => Some(Self::Press),
      "cancel" => Some(Self::Cancel),
      "pick" => Some(Self::Pick),
      "increment" => Some(Self::Increment),
      "decrement" => Some(Self::Decrement),
      "confirm" => Some(Self::Confirm),
      "showmenu" => Some(Self::Showmenu),
      "raise" => Some(Self::Raise),
      "scrolltovisible" => Some(Self::Scrolltovisible),
      _ => None,
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      Self::Press => "press",
      Self::Cancel => "cancel",
      Self::Pick => "pick",
      Self::Increment => "increment",
      Self::Decrement => "decrement",
      Self::Confirm => "confirm",
      Self::Showmenu => "showmenu",
      Self::Raise => "raise",
      Self::Scrolltovisible => "scrolltovisible",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_roundtrips_through_name() {
    for tag in [
      ActionTag::Press,
      ActionTag::Cancel,
      ActionTag::Pick,
      ActionTag::Increment,
      ActionTag::Decrement,
      ActionTag::Confirm,
      ActionTag::Showmenu,
      ActionTag::Raise,
      ActionTag::Scrolltovisible,
    ] {
      assert_eq!(ActionTag::parse(tag.name()), Some(tag));
    }
  }

  #[test]
  fn unknown_name_is_none() {
    assert_eq!(ActionTag::parse("frobnicate"), None);
  }
}
