//! Calculator mode: rewrites a typed character string into a sequence of
//! accessibility `press` actions when there is no text input to type into
//! (spec §4.4 "Calculator mode").

/// The host app name this mode activates for.
pub const CALCULATOR_APP_NAME: &str = "Calculator";

/// Map one character to the button title the Calculator app exposes for
/// it, or `None` if the character has no mapping.
#[must_use]
pub fn button_title_for_char(c: char) -> Option<&'static str> {
  match c {
    '0' => Some("0"),
    '1' => Some("1"),
    '2' => Some("2"),
    '3' => Some("3"),
    '4' => Some("4"),
    '5' => Some("5"),
    '6' => Some("6"),
    '7' => Some("7"),
    '8' => Some("8"),
    '9' => Some("9"),
    '+' => Some("Add"),
    '-' => Some("Subtract"),
    '*' => Some("Multiply"),
    '/' => Some("Divide"),
    '=' => Some("Equals"),
    '.' => Some("Point"),
    _ => None,
  }
}

/// Rewrite a typed string into the ordered list of button titles to press.
/// Fails if any character has no mapping.
pub fn rewrite(text: &str) -> Result<Vec<&'static str>, String> {
  text
    .chars()
    .map(|c| button_title_for_char(c).ok_or_else(|| format!("Calculator mode: no button mapped for {c:?}")))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rewrites_expression() {
    assert_eq!(rewrite("12+3=").unwrap(), vec!["1", "2", "Add", "3", "Equals"]);
  }

  #[test]
  fn unmapped_char_fails() {
    assert!(rewrite("1a").is_err());
  }
}
