//! Key-combo parsing (spec §4.4 "Type translation details").

const MODIFIER_NAMES: &[&str] = &["cmd", "command", "shift", "ctrl", "control", "alt", "opt", "option"];

/// A parsed `modifier+modifier+key` combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
  pub modifiers: Vec<String>,
  pub key: String,
}

/// Parse a combo string. Tokens are split on `+`; any token matching a
/// modifier name contributes a modifier, and exactly one token must name a
/// non-modifier key, or parsing fails.
pub fn parse_combo(spec: &str) -> Result<KeyCombo, String> {
  let mut modifiers = Vec::new();
  let mut key = None;

  for token in spec.split('+') {
    let token = token.trim();
    if token.is_empty() {
      return Err(format!("empty key token in combo {spec:?}"));
    }
    if MODIFIER_NAMES.contains(&token.to_lowercase().as_str()) {
      modifiers.push(token.to_lowercase());
      continue;
    }
    if key.is_some() {
      return Err(format!("combo {spec:?} names more than one non-modifier key"));
    }
    key = Some(token.to_string());
  }

  match key {
    Some(key) => Ok(KeyCombo { modifiers, key }),
    None => Err(format!("combo {spec:?} names no non-modifier key")),
  }
}

/// Flatten a combo back into the token list an `Inputter::key_combo` call
/// expects.
#[must_use]
pub fn to_tokens(combo: &KeyCombo) -> Vec<String> {
  let mut tokens = combo.modifiers.clone();
  tokens.push(combo.key.clone());
  tokens
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_modifier_plus_key() {
    let combo = parse_combo("cmd+shift+n").unwrap();
    assert_eq!(combo.modifiers, vec!["cmd", "shift"]);
    assert_eq!(combo.key, "n");
  }

  #[test]
  fn parses_bare_key() {
    let combo = parse_combo("escape").unwrap();
    assert!(combo.modifiers.is_empty());
    assert_eq!(combo.key, "escape");
  }

  #[test]
  fn rejects_two_non_modifier_keys() {
    assert!(parse_combo("a+b").is_err());
  }

  #[test]
  fn rejects_all_modifiers() {
    assert!(parse_combo("cmd+shift").is_err());
  }
}
