//! Compact `[id] role "text" (x,y,w,h)` rendering (spec §4.6).

use crate::a11y::{ActionTag, RoleTag};
use crate::model::{role_label, Element};
use crate::types::ElementId;

use super::RenderHeader;

fn is_value_text(e: &Element) -> bool {
  e.role == RoleTag::Txt && !e.value.is_empty() && !e.actions.contains(&ActionTag::Press)
}

fn is_renderable(e: &Element) -> bool {
  e.bounds.is_visible() && (e.is_actionable() || is_value_text(e))
}

/// Title-or-value-or-description, in that order (spec §4.6; note this
/// differs from [`Element::primary_text`]'s title/description/value order,
/// which serves ref generation rather than display).
fn display_text(e: &Element) -> &str {
  if !e.title.is_empty() {
    &e.title
  } else if !e.value.is_empty() {
    &e.value
  } else {
    &e.description
  }
}

struct Entry<'a> {
  element: &'a Element,
  group: usize,
}

fn collect<'a>(tree: &'a Element, out: &mut Vec<Entry<'a>>) {
  let mut next_group = 0usize;
  if is_renderable(tree) {
    out.push(Entry { element: tree, group: 0 });
    next_group = 1;
  }
  for child in &tree.children {
    walk(child, next_group, out);
    next_group += 1;
  }
}

fn walk<'a>(node: &'a Element, group: usize, out: &mut Vec<Entry<'a>>) {
  if is_renderable(node) {
    out.push(Entry { element: node, group });
  }
  for child in &node.children {
    walk(child, group, out);
  }
}

/// The tallest value-bearing static text element, when at least two such
/// elements are present (spec §4.6 "primary").
fn primary_id(entries: &[Entry<'_>]) -> Option<ElementId> {
  let mut candidates: Vec<&Element> = entries.iter().map(|e| e.element).filter(|e| is_value_text(e)).collect();
  if candidates.len() < 2 {
    return None;
  }
  candidates.sort_by_key(|e| (e.bounds.h, e.id.0));
  candidates.last().map(|e| e.id)
}

pub(super) fn render(tree: &Element, header: &RenderHeader, max_elements: Option<usize>, smart_defaults: &[&'static str]) -> String {
  let mut entries = Vec::new();
  collect(tree, &mut entries);

  let total = entries.len();
  let truncated = max_elements.is_some_and(|cap| total > cap);
  if let Some(cap) = max_elements {
    entries.truncate(cap);
  }

  let primary = primary_id(&entries);

  let mut out = String::new();
  out.push_str(&format!("app={} pid={} window={}\n", header.app, header.pid.map_or_else(|| "?".into(), |p| p.0.to_string()), header.window_title));
  if !smart_defaults.is_empty() {
    out.push_str(&format!("# smart_defaults: {}\n", smart_defaults.join(", ")));
  }

  let mut last_group: Option<usize> = None;
  for entry in &entries {
    if last_group.is_some_and(|g| g != entry.group) {
      out.push('\n');
    }
    last_group = Some(entry.group);

    let e = entry.element;
    let b = e.bounds;
    out.push_str(&format!("[{}] {} \"{}\" ({},{},{},{})", e.id, role_label(e.role), display_text(e), b.x, b.y, b.w, b.h));
    if primary == Some(e.id) {
      out.push_str(" primary");
    }
    if !e.r#ref.as_str().is_empty() {
      out.push_str(&format!(" ref={}", e.r#ref.as_str()));
    }
    out.push('\n');
  }

  if truncated {
    out.push_str(&format!("# truncated: {} of {total} elements shown\n", max_elements.unwrap_or(0)));
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Bounds, Ref};

  fn elem(id: u32, role: RoleTag, title: &str, value: &str, h: i32, actions: Vec<ActionTag>) -> Element {
    Element {
      id: ElementId(id),
      r#ref: Ref(format!("r{id}")),
      role,
      subrole: None,
      title: title.into(),
      value: value.into(),
      description: String::new(),
      bounds: Bounds::new(0, 0, 50, h),
      focused: false,
      selected: false,
      enabled: Some(true),
      actions,
      children: vec![],
    }
  }

  fn header() -> RenderHeader {
    RenderHeader {
      app: "Calculator".into(),
      pid: Some(crate::types::ProcessId(7)),
      window_title: "Calculator".into(),
      window_id: None,
    }
  }

  #[test]
  fn renders_actionable_and_value_text_only() {
    let mut tree = elem(1, RoleTag::Window, "", "", 400, vec![]);
    tree.children = vec![
      elem(2, RoleTag::Btn, "Add", "", 24, vec![ActionTag::Press]),
      elem(3, RoleTag::Group, "", "", 10, vec![]),
      elem(4, RoleTag::Txt, "", "7", 20, vec![]),
    ];
    let out = render(&tree, &header(), None, &[]);
    assert!(out.contains("[2] btn \"Add\""));
    assert!(out.contains("[4] txt \"7\""));
    assert!(!out.contains("[3]"));
  }

  #[test]
  fn tallest_value_text_is_marked_primary() {
    let mut tree = elem(1, RoleTag::Window, "", "", 400, vec![]);
    tree.children = vec![elem(2, RoleTag::Txt, "", "7", 20, vec![]), elem(3, RoleTag::Txt, "", "result: 7", 40, vec![])];
    let out = render(&tree, &header(), None, &[]);
    let result_line = out.lines().find(|l| l.contains("result: 7")).unwrap();
    assert!(result_line.contains("primary"));
    let small_line = out.lines().find(|l| l.starts_with("[2]")).unwrap();
    assert!(!small_line.contains("primary"));
  }

  #[test]
  fn single_value_text_is_never_marked_primary() {
    let mut tree = elem(1, RoleTag::Window, "", "", 400, vec![]);
    tree.children = vec![elem(2, RoleTag::Txt, "", "only", 20, vec![])];
    let out = render(&tree, &header(), None, &[]);
    assert!(!out.contains("primary"));
  }

  #[test]
  fn cap_truncates_and_annotates() {
    let mut tree = elem(1, RoleTag::Window, "", "", 400, vec![]);
    tree.children = (2..6).map(|id| elem(id, RoleTag::Btn, "x", "", 10, vec![ActionTag::Press])).collect();
    let out = render(&tree, &header(), Some(2), &[]);
    assert_eq!(out.lines().filter(|l| l.starts_with('[')).count(), 2);
    assert!(out.contains("truncated"));
  }

  #[test]
  fn invisible_elements_are_skipped() {
    let mut tree = elem(1, RoleTag::Window, "", "", 400, vec![]);
    let mut hidden = elem(2, RoleTag::Btn, "ghost", "", 0, vec![ActionTag::Press]);
    hidden.bounds = Bounds::new(0, 0, 0, 0);
    tree.children = vec![hidden];
    let out = render(&tree, &header(), None, &[]);
    assert!(!out.contains("ghost"));
  }
}
