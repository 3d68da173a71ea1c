//! Full, indented YAML-like rendering for interactive use (spec §4.6).

use crate::model::{role_label, Element};

use super::RenderHeader;

fn push_field(out: &mut String, indent: usize, key: &str, value: &str) {
  out.push_str(&"  ".repeat(indent));
  out.push_str(key);
  out.push_str(": ");
  out.push_str(value);
  out.push('\n');
}

fn render_node(node: &Element, indent: usize, budget: &mut Option<usize>, truncated: &mut bool, out: &mut String) {
  if !node.bounds.is_visible() {
    return;
  }
  if let Some(remaining) = budget {
    if *remaining == 0 {
      *truncated = true;
      return;
    }
    *remaining -= 1;
  }

  let pad = "  ".repeat(indent);
  out.push_str(&format!("{pad}- id: {}\n", node.id));
  push_field(out, indent + 1, "role", role_label(node.role));
  if !node.title.is_empty() {
    push_field(out, indent + 1, "title", &format!("{:?}", node.title));
  }
  if !node.value.is_empty() {
    push_field(out, indent + 1, "value", &format!("{:?}", node.value));
  }
  if !node.description.is_empty() {
    push_field(out, indent + 1, "description", &format!("{:?}", node.description));
  }
  let b = node.bounds;
  push_field(out, indent + 1, "bounds", &format!("[{}, {}, {}, {}]", b.x, b.y, b.w, b.h));
  if node.focused {
    push_field(out, indent + 1, "focused", "true");
  }
  if node.selected {
    push_field(out, indent + 1, "selected", "true");
  }
  if node.enabled == Some(false) {
    push_field(out, indent + 1, "enabled", "false");
  }
  if !node.actions.is_empty() {
    let names: Vec<&str> = node.actions.iter().map(|a| a.name()).collect();
    push_field(out, indent + 1, "actions", &format!("[{}]", names.join(", ")));
  }
  if !node.r#ref.as_str().is_empty() {
    push_field(out, indent + 1, "ref", node.r#ref.as_str());
  }

  if !node.children.is_empty() {
    out.push_str(&format!("{}  children:\n", pad));
    for child in &node.children {
      render_node(child, indent + 2, budget, truncated, out);
    }
  }
}

pub(super) fn render(tree: &Element, header: &RenderHeader, max_elements: Option<usize>) -> String {
  let mut out = String::new();
  out.push_str(&format!("app: {}\n", header.app));
  if let Some(pid) = header.pid {
    out.push_str(&format!("pid: {pid}\n"));
  }
  out.push_str(&format!("window: {}\n", header.window_title));
  if let Some(id) = header.window_id {
    out.push_str(&format!("window_id: {id}\n"));
  }
  out.push_str("tree:\n");

  let mut budget = max_elements;
  let mut truncated = false;
  render_node(tree, 1, &mut budget, &mut truncated, &mut out);

  if truncated {
    out.push_str(&format!("# truncated: showing at most {} elements\n", max_elements.unwrap_or(0)));
  }

  out
}
