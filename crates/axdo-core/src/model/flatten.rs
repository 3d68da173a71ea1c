/*! Flattening and diffing (spec §4.1). */

use crate::a11y::RoleTag;
use crate::model::{Element, FlatElement};

/// Pre-order flatten. `id` order equals flat order (spec §8 read
/// determinism, assuming the tree already has ids assigned).
pub fn flatten(tree: &Element) -> Vec<FlatElement> {
  let mut out = Vec::new();
  flatten_rec(tree, &role_label(tree.role).to_string(), &mut out);
  out
}

/// Short label for a role, e.g. for path breadcrumbs and agent-format
/// rendering.
pub(crate) fn role_label(role: RoleTag) -> &'static str {
  match role {
    RoleTag::Btn => "btn",
    RoleTag::Input => "input",
    RoleTag::Txt => "txt",
    RoleTag::Lnk => "lnk",
    RoleTag::Chk => "chk",
    RoleTag::Group => "group",
    RoleTag::Other => "other",
    RoleTag::Web => "web",
    RoleTag::Window => "window",
    RoleTag::Toolbar => "toolbar",
    RoleTag::Cell => "cell",
    RoleTag::Row => "row",
    RoleTag::Tab => "tab",
    RoleTag::Menu => "menu",
    RoleTag::Combo => "combo",
    RoleTag::Slider => "slider",
    RoleTag::Stepper => "stepper",
    RoleTag::Heading => "heading",
    RoleTag::Static => "static",
  }
}

fn flatten_rec(node: &Element, path: &str, out: &mut Vec<FlatElement>) {
  out.push(FlatElement::from_element(node, path.to_string()));
  for child in &node.children {
    let child_path = format!("{path} > {}", role_label(child.role));
    flatten_rec(child, &child_path, out);
  }
}

/// A single diff record (spec §4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum DiffRecord {
  Added(FlatElement),
  Removed(FlatElement),
  Changed {
    before: FlatElement,
    after: FlatElement,
    fields: Vec<&'static str>,
  },
}

/// Fields that may be suppressed by the caller (spec §4.1: "a change to
/// `bounds` or `focused` can be suppressed").
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
  pub suppress_bounds: bool,
  pub suppress_focused: bool,
}

fn changed_fields(before: &FlatElement, after: &FlatElement, opts: DiffOptions) -> Vec<&'static str> {
  let mut fields = Vec::new();
  if before.title != after.title {
    fields.push("title");
  }
  if before.value != after.value {
    fields.push("value");
  }
  if before.description != after.description {
    fields.push("description");
  }
  if !opts.suppress_bounds && before.bounds != after.bounds {
    fields.push("bounds");
  }
  if !opts.suppress_focused && before.focused != after.focused {
    fields.push("focused");
  }
  if before.selected != after.selected {
    fields.push("selected");
  }
  if before.enabled != after.enabled {
    fields.push("enabled");
  }
  if before.child_count != after.child_count {
    fields.push("child_count");
  }
  fields
}

/// Diff two flat reads. Matches by `ref` primarily, falling back to `id`
/// when a ref is absent on either side (in practice refs are always
/// present; the fallback exists for degenerate/mock adapters).
pub fn diff(prev: &[FlatElement], curr: &[FlatElement], opts: DiffOptions) -> Vec<DiffRecord> {
  let mut records = Vec::new();
  let mut matched_curr = vec![false; curr.len()];

  for before in prev {
    let match_idx = curr
      .iter()
      .position(|c| c.r#ref == before.r#ref)
      .or_else(|| curr.iter().position(|c| c.id == before.id));

    match match_idx {
      Some(idx) => {
        #[allow(clippy::indexing_slicing)]
        {
          matched_curr[idx] = true;
        }
        #[allow(clippy::indexing_slicing)]
        let after = &curr[idx];
        let fields = changed_fields(before, after, opts);
        if !fields.is_empty() {
          records.push(DiffRecord::Changed {
            before: before.clone(),
            after: after.clone(),
            fields,
          });
        }
      }
      None => records.push(DiffRecord::Removed(before.clone())),
    }
  }

  for (idx, after) in curr.iter().enumerate() {
    #[allow(clippy::indexing_slicing)]
    if !matched_curr[idx] {
      records.push(DiffRecord::Added(after.clone()));
    }
  }

  records
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Bounds, ElementId, Ref};

  fn node(id: u32, role: RoleTag, title: &str, children: Vec<Element>) -> Element {
    Element {
      id: ElementId(id),
      r#ref: Ref(format!("r{id}")),
      role,
      subrole: None,
      title: title.into(),
      value: String::new(),
      description: String::new(),
      bounds: Bounds::new(0, 0, 10, 10),
      focused: false,
      selected: false,
      enabled: Some(true),
      actions: vec![],
      children,
    }
  }

  #[test]
  fn flatten_is_preorder() {
    let tree = node(
      1,
      RoleTag::Window,
      "w",
      vec![node(2, RoleTag::Btn, "a", vec![node(3, RoleTag::Txt, "b", vec![])])],
    );
    let flat = flatten(&tree);
    let ids: Vec<u32> = flat.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(flat[2].path, "window > btn > txt");
  }

  #[test]
  fn diff_detects_added_and_removed() {
    let before = node(1, RoleTag::Window, "w", vec![node(2, RoleTag::Btn, "a", vec![])]);
    let after = node(1, RoleTag::Window, "w", vec![node(3, RoleTag::Btn, "b", vec![])]);
    let records = diff(&flatten(&before), &flatten(&after), DiffOptions::default());
    assert!(records
      .iter()
      .any(|r| matches!(r, DiffRecord::Removed(e) if e.id.0 == 2)));
    assert!(records
      .iter()
      .any(|r| matches!(r, DiffRecord::Added(e) if e.id.0 == 3)));
  }

  #[test]
  fn diff_detects_value_change() {
    let before = node(1, RoleTag::Input, "label", vec![]);
    let mut after_root = before.clone();
    after_root.value = "new value".into();
    let records = diff(&flatten(&before), &flatten(&after_root), DiffOptions::default());
    assert_eq!(records.len(), 1);
    match &records[0] {
      DiffRecord::Changed { fields, .. } => assert_eq!(fields, &["value"]),
      other => panic!("expected Changed, got {other:?}"),
    }
  }

  #[test]
  fn diff_suppresses_bounds_and_focused_when_requested() {
    let before = node(1, RoleTag::Btn, "a", vec![]);
    let mut after = before.clone();
    after.bounds = Bounds::new(5, 5, 10, 10);
    after.focused = true;
    let opts = DiffOptions {
      suppress_bounds: true,
      suppress_focused: true,
    };
    let records = diff(&flatten(&before), &flatten(&after), opts);
    assert!(records.is_empty());
  }

  #[test]
  fn unchanged_elements_produce_no_records() {
    let tree = node(1, RoleTag::Window, "w", vec![]);
    let records = diff(&flatten(&tree), &flatten(&tree), DiffOptions::default());
    assert!(records.is_empty());
  }

  #[test]
  fn diff_roundtrip_reconstructs_flat_list() {
    let before = node(
      1,
      RoleTag::Window,
      "w",
      vec![node(2, RoleTag::Btn, "a", vec![])],
    );
    let after = node(
      1,
      RoleTag::Window,
      "w",
      vec![node(3, RoleTag::Btn, "b", vec![])],
    );
    let flat_before = flatten(&before);
    let flat_after = flatten(&after);
    let records = diff(&flat_before, &flat_after, DiffOptions::default());

    let mut reconstructed = flat_before.clone();
    for record in &records {
      match record {
        DiffRecord::Removed(e) => reconstructed.retain(|x| x.id != e.id),
        DiffRecord::Added(e) => reconstructed.push(e.clone()),
        DiffRecord::Changed { .. } => {}
      }
    }
    let mut got_ids: Vec<u32> = reconstructed.iter().map(|e| e.id.0).collect();
    let mut want_ids: Vec<u32> = flat_after.iter().map(|e| e.id.0).collect();
    got_ids.sort_unstable();
    want_ids.sort_unstable();
    assert_eq!(got_ids, want_ids);
  }
}
