/*!
Resolver: turns a fuzzy descriptor into a single target element (spec
§4.3).

Searches a single freshly-read, already ref/id-stamped tree and narrows
candidates down a fixed disambiguation ladder, using the role vocabulary
in `a11y::role`.
*/

mod disambiguate;
mod near;
mod text;

use std::collections::HashMap;

use crate::a11y::RoleTag;
use crate::model::Element;
use crate::types::{CoreResult, ElementId, Point, Ref, ResolutionError, Scope};

pub use near::Direction;

/// Input to [`resolve`] (spec §4.3).
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
  pub scope: Scope,
  pub by_id: Option<ElementId>,
  pub by_ref: Option<Ref>,
  pub by_text: Option<String>,
  pub roles: Vec<RoleTag>,
  pub exact: bool,
  pub scope_id: Option<ElementId>,
  pub near: bool,
  pub direction: Option<Direction>,
}

/// Tunables the resolver needs from `EngineConfig`.
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
  pub near_radius: f64,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self { near_radius: 200.0 }
  }
}

/// Successful resolution output.
#[derive(Debug, Clone)]
pub struct ResolvedTarget<'a> {
  pub element: &'a Element,
  /// Set when the search was implicitly confined to a dialog/sheet/popover
  /// overlay (spec §4.3 "Overlay auto-scoping").
  pub auto_scoped: bool,
  /// Set only in `near` mode when no interactive element was found within
  /// the radius; a coordinate-based action should target this point
  /// instead of `element`'s bounds.
  pub near_point: Option<Point>,
}

const OVERLAY_SUBROLES: &[&str] = &["dialog", "sheet", "popover", "systemalert", "alert"];

fn is_overlay(e: &Element) -> bool {
  e.subrole
    .as_deref()
    .is_some_and(|s| OVERLAY_SUBROLES.contains(&s.to_lowercase().as_str()))
}

fn find_by_id<'a>(node: &'a Element, id: ElementId) -> Option<&'a Element> {
  if node.id == id {
    return Some(node);
  }
  node.children.iter().find_map(|c| find_by_id(c, id))
}

fn find_all_by_ref<'a>(node: &'a Element, want: &Ref) -> Vec<&'a Element> {
  let mut out = Vec::new();
  collect_by_ref(node, want, &mut out);
  out
}

fn collect_by_ref<'a>(node: &'a Element, want: &Ref, out: &mut Vec<&'a Element>) {
  if &node.r#ref == want {
    out.push(node);
  }
  for child in &node.children {
    collect_by_ref(child, want, out);
  }
}

/// Path (root-to-node, inclusive) of every element's id, used by the
/// focus-proximity disambiguation rung.
fn build_id_paths(node: &Element, prefix: &[ElementId], out: &mut HashMap<ElementId, Vec<ElementId>>) {
  let mut path = prefix.to_vec();
  path.push(node.id);
  out.insert(node.id, path.clone());
  for child in &node.children {
    build_id_paths(child, &path, out);
  }
}

fn deepest_focused<'a>(node: &'a Element, paths: &HashMap<ElementId, Vec<ElementId>>) -> Option<&'a Element> {
  let mut best: Option<&'a Element> = None;
  let mut best_depth = 0usize;
  for candidate in node.preorder() {
    if candidate.focused {
      let depth = paths.get(&candidate.id).map_or(0, Vec::len);
      if best.is_none() || depth > best_depth {
        best = Some(candidate);
        best_depth = depth;
      }
    }
  }
  best
}

/// Resolve `req` against `tree`.
pub fn resolve<'a>(tree: &'a Element, req: &ResolveRequest, config: &ResolverConfig) -> CoreResult<ResolvedTarget<'a>> {
  let (search_root, auto_scoped) = select_search_root(tree, req);

  let mut paths = HashMap::new();
  build_id_paths(tree, &[], &mut paths);
  let focused = deepest_focused(tree, &paths);
  let focused_path = focused.and_then(|f| paths.get(&f.id)).cloned();

  if let Some(want) = &req.by_ref {
    let matches = find_all_by_ref(search_root, want);
    if !matches.is_empty() {
      let resolved = disambiguate::run(matches, &paths, focused_path.as_deref(), focused, want.as_str())?;
      return finish(resolved, auto_scoped, req, config, tree, focused_path.as_deref());
    }
  }

  if let Some(id) = req.by_id {
    if let Some(found) = find_by_id(search_root, id) {
      return finish(found, auto_scoped, req, config, tree, focused_path.as_deref());
    }
  }

  if let Some(query) = &req.by_text {
    let resolved = text::resolve_text(search_root, query, req.exact, &req.roles, &paths, focused_path.as_deref(), focused)?;
    return finish(resolved, auto_scoped, req, config, tree, focused_path.as_deref());
  }

  Err(ResolutionError::NoTargetingSpecified.into())
}

fn select_search_root<'a>(tree: &'a Element, req: &ResolveRequest) -> (&'a Element, bool) {
  if let Some(scope_id) = req.scope_id {
    if let Some(found) = find_by_id(tree, scope_id) {
      return (found, false);
    }
  }
  if let Some(overlay) = tree.children.iter().find(|c| is_overlay(c)) {
    return (overlay, true);
  }
  (tree, false)
}

fn finish<'a>(
  element: &'a Element,
  auto_scoped: bool,
  req: &ResolveRequest,
  config: &ResolverConfig,
  full_tree: &'a Element,
  focused_path: Option<&[ElementId]>,
) -> CoreResult<ResolvedTarget<'a>> {
  if req.near {
    let (near_element, near_point) = near::resolve_near(full_tree, element, req.direction, config.near_radius);
    let _ = focused_path;
    return Ok(ResolvedTarget {
      element: near_element,
      auto_scoped,
      near_point,
    });
  }
  Ok(ResolvedTarget {
    element,
    auto_scoped,
    near_point: None,
  })
}
