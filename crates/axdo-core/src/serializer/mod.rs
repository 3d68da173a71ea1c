/*!
Agent Serializer: compact textual rendering of a filtered element tree,
with smart defaults for web content (spec §4.6).

Built on the filter/prune primitives in [`crate::model`] (this module
composes them rather than re-implementing tree surgery) and on the same
resolve-then-apply shape `EngineConfigBuilder` (spec §4.2) uses for
deciding which of the caller's choices to keep and which to fill with a
default, here adapted from "fill missing config fields" to "fill missing
render choices and remember which ones were filled".
*/

mod agent;
mod structured;

use crate::a11y::{RoleFilterTag, RoleTag};
use crate::model::{has_web_content, prune_empty_groups, Element};
use crate::types::{ProcessId, WindowId};

/// Caller-chosen output shape (spec §4.6 "Format choice").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
  /// Compact, token-economical rendering for LLM consumption.
  Agent,
  /// Full, indented, human-readable rendering.
  Structured,
}

/// Identifies the scope a render covers, for the header line.
#[derive(Debug, Clone)]
pub struct RenderHeader {
  pub app: String,
  pub pid: Option<ProcessId>,
  pub window_title: String,
  pub window_id: Option<WindowId>,
}

/// Caller overrides. A `None` field gets a smart default applied unless
/// `raw` disables smart defaults entirely (spec §4.6).
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
  pub format: Option<RenderFormat>,
  pub prune: Option<bool>,
  pub roles: Option<Vec<RoleFilterTag>>,
  pub max_elements: Option<usize>,
  pub raw: bool,
}

/// Whether the caller's stdout is an interactive terminal. Detecting that
/// is a transport/CLI concern (spec §1 "out of scope"); the core only
/// consumes the answer to decide a default format.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
  pub stdout_is_interactive: bool,
}

/// A completed render: the text, the format actually used, and the smart
/// defaults that were applied to produce it (spec §4.6 `smart_defaults`
/// annotation).
#[derive(Debug, Clone)]
pub struct Rendered {
  pub text: String,
  pub format: RenderFormat,
  pub smart_defaults: Vec<&'static str>,
}

struct ResolvedOptions {
  format: RenderFormat,
  prune: bool,
  roles: Option<Vec<RoleFilterTag>>,
  max_elements: Option<usize>,
  applied: Vec<&'static str>,
}

fn resolve_options(tree: &Element, opts: &SerializeOptions, ctx: RenderContext) -> ResolvedOptions {
  let mut applied = Vec::new();
  let web = !opts.raw && has_web_content(tree);

  let format = opts.format.unwrap_or_else(|| {
    if opts.raw {
      return RenderFormat::Structured;
    }
    if ctx.stdout_is_interactive {
      RenderFormat::Structured
    } else {
      applied.push("format=agent (non-interactive stdout)");
      RenderFormat::Agent
    }
  });

  let prune = opts.prune.unwrap_or_else(|| {
    if web {
      applied.push("prune=true (web content detected)");
      true
    } else {
      false
    }
  });

  let roles = if web {
    opts.roles.clone().map(|mut rs| {
      let has_input = rs.iter().any(|r| matches!(r, RoleFilterTag::Concrete(RoleTag::Input)));
      let has_other = rs.iter().any(|r| matches!(r, RoleFilterTag::Concrete(RoleTag::Other)));
      if has_input && !has_other {
        applied.push("roles += other (web inputs often expose as other)");
        rs.push(RoleFilterTag::Concrete(RoleTag::Other));
      }
      rs
    })
  } else {
    opts.roles.clone()
  };

  let max_elements = opts.max_elements.or_else(|| {
    if web {
      applied.push("cap=200 (web content detected)");
      Some(200)
    } else {
      None
    }
  });

  ResolvedOptions {
    format,
    prune,
    roles,
    max_elements,
    applied,
  }
}

/// Render `tree` for `header`'s scope, applying `opts` and the smart
/// defaults `opts` leaves unset.
#[must_use]
pub fn render(tree: &Element, header: &RenderHeader, opts: &SerializeOptions, ctx: RenderContext) -> Rendered {
  let resolved = resolve_options(tree, opts, ctx);

  let mut working = tree.clone();
  if let Some(roles) = &resolved.roles {
    working = crate::model::filter_by_roles(&working, roles).unwrap_or_else(|| {
      let mut empty = working.clone();
      empty.children.clear();
      empty
    });
  }
  if resolved.prune {
    working = prune_empty_groups(&working);
  }

  let text = match resolved.format {
    RenderFormat::Agent => agent::render(&working, header, resolved.max_elements, &resolved.applied),
    RenderFormat::Structured => structured::render(&working, header, resolved.max_elements),
  };

  Rendered {
    text,
    format: resolved.format,
    smart_defaults: resolved.applied,
  }
}
