/*!
Executor: a dispatcher over the closed set of Action kinds (spec §4.4).

A tagged-enum request/dispatch shape: each `Action` variant resolves its
target then performs the corresponding platform call.
*/

pub mod calculator;
pub mod condition;
pub mod display;
pub mod keys;

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::a11y::{ActionTag, RoleTag};
use crate::cache::TreeCache;
use crate::config::EngineConfig;
use crate::model::{flatten, prune_empty_groups, ElementSnapshot, ElementSummary, FlatElement};
use crate::platform::{MouseButton, PlatformAdapter, WritableAttribute};
use crate::resolver::{resolve, ResolveRequest, ResolverConfig, ResolvedTarget};
use crate::types::{Bounds, CoreError, CoreResult, ElementId, Point, Ref, Scope};
use crate::verifier::{verify, Fallback, VerifyOptions, VerifyOutcome};

use condition::{Condition, PropertyChecks};

/// What an action resolves its target from.
#[derive(Debug, Clone)]
pub enum Target {
  Ref(Ref),
  Id(ElementId),
  Text {
    query: String,
    roles: Vec<RoleTag>,
    exact: bool,
  },
  Point(Point),
}

/// Request to verify the action's effect, with an action-appropriate
/// fallback chain name list (the Executor builds the actual closures).
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyRequest {
  pub enabled: bool,
  pub delay_ms: Option<u64>,
  pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollDirection {
  Up,
  Down,
  Left,
  Right,
}

#[derive(Debug, Clone)]
pub enum ClipboardSubcmd {
  Read,
  Write(String),
  Clear,
  /// Read the current selection into the clipboard and return it (a
  /// platform-specific combination of select-all + copy is out of scope;
  /// this simply reads whatever is already on the clipboard after the
  /// caller has triggered a copy via another action).
  Grab,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
  pub target: Target,
  pub value: String,
}

/// The closed set of action kinds (spec §4.4 table).
#[derive(Debug, Clone)]
pub enum Action {
  Click {
    target: Target,
    button: MouseButton,
    count: u8,
    verify: VerifyRequest,
    post_read: bool,
    display: bool,
  },
  Hover {
    target: Target,
  },
  Drag {
    from: Target,
    to: Target,
  },
  Type {
    target: Option<Target>,
    text: Option<String>,
    key_combo: Option<String>,
    select_all: bool,
    verify: VerifyRequest,
    display: bool,
  },
  Action {
    target: Target,
    action_name: String,
    verify: VerifyRequest,
    display: bool,
  },
  SetValue {
    target: Target,
    value: String,
    attribute: WritableAttribute,
    verify: VerifyRequest,
    display: bool,
  },
  Scroll {
    direction: ScrollDirection,
    amount: i32,
    target: Option<Target>,
  },
  Wait {
    condition: Condition,
    interval_ms: u64,
    timeout_s: u64,
  },
  Assert {
    condition: Condition,
    properties: PropertyChecks,
  },
  Focus {
    new_document: bool,
  },
  Read,
  Open {
    target: String,
  },
  Clipboard {
    subcmd: ClipboardSubcmd,
  },
  Fill {
    fields: Vec<FieldDescriptor>,
    submit: Option<Target>,
  },
  Sleep {
    ms: u64,
  },
}

/// Result of executing one action.
#[derive(Debug, Clone, Default)]
pub struct ActionResult {
  pub ok: bool,
  pub resolved: Option<ElementSummary>,
  pub auto_scoped: bool,
  pub verified: Option<bool>,
  pub fallback_used: Option<(&'static str, &'static str)>,
  pub post_read: Option<Vec<FlatElement>>,
  pub clipboard_text: Option<String>,
  /// Value-bearing static text elements near the action's target (spec
  /// §4.9), present only when the caller requested it.
  pub display: Option<Vec<FlatElement>>,
}

/// Executes one [`Action`] against a scope, resolving its target through
/// the Tree Cache and Resolver.
pub struct Executor<'a> {
  pub adapter: &'a dyn PlatformAdapter,
  pub cache: &'a TreeCache,
  pub config: EngineConfig,
}

impl<'a> Executor<'a> {
  #[must_use]
  pub fn new(adapter: &'a dyn PlatformAdapter, cache: &'a TreeCache, config: EngineConfig) -> Self {
    Self { adapter, cache, config }
  }

  fn resolver_config(&self) -> ResolverConfig {
    ResolverConfig {
      near_radius: self.config.near_radius,
    }
  }

  fn resolve_in<'b>(
    &self,
    tree: &'b crate::model::Element,
    scope: &Scope,
    target: &Target,
  ) -> CoreResult<Option<ResolvedTarget<'b>>> {
    match target {
      Target::Point(_) => Ok(None),
      Target::Ref(r) => {
        let req = ResolveRequest {
          scope: scope.clone(),
          by_ref: Some(r.clone()),
          ..Default::default()
        };
        Ok(Some(resolve(tree, &req, &self.resolver_config())?))
      }
      Target::Id(id) => {
        let req = ResolveRequest {
          scope: scope.clone(),
          by_id: Some(*id),
          ..Default::default()
        };
        Ok(Some(resolve(tree, &req, &self.resolver_config())?))
      }
      Target::Text { query, roles, exact } => {
        let req = ResolveRequest {
          scope: scope.clone(),
          by_text: Some(query.clone()),
          roles: roles.clone(),
          exact: *exact,
          ..Default::default()
        };
        Ok(Some(resolve(tree, &req, &self.resolver_config())?))
      }
    }
  }

  fn require_resolved<'b>(resolved: Option<ResolvedTarget<'b>>) -> CoreResult<ResolvedTarget<'b>> {
    resolved.ok_or_else(|| CoreError::Execution("this action needs an element target, not a raw point".into()))
  }

  fn invalidate(&self, scope: &Scope) {
    if let Some(app) = &scope.app {
      self.cache.invalidate(app);
    }
  }

  fn verify_opts(&self, req: VerifyRequest) -> VerifyOptions {
    VerifyOptions {
      delay_ms: req.delay_ms.unwrap_or_else(|| u64::try_from(self.config.verify_delay.as_millis()).unwrap_or(100)),
      max_retries: req.max_retries.unwrap_or(self.config.verify_max_retries),
    }
  }

  fn maybe_post_read(&self, scope: &Scope, post_read: bool) -> CoreResult<Option<Vec<FlatElement>>> {
    if !post_read {
      return Ok(None);
    }
    self.cache.invalidate_all();
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let pruned = prune_empty_groups(&tree);
    Ok(Some(flatten(&pruned)))
  }

  /// Display-element side read (spec §4.9), relative to `target_bounds`
  /// when the action resolved to an element.
  fn maybe_display_read(&self, scope: &Scope, target_bounds: Option<Bounds>, want: bool) -> CoreResult<Option<Vec<FlatElement>>> {
    if !want {
      return Ok(None);
    }
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    Ok(Some(display::display_elements(&tree, target_bounds, self.config.max_display_elements)))
  }

  /// Execute `action` against `scope`.
  pub fn execute(&self, scope: &Scope, action: &Action) -> CoreResult<ActionResult> {
    if scope.is_empty() && !matches!(action, Action::Sleep { .. }) {
      return Err(CoreError::ScopeMissing);
    }
    match action {
      Action::Click { target, button, count, verify: v, post_read, display } => self.click(scope, target, *button, *count, *v, *post_read, *display),
      Action::Hover { target } => self.hover(scope, target),
      Action::Drag { from, to } => self.drag(scope, from, to),
      Action::Type { target, text, key_combo, select_all, verify: v, display } => self.type_text(scope, target.as_ref(), text.as_deref(), key_combo.as_deref(), *select_all, *v, *display),
      Action::Action { target, action_name, verify: v, display } => self.perform_action(scope, target, action_name, *v, *display),
      Action::SetValue { target, value, attribute, verify: v, display } => self.set_value(scope, target, value, *attribute, *v, *display),
      Action::Scroll { direction, amount, target } => self.scroll(scope, *direction, *amount, target.as_ref()),
      Action::Wait { condition, interval_ms, timeout_s } => self.wait(scope, condition, *interval_ms, *timeout_s),
      Action::Assert { condition, properties } => self.assert(scope, condition, properties),
      Action::Focus { new_document } => self.focus(scope, *new_document),
      Action::Read => self.read(scope),
      Action::Open { target } => self.open(target),
      Action::Clipboard { subcmd } => self.clipboard(subcmd),
      Action::Fill { fields, submit } => self.fill(scope, fields, submit.as_ref()),
      Action::Sleep { ms } => self.sleep(*ms),
    }
  }

  fn resolve_point(&self, scope: &Scope, target: &Target) -> CoreResult<(Point, Option<ElementSummary>, bool, ElementId, Ref)> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    match target {
      Target::Point(p) => Ok((*p, None, false, ElementId(0), Ref(String::new()))),
      _ => {
        let resolved = Self::require_resolved(self.resolve_in(&tree, scope, target)?)?;
        let point = resolved.near_point.unwrap_or_else(|| resolved.element.bounds.center());
        Ok((
          point,
          Some(ElementSummary::from(resolved.element)),
          resolved.auto_scoped,
          resolved.element.id,
          resolved.element.r#ref.clone(),
        ))
      }
    }
  }

  fn click(&self, scope: &Scope, target: &Target, button: MouseButton, count: u8, v: VerifyRequest, post_read: bool, display: bool) -> CoreResult<ActionResult> {
    let (point, resolved, auto_scoped, id, r#ref) = self.resolve_point(scope, target)?;
    let pre = self.capture_pre(scope, id, &r#ref)?;
    let target_bounds = resolved.as_ref().map(|s| s.bounds);

    self.adapter.click(point.x, point.y, button, count)?;
    self.invalidate(scope);

    let (verified, fallback_used) = self.maybe_verify(scope, pre, v, id, point)?;
    let post = self.maybe_post_read(scope, post_read)?;
    let display = self.maybe_display_read(scope, target_bounds, display)?;

    Ok(ActionResult {
      ok: true,
      resolved,
      auto_scoped,
      verified,
      fallback_used,
      post_read: post,
      clipboard_text: None,
      display,
    })
  }

  fn hover(&self, scope: &Scope, target: &Target) -> CoreResult<ActionResult> {
    let (point, resolved, auto_scoped, ..) = self.resolve_point(scope, target)?;
    self.adapter.move_to(point.x, point.y)?;
    Ok(ActionResult {
      ok: true,
      resolved,
      auto_scoped,
      ..Default::default()
    })
  }

  fn drag(&self, scope: &Scope, from: &Target, to: &Target) -> CoreResult<ActionResult> {
    let (from_point, ..) = self.resolve_point(scope, from)?;
    let (to_point, resolved, auto_scoped, ..) = self.resolve_point(scope, to)?;
    self.adapter.drag(from_point, to_point)?;
    self.invalidate(scope);
    Ok(ActionResult {
      ok: true,
      resolved,
      auto_scoped,
      ..Default::default()
    })
  }

  fn type_text(
    &self,
    scope: &Scope,
    target: Option<&Target>,
    text: Option<&str>,
    key_combo: Option<&str>,
    select_all: bool,
    v: VerifyRequest,
    display: bool,
  ) -> CoreResult<ActionResult> {
    let mut resolved_summary = None;
    let mut auto_scoped = false;
    let mut pre: Option<(ElementId, Ref, ElementSnapshot)> = None;

    if let Some(target) = target {
      let (point, resolved, scoped, id, r#ref) = self.resolve_point(scope, target)?;
      resolved_summary = resolved;
      auto_scoped = scoped;
      self.adapter.click(point.x, point.y, MouseButton::Left, 1)?;
      if select_all {
        self.adapter.key_combo(&["cmd".to_string(), "a".to_string()])?;
      }
      if id != ElementId(0) {
        let snap = self.capture_pre(scope, id, &r#ref)?;
        pre = snap.map(|s| (id, r#ref, s));
      }
    }

    if let Some(calculator_text) = text.filter(|_| scope.app.as_deref() == Some(calculator::CALCULATOR_APP_NAME) && target.is_none()) {
      let tree = self.cache.get_or_read(self.adapter, scope)?;
      let titles = calculator::rewrite(calculator_text).map_err(CoreError::Execution)?;
      for title in titles {
        let req = ResolveRequest {
          scope: scope.clone(),
          by_text: Some(title.to_string()),
          exact: true,
          ..Default::default()
        };
        let resolved = resolve(&tree, &req, &self.resolver_config())?;
        self.adapter.perform(scope, resolved.element.id, ActionTag::Press.name())?;
      }
      self.invalidate(scope);
    } else if let Some(text) = text {
      self.adapter.type_text(text, 0)?;
      self.invalidate(scope);
    }

    if let Some(combo) = key_combo {
      let parsed = keys::parse_combo(combo).map_err(CoreError::Execution)?;
      self.adapter.key_combo(&keys::to_tokens(&parsed))?;
      self.invalidate(scope);
    }

    let (verified, fallback_used) = match pre {
      Some((id, _ref, snap)) if v.enabled => {
        let (ok, fb) = self.run_verify(scope, &snap, v, id)?;
        (Some(ok), fb)
      }
      _ => (None, None),
    };

    let target_bounds = resolved_summary.as_ref().map(|s: &ElementSummary| s.bounds);
    let display = self.maybe_display_read(scope, target_bounds, display)?;

    Ok(ActionResult {
      ok: true,
      resolved: resolved_summary,
      auto_scoped,
      verified,
      fallback_used,
      post_read: None,
      clipboard_text: None,
      display,
    })
  }

  fn perform_action(&self, scope: &Scope, target: &Target, action_name: &str, v: VerifyRequest, display: bool) -> CoreResult<ActionResult> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let resolved = Self::require_resolved(self.resolve_in(&tree, scope, target)?)?;
    let id = resolved.element.id;
    let pre = ElementSnapshot::capture(resolved.element);
    let summary = ElementSummary::from(resolved.element);
    let auto_scoped = resolved.auto_scoped;
    let target_bounds = summary.bounds;

    self.adapter.perform(scope, id, action_name)?;
    self.invalidate(scope);

    let (verified, fallback_used) = if v.enabled {
      let (ok, fb) = self.run_verify(scope, &pre, v, id)?;
      (Some(ok), fb)
    } else {
      (None, None)
    };
    let display = self.maybe_display_read(scope, Some(target_bounds), display)?;

    Ok(ActionResult {
      ok: true,
      resolved: Some(summary),
      auto_scoped,
      verified,
      fallback_used,
      post_read: None,
      clipboard_text: None,
      display,
    })
  }

  fn set_value(&self, scope: &Scope, target: &Target, value: &str, attribute: WritableAttribute, v: VerifyRequest, display: bool) -> CoreResult<ActionResult> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let resolved = Self::require_resolved(self.resolve_in(&tree, scope, target)?)?;
    let id = resolved.element.id;
    let pre = ElementSnapshot::capture(resolved.element);
    let summary = ElementSummary::from(resolved.element);
    let auto_scoped = resolved.auto_scoped;
    let target_bounds = summary.bounds;

    self.adapter.set(scope, id, attribute, value)?;
    self.invalidate(scope);

    let (verified, fallback_used) = if v.enabled {
      let (ok, fb) = self.run_verify(scope, &pre, v, id)?;
      (Some(ok), fb)
    } else {
      (None, None)
    };
    let display = self.maybe_display_read(scope, Some(target_bounds), display)?;

    Ok(ActionResult {
      ok: true,
      resolved: Some(summary),
      auto_scoped,
      verified,
      fallback_used,
      post_read: None,
      clipboard_text: None,
      display,
    })
  }

  fn scroll(&self, scope: &Scope, direction: ScrollDirection, amount: i32, target: Option<&Target>) -> CoreResult<ActionResult> {
    let (point, resolved, auto_scoped) = match target {
      Some(t) => {
        let (p, r, a, ..) = self.resolve_point(scope, t)?;
        (p, r, a)
      }
      None => (Point::new(0, 0), None, false),
    };
    let (dx, dy) = match direction {
      ScrollDirection::Up => (0, -amount),
      ScrollDirection::Down => (0, amount),
      ScrollDirection::Left => (-amount, 0),
      ScrollDirection::Right => (amount, 0),
    };
    self.adapter.scroll(point.x, point.y, dx, dy)?;
    self.invalidate(scope);
    Ok(ActionResult {
      ok: true,
      resolved,
      auto_scoped,
      ..Default::default()
    })
  }

  fn wait(&self, scope: &Scope, condition: &Condition, interval_ms: u64, timeout_s: u64) -> CoreResult<ActionResult> {
    let deadline = Instant::now() + Duration::from_secs(timeout_s);
    loop {
      self.cache.invalidate_all();
      let tree = self.cache.get_or_read(self.adapter, scope)?;
      if condition.is_satisfied(&tree) {
        return Ok(ActionResult { ok: true, ..Default::default() });
      }
      if Instant::now() >= deadline {
        let last_observed = flatten(&tree).iter().map(ElementSummary::from).collect();
        return Err(CoreError::WaitTimeout { last_observed: Some(last_observed) });
      }
      thread::sleep(Duration::from_millis(interval_ms));
    }
  }

  fn assert(&self, scope: &Scope, condition: &Condition, properties: &PropertyChecks) -> CoreResult<ActionResult> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let found = condition.find(&tree);
    let ok = if condition.gone {
      found.is_none()
    } else {
      found.is_some_and(|e| properties.holds(e))
    };
    Ok(ActionResult { ok, ..Default::default() })
  }

  fn focus(&self, scope: &Scope, new_document: bool) -> CoreResult<ActionResult> {
    self.adapter.focus(scope)?;
    if new_document {
      self.adapter.key_combo(&["escape".to_string()])?;
      self.adapter.key_combo(&["cmd".to_string(), "n".to_string()])?;
    }
    self.invalidate(scope);
    Ok(ActionResult { ok: true, ..Default::default() })
  }

  fn read(&self, scope: &Scope) -> CoreResult<ActionResult> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let pruned = prune_empty_groups(&tree);
    Ok(ActionResult {
      ok: true,
      post_read: Some(flatten(&pruned)),
      ..Default::default()
    })
  }

  fn open(&self, target: &str) -> CoreResult<ActionResult> {
    self.adapter.open(target)?;
    Ok(ActionResult { ok: true, ..Default::default() })
  }

  fn clipboard(&self, subcmd: &ClipboardSubcmd) -> CoreResult<ActionResult> {
    match subcmd {
      ClipboardSubcmd::Read | ClipboardSubcmd::Grab => {
        let text = self.adapter.get_text()?;
        Ok(ActionResult {
          ok: true,
          clipboard_text: Some(text),
          ..Default::default()
        })
      }
      ClipboardSubcmd::Write(text) => {
        self.adapter.set_text(text)?;
        Ok(ActionResult { ok: true, ..Default::default() })
      }
      ClipboardSubcmd::Clear => {
        self.adapter.clear()?;
        Ok(ActionResult { ok: true, ..Default::default() })
      }
    }
  }

  fn fill(&self, scope: &Scope, fields: &[FieldDescriptor], submit: Option<&Target>) -> CoreResult<ActionResult> {
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    for field in fields {
      let resolved = Self::require_resolved(self.resolve_in(&tree, scope, &field.target)?)?;
      match resolved.element.role {
        RoleTag::Chk => {
          self.adapter.set(scope, resolved.element.id, WritableAttribute::Selected, &field.value)?;
        }
        _ => {
          self.adapter.set(scope, resolved.element.id, WritableAttribute::Value, &field.value)?;
        }
      }
    }
    self.invalidate(scope);

    if let Some(submit_target) = submit {
      let fresh = self.cache.get_or_read(self.adapter, scope)?;
      let resolved = Self::require_resolved(self.resolve_in(&fresh, scope, submit_target)?)?;
      let point = resolved.near_point.unwrap_or_else(|| resolved.element.bounds.center());
      self.adapter.click(point.x, point.y, MouseButton::Left, 1)?;
      self.invalidate(scope);
    }

    Ok(ActionResult { ok: true, ..Default::default() })
  }

  fn sleep(&self, ms: u64) -> CoreResult<ActionResult> {
    thread::sleep(Duration::from_millis(ms));
    Ok(ActionResult { ok: true, ..Default::default() })
  }

  fn capture_pre(&self, scope: &Scope, id: ElementId, r#ref: &Ref) -> CoreResult<Option<ElementSnapshot>> {
    if id == ElementId(0) {
      return Ok(None);
    }
    let tree = self.cache.get_or_read(self.adapter, scope)?;
    let found = tree.preorder().find(|e| e.id == id || &e.r#ref == r#ref);
    Ok(found.map(ElementSnapshot::capture))
  }

  fn maybe_verify(
    &self,
    scope: &Scope,
    pre: Option<ElementSnapshot>,
    v: VerifyRequest,
    id: ElementId,
    fallback_point: Point,
  ) -> CoreResult<(Option<bool>, Option<(&'static str, &'static str)>)> {
    let Some(pre) = pre else {
      return Ok((None, None));
    };
    if !v.enabled {
      return Ok((None, None));
    }

    let options = self.verify_opts(v);
    let adapter = self.adapter;
    let press_fallback = Fallback {
      name: "press",
      run: Box::new(move || adapter.perform(scope, id, ActionTag::Press.name())),
    };
    let offset_fallback = Fallback {
      name: "offset-click",
      run: Box::new(move || adapter.click(fallback_point.x + 2, fallback_point.y + 2, MouseButton::Left, 1)),
    };
    let outcome: VerifyOutcome = verify(self.adapter, scope, &pre, options, &[press_fallback, offset_fallback])?;
    if !outcome.verified {
      warn!("verify: action on {id:?} produced no observable change after all fallbacks");
    }
    Ok((Some(outcome.verified), outcome.fallback_used))
  }

  fn run_verify(&self, scope: &Scope, pre: &ElementSnapshot, v: VerifyRequest, id: ElementId) -> CoreResult<(bool, Option<(&'static str, &'static str)>)> {
    let options = self.verify_opts(v);
    let adapter = self.adapter;
    let setter_fallback = Fallback {
      name: "set-value",
      run: Box::new(move || adapter.set(scope, id, WritableAttribute::Value, "")),
    };
    let outcome = verify(self.adapter, scope, pre, options, &[setter_fallback])?;
    debug!("verify outcome for {id:?}: verified={}", outcome.verified);
    Ok((outcome.verified, outcome.fallback_used))
  }
}
