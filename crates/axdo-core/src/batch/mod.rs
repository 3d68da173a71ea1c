/*!
Batch Runtime: sequential/conditional step execution over the Executor
(spec §4.7).

Follows the "parse into a closed sum type early, dispatch on the tag"
design note (spec §9): a step sequence with nested control steps and
per-step result aggregation, parsed once up front rather than re-parsed
per step.
*/

pub mod control;
pub mod parse;

use log::warn;

use crate::cache::TreeCache;
use crate::config::EngineConfig;
use crate::executor::{Action, ActionResult, Executor};
use crate::model::FlatElement;
use crate::platform::PlatformAdapter;
use crate::types::{Bounds, Scope};

use control::{IfExists, IfFocused};

/// One step in a batch program, after parsing (spec §4.7, §6.2).
#[derive(Debug, Clone)]
pub enum Step {
  /// A single action, with its own scope overrides (falling back to the
  /// batch's defaults for anything unset).
  Regular { action: Action, scope: Scope },
  IfExists {
    branch: IfExists,
    then_steps: Vec<Step>,
    else_steps: Vec<Step>,
  },
  IfFocused {
    branch: IfFocused,
    then_steps: Vec<Step>,
    else_steps: Vec<Step>,
  },
  /// Failures inside do not propagate to the surrounding batch (spec
  /// §4.7); the block itself always reports success.
  Try { steps: Vec<Step> },
}

/// Result of one step, 1-based within its own list (spec §4.7 "Numbering").
#[derive(Debug, Clone)]
pub struct StepResult {
  pub step: usize,
  pub ok: bool,
  pub label: &'static str,
  pub result: Option<ActionResult>,
  pub error: Option<String>,
  /// Nested results for control steps; `None` for regular steps.
  pub substeps: Option<Vec<StepResult>>,
}

/// Final aggregated outcome of a batch (spec §4.7 "Result aggregation").
#[derive(Debug, Clone)]
pub struct BatchResult {
  pub ok: bool,
  pub total_steps: usize,
  pub completed: usize,
  pub results: Vec<StepResult>,
  pub error_summary: Option<String>,
  /// Proximity-sorted value-bearing text from the last-used app (spec
  /// §4.8/§4.9), present only if at least one step touched an app.
  pub display: Option<Vec<FlatElement>>,
}

/// Execution state threaded through a batch run (spec §4.7 "Execution
/// state").
struct DoContext<'a> {
  adapter: &'a dyn PlatformAdapter,
  cache: &'a TreeCache,
  config: EngineConfig,
  defaults: Scope,
  stop_on_error: bool,
  has_failure: bool,
  stopped: bool,
  last_used_app: Option<String>,
  last_target_bounds: Option<Bounds>,
}

fn label_for(action: &Action) -> &'static str {
  match action {
    Action::Click { .. } => "click",
    Action::Hover { .. } => "hover",
    Action::Drag { .. } => "drag",
    Action::Type { .. } => "type",
    Action::Action { .. } => "action",
    Action::SetValue { .. } => "set-value",
    Action::Scroll { .. } => "scroll",
    Action::Wait { .. } => "wait",
    Action::Assert { .. } => "assert",
    Action::Focus { .. } => "focus",
    Action::Read => "read",
    Action::Open { .. } => "open",
    Action::Clipboard { .. } => "clipboard",
    Action::Fill { .. } => "fill",
    Action::Sleep { .. } => "sleep",
  }
}

fn run_regular(ctx: &mut DoContext<'_>, n: usize, action: &Action, scope: &Scope) -> StepResult {
  let merged = scope.clone().merged_with_defaults(&ctx.defaults);
  if let Some(app) = &merged.app {
    ctx.last_used_app = Some(app.clone());
  }

  let exec = Executor::new(ctx.adapter, ctx.cache, ctx.config);
  match exec.execute(&merged, action) {
    Ok(result) => {
      if let Some(resolved) = &result.resolved {
        ctx.last_target_bounds = Some(resolved.bounds);
      }
      StepResult {
        step: n,
        ok: result.ok,
        label: label_for(action),
        result: Some(result),
        error: None,
        substeps: None,
      }
    }
    Err(err) => StepResult {
      step: n,
      ok: false,
      label: label_for(action),
      result: None,
      error: Some(err.to_string()),
      substeps: None,
    },
  }
}

/// Run one step-list, stopping the *current* list at the first failure
/// (both top-level stop-on-error and a `try` block's own termination rule
/// share this behavior). `propagate` controls whether a failure also
/// flips `ctx.has_failure`/`ctx.stopped`, which is what makes `try`
/// isolate its substeps' failures from the surrounding batch.
fn run_list(ctx: &mut DoContext<'_>, steps: &[Step], propagate: bool) -> Vec<StepResult> {
  let mut out = Vec::with_capacity(steps.len());
  let mut local_stopped = false;

  for (i, step) in steps.iter().enumerate() {
    if local_stopped || (propagate && ctx.stopped) {
      break;
    }
    let n = i + 1;
    let result = run_step(ctx, step, n, propagate);
    if !result.ok {
      local_stopped = true;
      if propagate && ctx.stop_on_error {
        ctx.has_failure = true;
        ctx.stopped = true;
      }
    }
    out.push(result);
  }
  out
}

fn branch_tree(ctx: &DoContext<'_>) -> Option<std::sync::Arc<crate::model::Element>> {
  ctx.cache.get_or_read(ctx.adapter, &ctx.defaults).ok()
}

fn run_step(ctx: &mut DoContext<'_>, step: &Step, n: usize, propagate: bool) -> StepResult {
  match step {
    Step::Regular { action, scope } => run_regular(ctx, n, action, scope),
    Step::IfExists { branch, then_steps, else_steps } => {
      let taken = branch_tree(ctx).is_some_and(|tree| branch.is_satisfied(&tree));
      let substeps = run_list(ctx, if taken { then_steps } else { else_steps }, propagate);
      StepResult {
        step: n,
        ok: true,
        label: "if-exists",
        result: None,
        error: None,
        substeps: Some(substeps),
      }
    }
    Step::IfFocused { branch, then_steps, else_steps } => {
      let taken = branch_tree(ctx).is_some_and(|tree| branch.is_satisfied(&tree));
      let substeps = run_list(ctx, if taken { then_steps } else { else_steps }, propagate);
      StepResult {
        step: n,
        ok: true,
        label: "if-focused",
        result: None,
        error: None,
        substeps: Some(substeps),
      }
    }
    Step::Try { steps } => {
      let substeps = run_list(ctx, steps, false);
      StepResult {
        step: n,
        ok: true,
        label: "try",
        result: None,
        error: None,
        substeps: Some(substeps),
      }
    }
  }
}

fn last_error(results: &[StepResult]) -> Option<String> {
  for r in results.iter().rev() {
    if let Some(e) = &r.error {
      return Some(e.clone());
    }
    if let Some(substeps) = &r.substeps {
      if let Some(e) = last_error(substeps) {
        return Some(e);
      }
    }
  }
  None
}

/// Run a full batch program against `defaults` (spec §4.7).
pub fn run_batch(adapter: &dyn PlatformAdapter, cache: &TreeCache, config: EngineConfig, defaults: Scope, stop_on_error: bool, steps: &[Step]) -> BatchResult {
  let mut ctx = DoContext {
    adapter,
    cache,
    config,
    defaults,
    stop_on_error,
    has_failure: false,
    stopped: false,
    last_used_app: None,
    last_target_bounds: None,
  };

  let results = run_list(&mut ctx, steps, true);
  let completed = results.iter().filter(|r| r.ok).count();

  if ctx.has_failure {
    warn!("batch stopped after a failing step; {completed}/{} steps completed", steps.len());
  }

  let error_summary = if ctx.has_failure { last_error(&results) } else { None };

  let display = ctx.last_used_app.as_ref().and_then(|app| {
    let scope = Scope::for_app(app.clone());
    ctx
      .cache
      .get_or_read(ctx.adapter, &scope)
      .ok()
      .map(|tree| crate::executor::display::display_elements(&tree, ctx.last_target_bounds, ctx.config.max_display_elements))
  });

  BatchResult {
    ok: !ctx.has_failure,
    total_steps: steps.len(),
    completed,
    results,
    error_summary,
    display,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::RoleTag;
  use crate::executor::condition::Condition;
  use crate::executor::{Target, VerifyRequest};
  use crate::platform::{mock::MockAdapter, MouseButton};
  use crate::types::ElementId;

  fn fast_config() -> EngineConfig {
    EngineConfig::builder().cache_ttl(None).build()
  }

  fn click_step(id: u32) -> Step {
    Step::Regular {
      action: Action::Click {
        target: Target::Id(ElementId(id)),
        button: MouseButton::Left,
        count: 1,
        verify: VerifyRequest::default(),
        post_read: false,
        display: false,
      },
      scope: Scope::default(),
    }
  }

  #[test]
  fn runs_steps_in_order_and_numbers_them_one_based() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let steps = vec![click_step(2), click_step(3)];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(result.ok);
    assert_eq!(result.total_steps, 2);
    assert_eq!(result.completed, 2);
    assert_eq!(result.results[0].step, 1);
    assert_eq!(result.results[1].step, 2);
  }

  #[test]
  fn stop_on_error_halts_remaining_top_level_steps() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let bad = Step::Regular {
      action: Action::Action {
        target: Target::Id(ElementId(999)),
        action_name: "press".into(),
        verify: VerifyRequest::default(),
        display: false,
      },
      scope: Scope::default(),
    };
    let steps = vec![bad, click_step(2)];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(!result.ok);
    assert_eq!(result.completed, 0);
    assert_eq!(result.results.len(), 1, "the second step never runs");
    assert!(result.error_summary.is_some());
  }

  #[test]
  fn try_swallows_a_failing_substep() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let bad = Step::Regular {
      action: Action::Action {
        target: Target::Id(ElementId(999)),
        action_name: "press".into(),
        verify: VerifyRequest::default(),
        display: false,
      },
      scope: Scope::default(),
    };
    let steps = vec![Step::Try { steps: vec![bad, click_step(2)] }, click_step(3)];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(result.ok, "a try block always reports success itself");
    assert_eq!(result.completed, 2, "the try step and the following step both count");
    let try_result = &result.results[0];
    let substeps = try_result.substeps.as_ref().unwrap();
    assert_eq!(substeps.len(), 1, "the try block stops at its own first failure");
    assert!(!substeps[0].ok);
  }

  #[test]
  fn if_exists_picks_then_or_else_branch() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let steps = vec![Step::IfExists {
      branch: IfExists {
        condition: Condition {
          for_text: Some("Send".into()),
          ..Default::default()
        },
      },
      then_steps: vec![click_step(2)],
      else_steps: vec![click_step(3)],
    }];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(result.ok);
    let substeps = result.results[0].substeps.as_ref().unwrap();
    assert_eq!(substeps.len(), 1);
  }

  #[test]
  fn if_focused_falls_back_to_else_when_nothing_focused() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let steps = vec![Step::IfFocused {
      branch: control::IfFocused {
        roles: vec![RoleTag::Input],
        text: None,
      },
      then_steps: vec![click_step(2)],
      else_steps: vec![click_step(3)],
    }];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(result.ok);
    let substeps = result.results[0].substeps.as_ref().unwrap();
    let resolved = substeps[0].result.as_ref().unwrap().resolved.as_ref().unwrap();
    assert_eq!(resolved.id, ElementId(3), "else branch ran since nothing is focused");
  }

  #[test]
  fn final_display_reads_the_last_used_app() {
    let adapter = MockAdapter::with_default_tree();
    let cache = TreeCache::new(None);
    let steps = vec![click_step(2)];
    let result = run_batch(&adapter, &cache, fast_config(), Scope::for_app("Notes"), true, &steps);
    assert!(result.display.is_some());
  }
}
