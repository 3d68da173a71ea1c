/*!
Verifier: snapshot-compare-retry-fallback loop invoked by the Executor
when the caller passes a verify flag (spec §4.5).

Sleeps, re-reads, and compares against the expected condition, retrying
up to the configured limit before falling back to the next condition in
the chain.
*/

use std::thread;
use std::time::Duration;

use log::debug;

use crate::model::{Element, ElementSnapshot};
use crate::platform::Reader;
use crate::types::{CoreResult, ElementId, Ref, Scope};

/// `delay`/`max_retries` from the caller, defaulted per spec §4.5.
#[derive(Debug, Clone, Copy)]
pub struct VerifyOptions {
  pub delay_ms: u64,
  pub max_retries: u32,
}

impl Default for VerifyOptions {
  fn default() -> Self {
    Self {
      delay_ms: 100,
      max_retries: 2,
    }
  }
}

/// One step in the action-specific fallback chain: a name surfaced in the
/// result, and the closure to run when verification fails.
pub struct Fallback<'a> {
  pub name: &'static str,
  pub run: Box<dyn Fn() -> CoreResult<()> + 'a>,
}

/// Outcome of a verification attempt.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
  pub verified: bool,
  pub last_observed: ElementSnapshot,
  /// Name and reason of the fallback that was tried, if any.
  pub fallback_used: Option<(&'static str, &'static str)>,
}

fn find_by_id(node: &Element, id: ElementId) -> Option<&Element> {
  if node.id == id {
    return Some(node);
  }
  node.children.iter().find_map(|c| find_by_id(c, id))
}

fn find_by_ref(node: &Element, want: &Ref) -> Option<&Element> {
  if &node.r#ref == want {
    return Some(node);
  }
  node.children.iter().find_map(|c| find_by_ref(c, want))
}

/// Run the verify loop: sleep, re-read, compare, optionally run the next
/// fallback and retry, up to `options.max_retries` times.
pub fn verify<R: Reader + ?Sized>(
  adapter: &R,
  scope: &Scope,
  pre: &ElementSnapshot,
  options: VerifyOptions,
  fallbacks: &[Fallback<'_>],
) -> CoreResult<VerifyOutcome> {
  let mut retries_left = options.max_retries;
  let mut fallback_idx = 0usize;
  let mut fallback_used: Option<(&'static str, &'static str)> = None;

  loop {
    thread::sleep(Duration::from_millis(options.delay_ms));

    let tree = adapter.read_elements(scope)?;
    let found = find_by_id(&tree, pre.id).or_else(|| find_by_ref(&tree, &pre.r#ref));
    let observed = found.map_or_else(|| ElementSnapshot::missing(pre.id, pre.r#ref.clone()), ElementSnapshot::capture);

    if observed.changed_from(pre) {
      return Ok(VerifyOutcome {
        verified: true,
        last_observed: observed,
        fallback_used,
      });
    }

    if retries_left == 0 || fallback_idx >= fallbacks.len() {
      return Ok(VerifyOutcome {
        verified: false,
        last_observed: observed,
        fallback_used,
      });
    }

    let fallback = &fallbacks[fallback_idx];
    debug!("verify: no change observed, trying fallback {}", fallback.name);
    (fallback.run)()?;
    fallback_used = Some((fallback.name, "no state change"));
    fallback_idx += 1;
    retries_left -= 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::RoleTag;
  use crate::platform::mock::MockAdapter;
  use crate::types::Bounds;

  fn elem(id: u32, value: &str) -> Element {
    Element {
      id: ElementId(id),
      r#ref: Ref(format!("r{id}")),
      role: RoleTag::Input,
      subrole: None,
      title: String::new(),
      value: value.into(),
      description: String::new(),
      bounds: Bounds::new(0, 0, 10, 10),
      focused: false,
      selected: false,
      enabled: Some(true),
      actions: vec![],
      children: vec![],
    }
  }

  #[test]
  fn succeeds_immediately_when_state_already_changed() {
    let adapter = MockAdapter::new(elem(1, "new"));
    let pre = ElementSnapshot::capture(&elem(1, "old"));
    let outcome = verify(&adapter, &Scope::default(), &pre, VerifyOptions { delay_ms: 0, max_retries: 0 }, &[]).unwrap();
    assert!(outcome.verified);
  }

  #[test]
  fn exhausts_retries_and_reports_unverified() {
    let adapter = MockAdapter::new(elem(1, "same"));
    let pre = ElementSnapshot::capture(&elem(1, "same"));
    let outcome = verify(&adapter, &Scope::default(), &pre, VerifyOptions { delay_ms: 0, max_retries: 1 }, &[]).unwrap();
    assert!(!outcome.verified);
  }

  #[test]
  fn runs_fallback_then_succeeds() {
    let adapter = MockAdapter::new(elem(1, "same"));
    let pre = ElementSnapshot::capture(&elem(1, "same"));
    let ran = std::cell::Cell::new(false);
    let fallback = Fallback {
      name: "press",
      run: Box::new(|| {
        ran.set(true);
        adapter.set_tree(elem(1, "changed"));
        Ok(())
      }),
    };
    let outcome = verify(
      &adapter,
      &Scope::default(),
      &pre,
      VerifyOptions { delay_ms: 0, max_retries: 1 },
      std::slice::from_ref(&fallback),
    )
    .unwrap();
    assert!(ran.get());
    assert!(outcome.verified);
    assert_eq!(outcome.fallback_used.map(|(n, _)| n), Some("press"));
  }
}
