/*! Scope: the `(app, window-title, window-id, pid)` tuple (GLOSSARY)
identifying the portion of the desktop to read or act upon. Doubles as the
Tree Cache key (spec §3.6). */

use super::{ProcessId, WindowId};
use serde::{Deserialize, Serialize};

/// Identifies the portion of the desktop a read or action targets.
///
/// Any subset of fields may be set; an empty `Scope` is a caller error for
/// actions that require one (spec §7, "Scope missing").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
  pub app: Option<String>,
  pub window_title: Option<String>,
  pub window_id: Option<WindowId>,
  pub pid: Option<ProcessId>,
}

impl Scope {
  pub fn is_empty(&self) -> bool {
    self.app.is_none() && self.window_title.is_none() && self.window_id.is_none() && self.pid.is_none()
  }

  pub fn for_app(app: impl Into<String>) -> Self {
    Self {
      app: Some(app.into()),
      ..Self::default()
    }
  }

  /// Fill any unset field from `defaults` (used by the Batch Runtime to
  /// apply `DoContext`'s default app/window to a step that didn't override
  /// it; spec §6.2).
  pub fn merged_with_defaults(mut self, defaults: &Scope) -> Self {
    if self.app.is_none() {
      self.app.clone_from(&defaults.app);
    }
    if self.window_title.is_none() {
      self.window_title.clone_from(&defaults.window_title);
    }
    if self.window_id.is_none() {
      self.window_id = defaults.window_id;
    }
    if self.pid.is_none() {
      self.pid = defaults.pid;
    }
    self
  }
}
