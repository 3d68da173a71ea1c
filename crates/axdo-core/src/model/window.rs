/*! Window: an OS-level container (spec §3.4). */

use crate::types::{Bounds, ProcessId, WindowId};
use serde::{Deserialize, Serialize};

/// An OS-level window container. Windows are enumerated by the platform
/// adapter; the resolver uses them only for scope selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
  pub app: String,
  pub pid: ProcessId,
  pub id: WindowId,
  pub title: String,
  pub bounds: Bounds,
  pub focused: bool,
}
