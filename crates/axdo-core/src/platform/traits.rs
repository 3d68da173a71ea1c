/*!
Platform Adapter contract (spec §6.1) — the interface the core depends on.

Core code only ever talks to these traits; a concrete OS backend (macOS
`AXUIElement`, Windows UIA, AT-SPI on Linux) is out of scope for this crate
(spec §1) and lives elsewhere. `platform::mock` provides an in-memory
implementation for tests so core logic never depends on a real backend.

Every `Reader` method is free of side effects (spec §6.1); every other
method may mutate desktop state, and the engine must assume all Tree Cache
entries for the affected app are stale afterward (spec §4.2).
*/

use crate::model::{Element, Window};
use crate::types::{CoreResult, ElementId, Point, Scope};

/// Mouse button for `click`/`drag` synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
  Left,
  Right,
  Middle,
}

/// The attribute a `set-value` action writes (spec §4.4 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritableAttribute {
  Value,
  Selected,
  Focused,
}

/// Filter for `list_windows` (e.g. restrict to one app).
#[derive(Debug, Clone, Default)]
pub struct WindowFilter {
  pub app: Option<String>,
}

/// Image encoding requested from a screenshot capture. Encoding itself is
/// out of scope (spec §1); this only names the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
  Png,
  Jpeg,
}

/// Reads the accessibility tree and window list. Side-effect free.
pub trait Reader: Send + Sync {
  /// Read the full element tree for `scope`.
  fn read_elements(&self, scope: &Scope) -> CoreResult<Element>;

  /// Enumerate windows, optionally restricted by `filter`.
  fn list_windows(&self, filter: &WindowFilter) -> CoreResult<Vec<Window>>;
}

/// Synthesizes mouse/keyboard input. The host OS input queue is global, so
/// the engine serializes calls into this trait with a process-wide mutex
/// (spec §5 "Global input mutex").
pub trait Inputter: Send + Sync {
  fn click(&self, x: i32, y: i32, button: MouseButton, count: u8) -> CoreResult<()>;
  fn move_to(&self, x: i32, y: i32) -> CoreResult<()>;
  fn drag(&self, from: Point, to: Point) -> CoreResult<()>;
  fn scroll(&self, x: i32, y: i32, dx: i32, dy: i32) -> CoreResult<()>;
  fn type_text(&self, text: &str, delay_ms: u32) -> CoreResult<()>;
  /// `tokens` are already split on `+`; see spec §4.4 "Type translation details".
  fn key_combo(&self, tokens: &[String]) -> CoreResult<()>;
}

/// Performs a direct accessibility action (press/pick/showmenu/etc) on an
/// element by id, within `scope`.
pub trait ActionPerformer: Send + Sync {
  fn perform(&self, scope: &Scope, id: ElementId, action_name: &str) -> CoreResult<()>;
}

/// Writes a value/selected/focused attribute directly via the
/// accessibility API (bypassing input synthesis).
pub trait ValueSetter: Send + Sync {
  fn set(&self, scope: &Scope, id: ElementId, attribute: WritableAttribute, value: &str) -> CoreResult<()>;
}

/// Window-level operations: bringing a window to front, querying the
/// frontmost app.
pub trait WindowManager: Send + Sync {
  fn focus(&self, scope: &Scope) -> CoreResult<()>;
  fn frontmost_app(&self) -> CoreResult<Option<String>>;
}

/// Screen capture. Optional — adapters without capture support return
/// `CoreError::UnsupportedCapability` (spec §7 kind 1).
pub trait Screenshotter: Send + Sync {
  fn capture(&self, scope: &Scope, format: ImageFormat, quality: u8, scale: f64) -> CoreResult<Vec<u8>>;
}

/// System clipboard, treated as a globally mutable resource (spec §5).
pub trait Clipboard: Send + Sync {
  fn get_text(&self) -> CoreResult<String>;
  fn set_text(&self, text: &str) -> CoreResult<()>;
  fn clear(&self) -> CoreResult<()>;
}

/// The full Platform Adapter contract the engine depends on. A concrete
/// adapter implements every required trait; `screenshotter()` may return
/// `None` for adapters with no capture support.
pub trait PlatformAdapter:
  Reader + Inputter + ActionPerformer + ValueSetter + WindowManager + Clipboard + Send + Sync
{
  /// Returns this adapter's `Screenshotter`, if it has one.
  fn screenshotter(&self) -> Option<&dyn Screenshotter> {
    None
  }

  /// Open a URL, file, or app by platform app-launcher (the `open` action,
  /// spec §4.4).
  fn open(&self, target: &str) -> CoreResult<()>;
}
