/*!
In-memory `PlatformAdapter` for tests (spec §6.1's contract has no in-repo
OS backend; this stands in for one behind the `PlatformAdapter` trait).

`MockAdapter` holds one fixed element tree plus a call log, so executor,
verifier, resolver, and batch tests can assert on both the data returned
and the actions that were actually dispatched.
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::model::{Element, Window};
use crate::types::{Bounds, CoreError, CoreResult, ElementId, Point, Ref, Scope};

use super::traits::{
  ActionPerformer, Clipboard, ImageFormat, Inputter, MouseButton, PlatformAdapter, Reader,
  Screenshotter, ValueSetter, WindowFilter, WindowManager, WritableAttribute,
};
use crate::a11y::RoleTag;

/// One entry in the adapter's call log, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  Click { x: i32, y: i32, button: MouseButton, count: u8 },
  MoveTo { x: i32, y: i32 },
  Drag { from: Point, to: Point },
  Scroll { x: i32, y: i32, dx: i32, dy: i32 },
  TypeText { text: String },
  KeyCombo { tokens: Vec<String> },
  Perform { id: ElementId, action_name: String },
  SetValue { id: ElementId, attribute: WritableAttribute, value: String },
  Focus,
  Open { target: String },
}

struct State {
  tree: Element,
  windows: Vec<Window>,
  clipboard: String,
  calls: Vec<Call>,
  frontmost_app: Option<String>,
}

/// Test double implementing the full `PlatformAdapter` contract.
pub struct MockAdapter {
  state: Mutex<State>,
  reads: AtomicUsize,
  fail_reads: bool,
}

impl MockAdapter {
  /// Build an adapter wrapping the given tree.
  #[must_use]
  pub fn new(tree: Element) -> Self {
    Self {
      state: Mutex::new(State {
        tree,
        windows: Vec::new(),
        clipboard: String::new(),
        calls: Vec::new(),
        frontmost_app: None,
      }),
      reads: AtomicUsize::new(0),
      fail_reads: false,
    }
  }

  /// A small but representative tree: a window containing a labelled
  /// button and a text input, used across cache/resolver/executor tests.
  #[must_use]
  pub fn with_default_tree() -> Self {
    Self::new(default_tree())
  }

  /// An adapter whose `read_elements` always fails, for cache/error tests.
  #[must_use]
  pub fn failing() -> Self {
    let mut adapter = Self::new(default_tree());
    adapter.fail_reads = true;
    adapter
  }

  /// Number of `read_elements` calls made so far.
  #[must_use]
  pub fn read_count(&self) -> usize {
    self.reads.load(Ordering::SeqCst)
  }

  /// Snapshot of the call log recorded so far.
  #[must_use]
  pub fn calls(&self) -> Vec<Call> {
    self.state.lock().calls.clone()
  }

  /// Replace the tree the adapter serves on subsequent reads, simulating
  /// a UI mutation between two reads.
  pub fn set_tree(&self, tree: Element) {
    self.state.lock().tree = tree;
  }

  pub fn set_windows(&self, windows: Vec<Window>) {
    self.state.lock().windows = windows;
  }

  pub fn set_frontmost_app(&self, app: impl Into<String>) {
    self.state.lock().frontmost_app = Some(app.into());
  }
}

fn default_tree() -> Element {
  Element {
    id: ElementId(1),
    r#ref: Ref("window:1".into()),
    role: RoleTag::Window,
    subrole: None,
    title: "Untitled".into(),
    value: String::new(),
    description: String::new(),
    bounds: Bounds::new(0, 0, 800, 600),
    focused: false,
    selected: false,
    enabled: Some(true),
    actions: vec![],
    children: vec![
      Element {
        id: ElementId(2),
        r#ref: Ref("btn:0".into()),
        role: RoleTag::Btn,
        subrole: None,
        title: "Send".into(),
        value: String::new(),
        description: String::new(),
        bounds: Bounds::new(10, 10, 80, 24),
        focused: false,
        selected: false,
        enabled: Some(true),
        actions: vec![crate::a11y::ActionTag::Press],
        children: vec![],
      },
      Element {
        id: ElementId(3),
        r#ref: Ref("input:0".into()),
        role: RoleTag::Input,
        subrole: None,
        title: "Subject".into(),
        value: String::new(),
        description: String::new(),
        bounds: Bounds::new(10, 50, 200, 24),
        focused: false,
        selected: false,
        enabled: Some(true),
        actions: vec![],
        children: vec![],
      },
    ],
  }
}

impl Reader for MockAdapter {
  fn read_elements(&self, _scope: &Scope) -> CoreResult<Element> {
    self.reads.fetch_add(1, Ordering::SeqCst);
    if self.fail_reads {
      return Err(CoreError::Execution("mock read failure".into()));
    }
    Ok(self.state.lock().tree.clone())
  }

  fn list_windows(&self, _filter: &WindowFilter) -> CoreResult<Vec<Window>> {
    Ok(self.state.lock().windows.clone())
  }
}

impl Inputter for MockAdapter {
  fn click(&self, x: i32, y: i32, button: MouseButton, count: u8) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Click { x, y, button, count });
    Ok(())
  }

  fn move_to(&self, x: i32, y: i32) -> CoreResult<()> {
    self.state.lock().calls.push(Call::MoveTo { x, y });
    Ok(())
  }

  fn drag(&self, from: Point, to: Point) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Drag { from, to });
    Ok(())
  }

  fn scroll(&self, x: i32, y: i32, dx: i32, dy: i32) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Scroll { x, y, dx, dy });
    Ok(())
  }

  fn type_text(&self, text: &str, _delay_ms: u32) -> CoreResult<()> {
    self.state.lock().calls.push(Call::TypeText { text: text.to_string() });
    Ok(())
  }

  fn key_combo(&self, tokens: &[String]) -> CoreResult<()> {
    self.state.lock().calls.push(Call::KeyCombo { tokens: tokens.to_vec() });
    Ok(())
  }
}

impl ActionPerformer for MockAdapter {
  fn perform(&self, _scope: &Scope, id: ElementId, action_name: &str) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Perform {
      id,
      action_name: action_name.to_string(),
    });
    Ok(())
  }
}

impl ValueSetter for MockAdapter {
  fn set(&self, _scope: &Scope, id: ElementId, attribute: WritableAttribute, value: &str) -> CoreResult<()> {
    self.state.lock().calls.push(Call::SetValue {
      id,
      attribute,
      value: value.to_string(),
    });
    Ok(())
  }
}

impl WindowManager for MockAdapter {
  fn focus(&self, _scope: &Scope) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Focus);
    Ok(())
  }

  fn frontmost_app(&self) -> CoreResult<Option<String>> {
    Ok(self.state.lock().frontmost_app.clone())
  }
}

impl Screenshotter for MockAdapter {
  fn capture(&self, _scope: &Scope, _format: ImageFormat, _quality: u8, _scale: f64) -> CoreResult<Vec<u8>> {
    Ok(vec![0u8; 16])
  }
}

impl Clipboard for MockAdapter {
  fn get_text(&self) -> CoreResult<String> {
    Ok(self.state.lock().clipboard.clone())
  }

  fn set_text(&self, text: &str) -> CoreResult<()> {
    self.state.lock().clipboard = text.to_string();
    Ok(())
  }

  fn clear(&self) -> CoreResult<()> {
    self.state.lock().clipboard.clear();
    Ok(())
  }
}

impl PlatformAdapter for MockAdapter {
  fn screenshotter(&self) -> Option<&dyn Screenshotter> {
    Some(self)
  }

  fn open(&self, target: &str) -> CoreResult<()> {
    self.state.lock().calls.push(Call::Open { target: target.to_string() });
    Ok(())
  }
}
